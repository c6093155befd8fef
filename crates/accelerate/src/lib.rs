// This code is part of the photonic accelerator.
//
// (C) Copyright Xanadu Quantum Technologies Inc. 2019, 2023
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use pyo3::Python;

pub mod matrix_cache;
pub mod phase_space;
pub mod reorder;

#[pymodule]
fn _accelerate(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pymodule!(phase_space::phase_space))?;
    m.add_wrapped(wrap_pymodule!(reorder::reorder))?;
    Ok(())
}
