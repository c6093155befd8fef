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

//! Phase space matrices shared by the Gaussian backends.
//!
//! Every builder is memoized for the lifetime of the process, keyed on its
//! exact input.  Callers are expected to reuse a small set of angles and mode
//! counts, so the tables are never evicted.

use std::mem::size_of;
use std::sync::{Arc, OnceLock};

use ndarray::prelude::*;
use numpy::{PyArray2, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;
use pyo3::Python;
use thiserror::Error;

use crate::matrix_cache::MatrixCache;

static ROTATIONS: OnceLock<MatrixCache<u64>> = OnceLock::new();
static SYMPLECTIC_FORMS: OnceLock<MatrixCache<usize>> = OnceLock::new();
static CHANGES_OF_BASIS: OnceLock<MatrixCache<usize>> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseSpaceError {
    #[error("a phase space of {0} modes cannot be represented as a matrix")]
    TooManyModes(usize),
}

impl From<PhaseSpaceError> for PyErr {
    fn from(err: PhaseSpaceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

// Side length of the `2n x 2n` matrix, provided its buffer fits in an `isize`.
fn phase_space_dim(n: usize) -> Result<usize, PhaseSpaceError> {
    n.checked_mul(2)
        .filter(|dim| {
            dim.checked_mul(*dim)
                .and_then(|len| len.checked_mul(size_of::<f64>()))
                .map_or(false, |bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(PhaseSpaceError::TooManyModes(n))
}

fn rotations() -> &'static MatrixCache<u64> {
    ROTATIONS.get_or_init(|| MatrixCache::new("rotation_matrix"))
}

fn symplectic_forms() -> &'static MatrixCache<usize> {
    SYMPLECTIC_FORMS.get_or_init(|| MatrixCache::new("symplectic_form"))
}

fn changes_of_basis() -> &'static MatrixCache<usize> {
    CHANGES_OF_BASIS.get_or_init(|| MatrixCache::new("change_of_basis"))
}

/// The 2x2 rotation matrix `[[cos(phi), -sin(phi)], [sin(phi), cos(phi)]]`.
///
/// Cached on the bit pattern of `phi`, so `0.0` and `-0.0` are separate
/// entries.  Non-finite angles give NaN entries.
pub fn rotation_matrix(phi: f64) -> Arc<Array2<f64>> {
    rotations().get_or_insert_with(phi.to_bits(), || {
        let (sin, cos) = phi.sin_cos();
        array![[cos, -sin], [sin, cos]]
    })
}

/// The symplectic form of order `n`, the `2n x 2n` block matrix
/// `[[0, I], [-I, 0]]`.
///
/// Fails only when `2n x 2n` doubles cannot be addressed.
pub fn symplectic_form(n: usize) -> Result<Arc<Array2<f64>>, PhaseSpaceError> {
    let dim = phase_space_dim(n)?;
    Ok(symplectic_forms().get_or_insert_with(n, || {
        let mut omega = Array2::<f64>::zeros((dim, dim));
        omega.slice_mut(s![..n, n..]).assign(&Array2::eye(n));
        omega.slice_mut(s![n.., ..n]).assign(&-Array2::<f64>::eye(n));
        omega
    }))
}

/// Change of basis between the two Gaussian orderings.
///
/// Applied to a vector ordered `(x_1, ..., x_n, p_1, ..., p_n)` it gives
/// `(x_1, p_1, ..., x_n, p_n)`.
pub fn change_of_basis(n: usize) -> Result<Arc<Array2<f64>>, PhaseSpaceError> {
    let dim = phase_space_dim(n)?;
    Ok(changes_of_basis().get_or_insert_with(n, || {
        let mut m = Array2::<f64>::zeros((dim, dim));
        for i in 0..n {
            m[[2 * i, i]] = 1.;
            m[[2 * i + 1, i + n]] = 1.;
        }
        m
    }))
}

/// Return the 2x2 rotation matrix for the angle ``phi``.
#[pyfunction]
#[pyo3(name = "rotation_matrix", text_signature = "(phi, /)")]
pub fn py_rotation_matrix(py: Python, phi: f64) -> Py<PyArray2<f64>> {
    rotation_matrix(phi).to_pyarray(py).to_owned()
}

/// Return the symplectic matrix of order ``n``.
#[pyfunction]
#[pyo3(text_signature = "(n, /)")]
pub fn sympmat(py: Python, n: usize) -> PyResult<Py<PyArray2<f64>>> {
    Ok(symplectic_form(n)?.to_pyarray(py).to_owned())
}

/// Return the ``2n x 2n`` matrix taking the xxpp ordering to the xpxp ordering.
#[pyfunction]
#[pyo3(text_signature = "(n, /)")]
pub fn changebasis(py: Python, n: usize) -> PyResult<Py<PyArray2<f64>>> {
    Ok(change_of_basis(n)?.to_pyarray(py).to_owned())
}

#[pymodule]
pub fn phase_space(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pyfunction!(py_rotation_matrix))?;
    m.add_wrapped(wrap_pyfunction!(sympmat))?;
    m.add_wrapped(wrap_pyfunction!(changebasis))?;
    Ok(())
}
