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

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;
use pyo3::Python;

use numpy::ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use thiserror::Error;

use crate::phase_space::{change_of_basis, PhaseSpaceError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("covariance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("phase space dimension must be even, got {0}")]
    OddDimension(usize),
    #[error(transparent)]
    PhaseSpace(#[from] PhaseSpaceError),
}

impl From<ReorderError> for PyErr {
    fn from(err: ReorderError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

// Number of modes for a phase space of dimension `dim`.
fn num_modes(dim: usize) -> Result<usize, ReorderError> {
    if dim % 2 != 0 {
        return Err(ReorderError::OddDimension(dim));
    }
    Ok(dim / 2)
}

fn cov_modes(cov: &ArrayView2<f64>) -> Result<usize, ReorderError> {
    let (rows, cols) = cov.dim();
    if rows != cols {
        return Err(ReorderError::NotSquare { rows, cols });
    }
    num_modes(rows)
}

/// Rewrite a covariance matrix from the xxpp ordering to the xpxp ordering.
pub fn xxpp_to_xpxp_cov(cov: ArrayView2<f64>) -> Result<Array2<f64>, ReorderError> {
    let n = cov_modes(&cov)?;
    tracing::debug!(modes = n, "reordering covariance to xpxp");
    let m = change_of_basis(n)?;
    Ok(m.dot(&cov).dot(&m.t()))
}

/// Rewrite a covariance matrix from the xpxp ordering to the xxpp ordering.
pub fn xpxp_to_xxpp_cov(cov: ArrayView2<f64>) -> Result<Array2<f64>, ReorderError> {
    let n = cov_modes(&cov)?;
    tracing::debug!(modes = n, "reordering covariance to xxpp");
    let m = change_of_basis(n)?;
    Ok(m.t().dot(&cov).dot(&*m))
}

/// Rewrite a vector of means from the xxpp ordering to the xpxp ordering.
pub fn xxpp_to_xpxp_means(means: ArrayView1<f64>) -> Result<Array1<f64>, ReorderError> {
    let n = num_modes(means.len())?;
    Ok(change_of_basis(n)?.dot(&means))
}

/// Rewrite a vector of means from the xpxp ordering to the xxpp ordering.
pub fn xpxp_to_xxpp_means(means: ArrayView1<f64>) -> Result<Array1<f64>, ReorderError> {
    let n = num_modes(means.len())?;
    Ok(change_of_basis(n)?.t().dot(&means))
}

#[pyfunction]
#[pyo3(name = "xxpp_to_xpxp_cov", text_signature = "(cov, /)")]
pub fn py_xxpp_to_xpxp_cov(
    py: Python,
    cov: PyReadonlyArray2<f64>,
) -> PyResult<Py<PyArray2<f64>>> {
    let out = xxpp_to_xpxp_cov(cov.as_array())?;
    Ok(out.into_pyarray(py).to_owned())
}

#[pyfunction]
#[pyo3(name = "xpxp_to_xxpp_cov", text_signature = "(cov, /)")]
pub fn py_xpxp_to_xxpp_cov(
    py: Python,
    cov: PyReadonlyArray2<f64>,
) -> PyResult<Py<PyArray2<f64>>> {
    let out = xpxp_to_xxpp_cov(cov.as_array())?;
    Ok(out.into_pyarray(py).to_owned())
}

#[pyfunction]
#[pyo3(name = "xxpp_to_xpxp_means", text_signature = "(means, /)")]
pub fn py_xxpp_to_xpxp_means(
    py: Python,
    means: PyReadonlyArray1<f64>,
) -> PyResult<Py<PyArray1<f64>>> {
    let out = xxpp_to_xpxp_means(means.as_array())?;
    Ok(out.into_pyarray(py).to_owned())
}

#[pyfunction]
#[pyo3(name = "xpxp_to_xxpp_means", text_signature = "(means, /)")]
pub fn py_xpxp_to_xxpp_means(
    py: Python,
    means: PyReadonlyArray1<f64>,
) -> PyResult<Py<PyArray1<f64>>> {
    let out = xpxp_to_xxpp_means(means.as_array())?;
    Ok(out.into_pyarray(py).to_owned())
}

#[pymodule]
pub fn reorder(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pyfunction!(py_xxpp_to_xpxp_cov))?;
    m.add_wrapped(wrap_pyfunction!(py_xpxp_to_xxpp_cov))?;
    m.add_wrapped(wrap_pyfunction!(py_xxpp_to_xpxp_means))?;
    m.add_wrapped(wrap_pyfunction!(py_xpxp_to_xxpp_means))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn random_symmetric(seed: u64, dim: usize) -> Array2<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let a = Array2::from_shape_fn((dim, dim), |_| rng.gen_range(-1.0..1.0));
        a.dot(&a.t())
    }

    #[test]
    fn means_are_interleaved() {
        let xxpp = array![1., 2., 10., 20.];
        assert_eq!(
            xxpp_to_xpxp_means(xxpp.view()).unwrap(),
            array![1., 10., 2., 20.]
        );
        assert_eq!(
            xpxp_to_xxpp_means(array![1., 10., 2., 20.].view()).unwrap(),
            xxpp
        );
    }

    #[test]
    fn single_mode_is_unchanged() {
        let cov = array![[2., 0.5], [0.5, 3.]];
        assert_eq!(xxpp_to_xpxp_cov(cov.view()).unwrap(), cov);
    }

    #[test]
    fn covariance_entries_follow_quadratures() {
        // Var(x_1) = 1, Var(x_2) = 2, Var(p_1) = 3, Var(p_2) = 4, Cov(x_1, p_2) = 5.
        let xxpp = array![
            [1., 0., 0., 5.],
            [0., 2., 0., 0.],
            [0., 0., 3., 0.],
            [5., 0., 0., 4.],
        ];
        let xpxp = array![
            [1., 0., 0., 5.],
            [0., 3., 0., 0.],
            [0., 0., 2., 0.],
            [5., 0., 0., 4.],
        ];
        assert_eq!(xxpp_to_xpxp_cov(xxpp.view()).unwrap(), xpxp);
        assert_eq!(xpxp_to_xxpp_cov(xpxp.view()).unwrap(), xxpp);
    }

    #[test]
    fn covariance_round_trip() {
        for modes in 0..6 {
            let cov = random_symmetric(modes as u64, 2 * modes);
            let there = xxpp_to_xpxp_cov(cov.view()).unwrap();
            assert_eq!(xpxp_to_xxpp_cov(there.view()).unwrap(), cov);
        }
    }

    #[test]
    fn rejects_odd_dimension() {
        assert_eq!(
            xxpp_to_xpxp_means(array![1., 2., 3.].view()),
            Err(ReorderError::OddDimension(3))
        );
        assert_eq!(
            xpxp_to_xxpp_cov(Array2::<f64>::zeros((3, 3)).view()),
            Err(ReorderError::OddDimension(3))
        );
    }

    #[test]
    fn rejects_non_square_covariance() {
        assert_eq!(
            xxpp_to_xpxp_cov(Array2::<f64>::zeros((2, 4)).view()),
            Err(ReorderError::NotSquare { rows: 2, cols: 4 })
        );
    }

    #[test]
    fn errors_raise_value_error() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err = PyErr::from(ReorderError::NotSquare { rows: 2, cols: 4 });
            assert!(err.is_instance_of::<PyValueError>(py));
            assert_eq!(
                err.value(py).to_string(),
                "covariance matrix must be square, got 2x4"
            );

            let err = PyErr::from(ReorderError::OddDimension(3));
            assert!(err.is_instance_of::<PyValueError>(py));
            assert_eq!(
                err.value(py).to_string(),
                "phase space dimension must be even, got 3"
            );
        });
    }
}
