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

use std::hash::Hash;
use std::sync::{Arc, RwLock};

use ahash::RandomState;
use hashbrown::HashMap;
use ndarray::Array2;

/// An unbounded, process-lifetime memo table mapping an exact key to an
/// immutable matrix.
///
/// Lookups take a shared lock.  On a miss the matrix is built with no lock
/// held, so two threads racing on the same new key may both build it; the
/// first insert wins and both receive equal matrices.
pub struct MatrixCache<K> {
    name: &'static str,
    table: RwLock<HashMap<K, Arc<Array2<f64>>, RandomState>>,
}

impl<K> MatrixCache<K>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    pub fn new(name: &'static str) -> Self {
        MatrixCache {
            name,
            table: RwLock::new(HashMap::with_hasher(RandomState::new())),
        }
    }

    /// Return the matrix stored under `key`, calling `build` and storing its
    /// result if there is none yet.
    pub fn get_or_insert_with<F>(&self, key: K, build: F) -> Arc<Array2<f64>>
    where
        F: FnOnce() -> Array2<f64>,
    {
        // The table only ever holds fully built matrices, so a poisoned lock
        // is still safe to read through.
        if let Some(matrix) = self
            .table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Arc::clone(matrix);
        }
        tracing::trace!(table = self.name, key = ?key, "matrix cache miss");
        let matrix = Arc::new(build());
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(table.entry(key).or_insert(matrix))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
