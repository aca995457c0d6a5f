// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record source port and an in-memory implementation.

use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};

use crate::Record;

/// Live provider of records (a database query, a file, a remote listing).
///
/// Views never talk to storage themselves: they ask the source to
/// [`enumerate`](RecordSource::enumerate) once per cache generation and ask it
/// for an independent [`requery`](RecordSource::requery) handle on refresh.
pub trait RecordSource {
    /// Record type produced by this source.
    type Record: Record + Clone;
    /// Failure raised while enumerating or re-querying. Passed through views
    /// untranslated.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce the full ordered sequence of records.
    ///
    /// # Errors
    ///
    /// Any storage failure; views surface it as `ViewError::Source`.
    fn enumerate(&self) -> Result<Vec<Self::Record>, Self::Error>;

    /// Produce an independent, re-queryable instance of this source.
    ///
    /// # Errors
    ///
    /// Any failure opening the new handle. `View::refresh` then changes nothing.
    fn requery(&self) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Model label used by the "not found" signal.
    fn model_name(&self) -> &str {
        "record"
    }
}

/// In-memory source over a shared, mutable backing vector.
///
/// Clones and [`requery`](RecordSource::requery) handles read the same
/// backing store, the way two query objects read the same table. Mutations
/// made through any handle are visible to the next `enumerate`.
#[derive(Debug)]
pub struct VecSource<R> {
    rows: Arc<RwLock<Vec<R>>>,
    model: Arc<str>,
}

impl<R> Clone for VecSource<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            model: Arc::clone(&self.model),
        }
    }
}

impl<R> VecSource<R> {
    /// Create a source over `rows`.
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            model: Arc::from("record"),
        }
    }

    /// Set the model label reported by [`RecordSource::model_name`].
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Arc::from(model);
        self
    }

    /// Replace the backing rows wholesale.
    pub fn replace(&self, rows: Vec<R>) {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = rows;
    }

    /// Append one row to the backing store.
    pub fn push(&self, row: R) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
    }

    /// Number of rows currently in the backing store.
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the backing store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Record + Clone> RecordSource for VecSource<R> {
    type Record = R;
    type Error = Infallible;

    fn enumerate(&self) -> Result<Vec<R>, Infallible> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn requery(&self) -> Result<Self, Infallible> {
        Ok(self.clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
