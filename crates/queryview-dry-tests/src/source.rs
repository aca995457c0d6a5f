// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record source stub that counts calls and can be told to fail.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use queryview::{MapRecord, Record, RecordSource};

/// Failure raised by [`CountingSource`] when a fail flag is set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubError {
    /// `enumerate` was called with `fail_on_enumerate` set.
    #[error("simulated enumerate failure")]
    Enumerate,
    /// `requery` was called with `fail_on_requery` set.
    #[error("simulated requery failure")]
    Requery,
}

/// [`RecordSource`] fake over mutable rows.
///
/// Clones and `requery` handles share rows, counters, and fail flags, so a
/// test can keep one handle for inspection while views hold others.
///
/// # Example
///
/// ```
/// use queryview::View;
/// use queryview_dry_tests::{abc_records, CountingSource};
///
/// let source = CountingSource::new(abc_records());
/// let view = View::new(source.clone());
/// assert_eq!(view.count().unwrap(), 3);
/// assert_eq!(view.count().unwrap(), 3);
/// assert_eq!(source.enumerate_count(), 1);
/// ```
#[derive(Debug)]
pub struct CountingSource<R = MapRecord> {
    inner: Arc<Mutex<Inner<R>>>,
    model: Arc<str>,
}

#[derive(Debug)]
struct Inner<R> {
    rows: Vec<R>,
    enumerate_count: usize,
    requery_count: usize,
    fail_on_enumerate: bool,
    fail_on_requery: bool,
}

impl<R> Clone for CountingSource<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            model: Arc::clone(&self.model),
        }
    }
}

impl<R> CountingSource<R> {
    /// Stub serving `rows` under the model label `"record"`.
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rows,
                enumerate_count: 0,
                requery_count: 0,
                fail_on_enumerate: false,
                fail_on_requery: false,
            })),
            model: Arc::from("record"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the model label.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Arc::from(model);
        self
    }

    /// Replace the backing rows (the next enumerate sees them).
    pub fn set_rows(&self, rows: Vec<R>) {
        self.lock().rows = rows;
    }

    /// Make `enumerate` fail until cleared.
    pub fn set_fail_on_enumerate(&self, fail: bool) {
        self.lock().fail_on_enumerate = fail;
    }

    /// Make `requery` fail until cleared.
    pub fn set_fail_on_requery(&self, fail: bool) {
        self.lock().fail_on_requery = fail;
    }

    /// `enumerate` calls attempted, including failed ones.
    pub fn enumerate_count(&self) -> usize {
        self.lock().enumerate_count
    }

    /// `requery` calls attempted, including failed ones.
    pub fn requery_count(&self) -> usize {
        self.lock().requery_count
    }
}

impl<R: Record + Clone> RecordSource for CountingSource<R> {
    type Record = R;
    type Error = StubError;

    fn enumerate(&self) -> Result<Vec<R>, StubError> {
        let mut inner = self.lock();
        inner.enumerate_count += 1;
        if inner.fail_on_enumerate {
            return Err(StubError::Enumerate);
        }
        Ok(inner.rows.clone())
    }

    fn requery(&self) -> Result<Self, StubError> {
        let mut inner = self.lock();
        inner.requery_count += 1;
        if inner.fail_on_requery {
            return Err(StubError::Requery);
        }
        drop(inner);
        Ok(self.clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc_records;

    #[test]
    fn failed_enumerate_is_counted() {
        let src = CountingSource::new(abc_records());
        src.set_fail_on_enumerate(true);
        assert_eq!(src.enumerate(), Err(StubError::Enumerate));
        src.set_fail_on_enumerate(false);
        assert_eq!(src.enumerate().unwrap().len(), 3);
        assert_eq!(src.enumerate_count(), 2);
    }

    #[test]
    fn requery_shares_rows_and_counters() {
        let src = CountingSource::new(abc_records()).with_model("Row");
        let again = src.requery().unwrap();
        src.set_rows(Vec::new());
        assert!(again.enumerate().unwrap().is_empty());
        assert_eq!(src.enumerate_count(), 1);
        assert_eq!(src.requery_count(), 1);
        assert_eq!(again.model_name(), "Row");
    }

    #[test]
    fn failing_requery() {
        let src = CountingSource::new(abc_records());
        src.set_fail_on_requery(true);
        assert_eq!(src.requery().err(), Some(StubError::Requery));
    }
}
