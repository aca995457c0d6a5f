// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised by view operations.

use thiserror::Error;

use crate::Criteria;

/// Failure of a [`View`](crate::View) operation.
///
/// Only [`View::get`](crate::View::get) produces `NotFound` and
/// `AmbiguousResult`. Every other failure is the record source's own error,
/// carried in [`ViewError::Source`] untranslated.
#[derive(Debug, Error)]
pub enum ViewError<E>
where
    E: std::error::Error + 'static,
{
    /// `get` matched zero records.
    #[error("{model} matching query does not exist ({criteria})")]
    NotFound {
        /// Model label supplied by the record source.
        model: String,
        /// Criteria passed to `get`.
        criteria: Criteria,
    },
    /// `get` matched more than one record.
    #[error("get() returned more than one {model} -- it returned {count}")]
    AmbiguousResult {
        /// Model label supplied by the record source.
        model: String,
        /// Number of records that matched.
        count: usize,
    },
    /// The record source failed while enumerating or re-querying.
    #[error(transparent)]
    Source(E),
}

impl<E> ViewError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns `true` for [`ViewError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`ViewError::AmbiguousResult`].
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousResult { .. })
    }

    /// Recover the source error, if that is what this is.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Source(e) => Some(e),
            _ => None,
        }
    }
}
