// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filter predicates and the `__in` lookup convention.

use std::fmt;

use crate::{Record, Value};

/// Field-name suffix that switches a criterion to membership semantics.
pub const IN_SUFFIX: &str = "__in";

/// Comparison applied by a [`Predicate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Field value equals the expected value.
    Exact,
    /// Field value differs from the expected value.
    NotExact,
    /// Field value is one of the expected candidates.
    In,
    /// Field value is none of the expected candidates.
    NotIn,
}

/// Which composition call produced a criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compose {
    /// Keep matching records (`View::filter`).
    Filter,
    /// Drop matching records (`View::exclude`).
    Exclude,
}

impl Compose {
    /// Lookup for a criterion key, given whether it carried the `__in` suffix.
    pub fn lookup(self, membership: bool) -> Lookup {
        match (self, membership) {
            (Self::Filter, false) => Lookup::Exact,
            (Self::Exclude, false) => Lookup::NotExact,
            (Self::Filter, true) => Lookup::In,
            (Self::Exclude, true) => Lookup::NotIn,
        }
    }
}

/// One `(lookup, field, expected)` test against a record. Immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    lookup: Lookup,
    field: String,
    expected: Value,
}

impl Predicate {
    /// Build a predicate with an explicit lookup.
    pub fn new(lookup: Lookup, field: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            lookup,
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Build a predicate from a criterion key the way `filter`/`exclude` do.
    ///
    /// A key ending in [`IN_SUFFIX`] has the suffix stripped and becomes a
    /// membership test; any other key becomes an equality test.
    pub fn compose(mode: Compose, key: &str, expected: Value) -> Self {
        match key.strip_suffix(IN_SUFFIX) {
            Some(field) => Self::new(mode.lookup(true), field, expected),
            None => Self::new(mode.lookup(false), key, expected),
        }
    }

    /// The comparison this predicate applies.
    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// Attribute name (suffix already stripped).
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Comparison value (candidate set for membership lookups).
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Evaluate against `record`.
    ///
    /// An absent attribute fails `Exact`/`In` and passes `NotExact`/`NotIn`.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let actual = record.field(&self.field);
        match (self.lookup, actual) {
            (Lookup::Exact, Some(v)) => v == self.expected,
            (Lookup::NotExact, Some(v)) => v != self.expected,
            (Lookup::In, Some(v)) => v.is_member_of(&self.expected),
            (Lookup::NotIn, Some(v)) => !v.is_member_of(&self.expected),
            (Lookup::Exact | Lookup::In, None) => false,
            (Lookup::NotExact | Lookup::NotIn, None) => true,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.lookup {
            Lookup::Exact => "==",
            Lookup::NotExact => "!=",
            Lookup::In => "in",
            Lookup::NotIn => "not in",
        };
        write!(f, "{} {op} {}", self.field, self.expected)
    }
}

/// Returns `true` if `record` passes every predicate. Stops at the first miss.
pub(crate) fn all_match<R: Record + ?Sized>(predicates: &[Predicate], record: &R) -> bool {
    predicates.iter().all(|p| p.matches(record))
}
