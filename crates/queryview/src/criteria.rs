// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ordered `field -> value` criteria passed to `filter`, `exclude`, and `get`.

use std::fmt;

use crate::Value;

/// Ordered list of `(key, expected)` criteria.
///
/// Keys follow the lookup convention: `"a"` is an equality test on `a`,
/// `"a__in"` is a membership test on `a`. Criteria are combined with AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Value)>,
}

impl Criteria {
    /// No criteria. `filter(Criteria::new())` yields an equivalent view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key = value` and return `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Append `key = value` in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Iterate criteria in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of criteria.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Criteria {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Build [`Criteria`] from `key => value` pairs; values may differ in type.
///
/// ```
/// use queryview::criteria;
///
/// let c = criteria! { "status" => "open", "id__in" => [1, 2, 3] };
/// assert_eq!(c.len(), 2);
/// ```
#[macro_export]
macro_rules! criteria {
    () => {
        $crate::Criteria::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Criteria::new()$(.with($key, $value))+
    };
}
