// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Composable, lazily evaluated views over a shared result cache.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::predicate::all_match;
use crate::{Compose, Criteria, Predicate, Record, RecordSource, ResultCache, ViewError};

/// Filtered perspective over a record source.
///
/// Holds the source, a shared [`ResultCache`] handle, and its own immutable
/// predicate list. Composition never fetches; iteration pulls the cached
/// sequence (fetching it on first use) and applies the predicates per record.
pub struct View<S: RecordSource> {
    source: Arc<S>,
    cache: ResultCache<S::Record>,
    predicates: Arc<[Predicate]>,
}

type ViewResult<T, S> = Result<T, ViewError<<S as RecordSource>::Error>>;

impl<S: RecordSource> View<S> {
    /// Root view over `source`: fresh empty cache, no predicates.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            cache: ResultCache::new(),
            predicates: Arc::from(Vec::new()),
        }
    }

    /// Derived view keeping records that match every criterion.
    ///
    /// Plain keys test equality; `__in` keys test membership.
    pub fn filter(&self, criteria: impl Into<Criteria>) -> Self {
        self.compose(Compose::Filter, criteria.into())
    }

    /// Derived view dropping records that match a criterion.
    ///
    /// Each criterion becomes its own negated predicate: plain keys test
    /// inequality, `__in` keys test non-membership.
    pub fn exclude(&self, criteria: impl Into<Criteria>) -> Self {
        self.compose(Compose::Exclude, criteria.into())
    }

    fn compose(&self, mode: Compose, criteria: Criteria) -> Self {
        let mut predicates = self.predicates.to_vec();
        predicates.extend(
            criteria
                .into_iter()
                .map(|(key, value)| Predicate::compose(mode, &key, value)),
        );
        Self {
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
            predicates: predicates.into(),
        }
    }

    /// Lazily iterate the matching records.
    ///
    /// Fetches the source on first use of the shared cache. Each call starts a
    /// new scan over the cached sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Source`] if the source fails to enumerate. The
    /// failure is not cached; the next call retries.
    pub fn iter(&self) -> ViewResult<Records<S::Record>, S> {
        let items = self
            .cache
            .items(&*self.source)
            .map_err(ViewError::Source)?;
        Ok(Records {
            items,
            predicates: Arc::clone(&self.predicates),
            pos: 0,
        })
    }

    /// Same as [`iter`](Self::iter).
    ///
    /// # Errors
    ///
    /// Same as [`iter`](Self::iter).
    pub fn all(&self) -> ViewResult<Records<S::Record>, S> {
        self.iter()
    }

    /// Collect the matching records in order.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Source`] if the source fails to enumerate. The
    /// failure is not cached; the next call retries.
    pub fn to_vec(&self) -> ViewResult<Vec<S::Record>, S> {
        Ok(self.iter()?.collect())
    }

    /// The single record matching `criteria` on top of this view's filters.
    ///
    /// Fails with [`ViewError::NotFound`] on zero matches and
    /// [`ViewError::AmbiguousResult`] on more than one.
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] when nothing matches, [`ViewError::AmbiguousResult`]
    /// when several records match, and [`ViewError::Source`] if the source
    /// fails to enumerate.
    #[instrument(skip_all, fields(model = self.source.model_name()))]
    pub fn get(&self, criteria: impl Into<Criteria>) -> ViewResult<S::Record, S> {
        let criteria = criteria.into();
        let mut matches = self.filter(criteria.clone()).to_vec()?;
        let count = matches.len();
        debug!(%criteria, count, "get");
        if count > 1 {
            return Err(ViewError::AmbiguousResult {
                model: self.source.model_name().to_owned(),
                count,
            });
        }
        matches.pop().ok_or_else(|| ViewError::NotFound {
            model: self.source.model_name().to_owned(),
            criteria,
        })
    }

    /// First matching record, or `None` if there are none.
    ///
    /// # Errors
    ///
    /// Only [`ViewError::Source`]; an empty result is `Ok(None)`.
    pub fn first(&self) -> ViewResult<Option<S::Record>, S> {
        Ok(self.to_vec()?.into_iter().next())
    }

    /// Last matching record, or `None` if there are none.
    ///
    /// # Errors
    ///
    /// Only [`ViewError::Source`]; an empty result is `Ok(None)`.
    pub fn last(&self) -> ViewResult<Option<S::Record>, S> {
        Ok(self.to_vec()?.pop())
    }

    /// Number of matching records. Scans the whole cached sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Source`] if the source fails to enumerate. The
    /// failure is not cached; the next call retries.
    pub fn count(&self) -> ViewResult<usize, S> {
        Ok(self.iter()?.count())
    }

    /// Returns `true` if any record matches. Stops at the first match.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Source`] if the source fails to enumerate. The
    /// failure is not cached; the next call retries.
    pub fn exists(&self) -> ViewResult<bool, S> {
        Ok(self.iter()?.next().is_some())
    }

    /// Re-query the source and reset the shared cache.
    ///
    /// Replaces this view's source with [`RecordSource::requery`] and resets
    /// the cache handle it shares with its parent, siblings, and children, so
    /// all of them re-fetch on their next iteration. Views other than this one
    /// keep their own (older) source handle.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Source`] if [`RecordSource::requery`] fails. The
    /// source and the shared cache are then left untouched.
    #[instrument(skip_all, fields(model = self.source.model_name()))]
    pub fn refresh(&mut self) -> ViewResult<(), S> {
        let fresh = self.source.requery().map_err(ViewError::Source)?;
        self.source = Arc::new(fresh);
        self.cache.reset();
        Ok(())
    }

    /// This view's predicates, in application order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The cache handle shared with related views.
    pub fn cache(&self) -> &ResultCache<S::Record> {
        &self.cache
    }

    /// The source this view fetches from.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: RecordSource> Clone for View<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
            predicates: Arc::clone(&self.predicates),
        }
    }
}

impl<S: RecordSource> fmt::Debug for View<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("model", &self.source.model_name())
            .field("predicates", &self.predicates)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Lazy iterator over the records of one view scan.
///
/// Owns a snapshot of the cached sequence, so a concurrent
/// [`View::refresh`] does not disturb an iteration already in progress.
pub struct Records<R> {
    items: Arc<[R]>,
    predicates: Arc<[Predicate]>,
    pos: usize,
}

impl<R: Record + Clone> Iterator for Records<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        while let Some(record) = self.items.get(self.pos) {
            self.pos += 1;
            if all_match(&self.predicates, record) {
                return Some(record.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.items.len().saturating_sub(self.pos)))
    }
}

impl<R: Record + Clone> FusedIterator for Records<R> {}

impl<R> fmt::Debug for Records<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("len", &self.items.len())
            .field("pos", &self.pos)
            .field("predicates", &self.predicates)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{criteria, Lookup, MapRecord, Value, VecSource};

    fn abc() -> View<VecSource<MapRecord>> {
        View::new(VecSource::new(vec![
            MapRecord::from_pairs([("a", 1), ("b", 1)]),
            MapRecord::from_pairs([("a", 1), ("b", 2)]),
            MapRecord::from_pairs([("a", 2), ("b", 1)]),
        ]))
    }

    #[test]
    fn composition_does_not_fetch() {
        let root = abc();
        let derived = root.filter(criteria! { "a" => 1 }).exclude(criteria! { "b" => 2 });
        assert!(!root.cache().is_populated());
        assert_eq!(derived.predicates().len(), 2);
        assert!(derived.cache().shares_with(root.cache()));
    }

    #[test]
    fn parent_predicates_are_untouched_by_children() {
        let root = abc();
        let a1 = root.filter(criteria! { "a" => 1 });
        let a1b1 = a1.filter(criteria! { "b" => 1 });
        let a1b2 = a1.filter(criteria! { "b" => 2 });
        assert!(root.predicates().is_empty());
        assert_eq!(a1.predicates().len(), 1);
        assert_eq!(a1b1.predicates()[1].expected(), &Value::Int(1));
        assert_eq!(a1b2.predicates()[1].expected(), &Value::Int(2));
    }

    #[test]
    fn exclude_builds_negated_lookups() {
        let v = abc().exclude(criteria! { "a" => 1, "b__in" => [2, 3] });
        let lookups: Vec<_> = v.predicates().iter().map(Predicate::lookup).collect();
        assert_eq!(lookups, [Lookup::NotExact, Lookup::NotIn]);
    }

    #[test]
    fn iteration_is_restartable() {
        let v = abc().filter(criteria! { "b" => 1 });
        let first: Vec<_> = v.iter().unwrap().collect();
        let second: Vec<_> = v.all().unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(v.cache().fetch_count(), 1);
    }

    #[test]
    fn first_and_last_follow_source_order() {
        let v = abc().filter(criteria! { "b" => 1 });
        assert_eq!(v.first().unwrap().unwrap().get("a"), Some(&Value::Int(1)));
        assert_eq!(v.last().unwrap().unwrap().get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn get_reports_model_from_source() {
        let v = View::new(VecSource::<MapRecord>::new(Vec::new()).with_model("Book"));
        let err = v.get(criteria! { "id" => 1 }).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Book matching query does not exist (id=1)");
    }

    #[test]
    fn get_applies_view_filters_too() {
        let v = abc().exclude(criteria! { "b" => 2 });
        let rec = v.get(criteria! { "a" => 1 }).unwrap();
        assert_eq!(rec.get("b"), Some(&Value::Int(1)));
    }

    #[test]
    fn snapshot_survives_refresh_mid_iteration() {
        let src = VecSource::new(vec![
            MapRecord::from_pairs([("n", 1)]),
            MapRecord::from_pairs([("n", 2)]),
        ]);
        let mut v = View::new(src.clone());
        let mut it = v.iter().unwrap();
        assert!(it.next().is_some());
        src.push(MapRecord::from_pairs([("n", 3)]));
        v.refresh().unwrap();
        assert_eq!(it.count(), 1);
        assert_eq!(v.count().unwrap(), 3);
    }

    #[test]
    fn float_criterion_does_not_round_large_ints() {
        let v = View::new(VecSource::new(vec![
            MapRecord::from_pairs([("id", 9_007_199_254_740_993_i64)]),
            MapRecord::from_pairs([("id", 9_007_199_254_740_992_i64)]),
        ]));
        let hits = v.filter(criteria! { "id" => 9_007_199_254_740_992.0 }).to_vec().unwrap();
        assert_eq!(hits, [MapRecord::from_pairs([("id", 9_007_199_254_740_992_i64)])]);
        assert_eq!(v.exclude(criteria! { "id" => 9_007_199_254_740_992.0 }).count().unwrap(), 1);
        assert_eq!(v.filter(criteria! { "id__in" => [9_007_199_254_740_992.0] }).count().unwrap(), 1);
    }

    #[test]
    fn clone_shares_everything() {
        let v = abc().filter(criteria! { "a" => 2 });
        let c = v.clone();
        assert!(c.cache().shares_with(v.cache()));
        assert_eq!(c.predicates(), v.predicates());
    }
}
