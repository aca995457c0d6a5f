// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! queryview: lazily evaluated, filterable views over a fetch-once record cache.
//!
//! A [`View`] wraps a [`RecordSource`] (a live provider such as a database
//! query object) and composes filter predicates without touching the source.
//! Nothing is fetched until a view is iterated; the first iteration
//! materializes the source into a [`ResultCache`] that every view derived from
//! the same root shares.
//!
//! ```
//! use queryview::{criteria, MapRecord, VecSource, View};
//!
//! let source = VecSource::new(vec![
//!     MapRecord::from_pairs([("a", 1), ("b", 1)]),
//!     MapRecord::from_pairs([("a", 1), ("b", 2)]),
//!     MapRecord::from_pairs([("a", 2), ("b", 1)]),
//! ]);
//! let view = View::new(source);
//! let ones = view.filter(criteria! { "a" => 1 });
//! assert_eq!(ones.count().unwrap(), 2);
//! assert_eq!(view.exclude(criteria! { "a__in" => [1] }).count().unwrap(), 1);
//! ```
//!
//! # Cache Sharing Contract
//!
//! [`View::filter`] and [`View::exclude`] hand the *same* cache handle to the
//! derived view. [`View::refresh`] resets that shared cache in place, so every
//! view holding the handle re-fetches on its next iteration, including
//! siblings that never asked for a refresh.
//!
//! # Threading
//!
//! Views are synchronous. The cache's fetch-or-return step runs under a mutex,
//! so concurrent first access from several threads still enumerates the source
//! once.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod cache;
mod criteria;
mod error;
mod predicate;
mod record;
mod source;
mod value;
mod view;

pub use cache::ResultCache;
pub use criteria::Criteria;
pub use error::ViewError;
pub use predicate::{Compose, Lookup, Predicate, IN_SUFFIX};
pub use record::{MapRecord, Record};
pub use source::{RecordSource, VecSource};
pub use value::Value;
pub use view::{Records, View};
