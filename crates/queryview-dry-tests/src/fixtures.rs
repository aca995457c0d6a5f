// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical record fixtures.

use queryview::MapRecord;

/// Record with integer fields `a` and `b`.
pub fn ab(a: i64, b: i64) -> MapRecord {
    MapRecord::from_pairs([("a", a), ("b", b)])
}

/// `[{a:1,b:1}, {a:1,b:2}, {a:2,b:1}]`, in that order.
pub fn abc_records() -> Vec<MapRecord> {
    vec![ab(1, 1), ab(1, 2), ab(2, 1)]
}
