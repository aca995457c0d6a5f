// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Records that report which rows had their attributes read.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use queryview::{MapRecord, Record, Value};

/// Shared log of row indices whose attributes were read.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    touched: Arc<Mutex<Vec<usize>>>,
}

impl Probe {
    /// Empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `rows`, tagging each with its index and this probe.
    pub fn wrap(&self, rows: Vec<MapRecord>) -> Vec<ProbeRecord> {
        rows.into_iter()
            .enumerate()
            .map(|(index, inner)| ProbeRecord {
                index,
                inner,
                probe: self.clone(),
            })
            .collect()
    }

    /// Total attribute reads so far.
    pub fn lookups(&self) -> usize {
        self.touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Distinct row indices read so far, ascending.
    pub fn rows_touched(&self) -> Vec<usize> {
        self.touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Forget all recorded reads.
    pub fn clear(&self) {
        self.touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// A [`MapRecord`] that logs every attribute read to its [`Probe`].
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    index: usize,
    inner: MapRecord,
    probe: Probe,
}

impl ProbeRecord {
    /// Position of this row in the wrapped input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The wrapped record.
    pub fn inner(&self) -> &MapRecord {
        &self.inner
    }
}

impl Record for ProbeRecord {
    fn field(&self, name: &str) -> Option<Value> {
        self.probe
            .touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(self.index);
        self.inner.field(name)
    }
}
