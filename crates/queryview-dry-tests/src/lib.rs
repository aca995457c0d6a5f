// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for queryview crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`fixtures`] - The three-record `a`/`b` dataset used across view tests
//! - [`probe`] - Records that log which rows had attributes read
//! - [`source`] - Record source stub with call counters and failure injection

pub mod config;
pub mod fixtures;
pub mod probe;
pub mod source;

pub use config::InMemoryConfigStore;
pub use fixtures::{ab, abc_records};
pub use probe::{Probe, ProbeRecord};
pub use source::{CountingSource, StubError};
