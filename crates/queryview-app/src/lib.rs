// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for queryview tools (config port, saved prefs).
//! Keeps the CLI thin and storage-agnostic.

pub mod config;
pub mod prefs;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use prefs::{OutputFormat, QueryPrefs, PREFS_KEY};
