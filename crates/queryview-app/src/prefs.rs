// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for the queryview CLI.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Config key the prefs are stored under.
pub const PREFS_KEY: &str = "prefs";

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Aligned table, one column per field.
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Table => "table",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// CLI defaults persisted between runs. Command-line flags win over these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPrefs {
    /// Dataset used when `--data` is not given.
    pub default_dataset: Option<PathBuf>,
    /// Model label reported in "not found" errors.
    pub model: String,
    /// Output format.
    pub format: OutputFormat,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for QueryPrefs {
    fn default() -> Self {
        Self {
            default_dataset: None,
            model: "record".to_owned(),
            format: OutputFormat::Json,
            log_filter: "warn".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_blob_fills_defaults() {
        let prefs: QueryPrefs = serde_json::from_str(r#"{"format":"table"}"#).unwrap();
        assert_eq!(prefs.format, OutputFormat::Table);
        assert_eq!(prefs.model, "record");
        assert_eq!(prefs.log_filter, "warn");
        assert!(prefs.default_dataset.is_none());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
