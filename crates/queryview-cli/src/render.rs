// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record output as JSON lines or a table.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use comfy_table::Table;
use queryview::{MapRecord, Value};
use queryview_app::OutputFormat;

/// Write `records` in `format`.
pub fn records(out: &mut impl Write, format: OutputFormat, records: &[MapRecord]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for record in records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
        }
        OutputFormat::Table => writeln!(out, "{}", table(records))?,
    }
    Ok(())
}

/// Write one record, or `null` when there is none.
pub fn optional(
    out: &mut impl Write,
    format: OutputFormat,
    record: Option<&MapRecord>,
) -> Result<()> {
    match record {
        Some(record) => records(out, format, std::slice::from_ref(record)),
        None => {
            writeln!(out, "null")?;
            Ok(())
        }
    }
}

fn table(records: &[MapRecord]) -> Table {
    let columns: BTreeSet<&str> = records.iter().flat_map(MapRecord::names).collect();
    let mut table = Table::new();
    table.set_header(columns.iter().copied());
    for record in records {
        table.add_row(columns.iter().map(|name| cell(record.get(name))));
    }
    table
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Str(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
