// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! queryview CLI entrypoint.
//!
//! Loads a JSON record file, composes `--filter`/`--exclude` criteria into a
//! view, and runs one query against it.
//!
//! # Usage
//! ```text
//! queryview --data books.json -f author=Herbert -x tags__in=draft count
//! queryview --data books.json get id=7
//! queryview prefs set --data books.json --format table
//! ```
//!
//! Exits `0` on success. `get` exits non-zero when zero or several records
//! match.
// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod parse;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use queryview::View;
use queryview_app::{ConfigService, OutputFormat, QueryPrefs, PREFS_KEY};
use queryview_config_fs::FsConfigStore;
use queryview_json::JsonFileSource;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Filter, count, and look up records in JSON files")]
struct Args {
    /// JSON file holding an array of objects (defaults to the saved prefs)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Model label used in "not found" messages
    #[arg(long)]
    model: Option<String>,
    /// Directory holding saved prefs (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Output format: json or table
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Keep records where K equals V (K__in=V1,V2 for membership); repeatable
    #[arg(short = 'f', long = "filter", value_name = "K=V")]
    filters: Vec<String>,
    /// Drop records where K equals V (K__in=V1,V2 for membership); repeatable
    #[arg(short = 'x', long = "exclude", value_name = "K=V")]
    excludes: Vec<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Query(QueryCommand),
    /// Show or update saved preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// Print every matching record
    List,
    /// Print the number of matching records
    Count,
    /// Print whether any record matches
    Exists,
    /// Print the first matching record, or null
    First,
    /// Print the last matching record, or null
    Last,
    /// Print the single record matching K=V criteria; fails on zero or many
    Get {
        /// Criteria, e.g. `id=7`
        #[arg(value_name = "K=V", required = true)]
        criteria: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Print the saved preferences as JSON
    Show,
    /// Update saved preferences; omitted flags keep their value
    Set {
        /// Default dataset path
        #[arg(long)]
        data: Option<PathBuf>,
        /// Default model label
        #[arg(long)]
        model: Option<String>,
        /// Default output format
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Log filter used when RUST_LOG is unset
        #[arg(long)]
        log_filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    let config = ConfigService::new(store);
    let prefs: QueryPrefs = config.load_or_default(PREFS_KEY).context("load prefs")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&prefs.log_filter))
        .context("parse log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.cmd {
        Command::Prefs { action } => run_prefs(&config, prefs, action, &mut out),
        Command::Query(query) => run_query(&args, &prefs, query, &mut out),
    }
}

fn run_prefs(
    config: &ConfigService<FsConfigStore>,
    mut prefs: QueryPrefs,
    action: &PrefsAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        PrefsAction::Show => {}
        PrefsAction::Set {
            data,
            model,
            format,
            log_filter,
        } => {
            if let Some(data) = data {
                prefs.default_dataset = Some(data.clone());
            }
            if let Some(model) = model {
                prefs.model.clone_from(model);
            }
            if let Some(format) = format {
                prefs.format = *format;
            }
            if let Some(log_filter) = log_filter {
                prefs.log_filter.clone_from(log_filter);
            }
            config.save(PREFS_KEY, &prefs).context("save prefs")?;
            debug!(dir = %config.store().base().display(), "saved prefs");
        }
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
    Ok(())
}

fn run_query(
    args: &Args,
    prefs: &QueryPrefs,
    cmd: &QueryCommand,
    out: &mut impl Write,
) -> Result<()> {
    let path = args
        .data
        .clone()
        .or_else(|| prefs.default_dataset.clone())
        .ok_or_else(|| anyhow!("no dataset: pass --data or run `queryview prefs set --data`"))?;
    let model = args.model.as_deref().unwrap_or(&prefs.model);
    let format = args.format.unwrap_or(prefs.format);

    let mut view = View::new(JsonFileSource::new(path).with_model(model));
    if !args.filters.is_empty() {
        view = view.filter(parse::criteria(&args.filters)?);
    }
    if !args.excludes.is_empty() {
        view = view.exclude(parse::criteria(&args.excludes)?);
    }
    debug!(predicates = view.predicates().len(), "composed view");

    match cmd {
        QueryCommand::List => render::records(out, format, &view.to_vec()?)?,
        QueryCommand::Count => writeln!(out, "{}", view.count()?)?,
        QueryCommand::Exists => writeln!(out, "{}", view.exists()?)?,
        QueryCommand::First => render::optional(out, format, view.first()?.as_ref())?,
        QueryCommand::Last => render::optional(out, format, view.last()?.as_ref())?,
        QueryCommand::Get { criteria } => {
            let record = view.get(parse::criteria(criteria)?)?;
            render::records(out, format, std::slice::from_ref(&record))?;
        }
    }
    Ok(())
}
