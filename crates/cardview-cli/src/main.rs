// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Card-view developer CLI.
//!
//! - `cardview replay --db fixture.json script.nav` drives a navigation
//!   controller headlessly and prints what the page was told to do, the final
//!   history and the MRU list.
//! - `cardview hash --kind Name '{"first_name":"Ada"}'` prints the locator key
//!   a secondary sub-record would be addressed by.
//!
//! Logs go to stderr (`RUST_LOG` controls the level); results go to stdout.

mod replay;
mod script;

use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context as _, Result};
use cardview_model::records::{Address, Attribute, LdsOrd, Name, Url};
use cardview_model::{Handle, MemoryDb, ObjectType, Secondary};
use cardview_nav::secondary_key;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardview", about = "Card-view navigation developer tools", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a navigation script against a JSON fixture database.
    Replay(ReplayArgs),
    /// Print the locator key of a secondary sub-record.
    Hash(HashArgs),
}

#[derive(Args)]
struct ReplayArgs {
    /// Fixture: `{ "records": [ { "type": "Person", ... } ] }`.
    #[arg(long)]
    db: PathBuf,

    /// Navigation type of the view being driven.
    #[arg(long, default_value = "Person")]
    view: ObjectType,

    /// Script file, one step per line.
    script: PathBuf,
}

#[derive(Args)]
struct HashArgs {
    /// Secondary type: Name, Address, Attribute, LdsOrd, Url or Tag.
    #[arg(long)]
    kind: ObjectType,

    /// Record as JSON (a bare handle for Tag).
    record: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Replay(args) => run_replay(&args, &mut out),
        Commands::Hash(args) => run_hash(&args, &mut out),
    }
}

fn run_replay(args: &ReplayArgs, out: &mut impl Write) -> Result<()> {
    let fixture = std::fs::read_to_string(&args.db)
        .with_context(|| format!("failed to read {}", args.db.display()))?;
    let db = Rc::new(MemoryDb::from_json(&fixture)?);
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    let steps = script::parse(&text)?;
    let report = replay::run(&db, args.view, &steps)?;

    for line in &report.transcript {
        writeln!(out, "{line}")?;
    }

    let mut table = Table::new();
    table.set_header(["#", "", "locator"]);
    for (i, loc) in report.history.iter().enumerate() {
        let cursor = if report.index == Some(i) { ">" } else { "" };
        table.add_row([i.to_string(), cursor.to_owned(), loc.to_string()]);
    }
    writeln!(out, "{table}")?;

    let mru: Vec<String> = report
        .mru
        .iter()
        .map(|(kind, handle)| format!("{kind}:{handle}"))
        .collect();
    writeln!(out, "mru: {}", mru.join(" "))?;
    if !report.rebuilds.is_empty() {
        let at: Vec<String> = report.rebuilds.iter().map(|ms| format!("{ms}ms")).collect();
        writeln!(out, "rebuilds: {}", at.join(" "))?;
    }
    Ok(())
}

fn run_hash(args: &HashArgs, out: &mut impl Write) -> Result<()> {
    let raw = args.record.as_str();
    let record = match args.kind {
        ObjectType::Name => Secondary::Name(serde_json::from_str::<Name>(raw)?),
        ObjectType::Address => Secondary::Address(serde_json::from_str::<Address>(raw)?),
        ObjectType::Attribute => Secondary::Attribute(serde_json::from_str::<Attribute>(raw)?),
        ObjectType::LdsOrd => Secondary::LdsOrd(serde_json::from_str::<LdsOrd>(raw)?),
        ObjectType::Url => Secondary::Url(serde_json::from_str::<Url>(raw)?),
        ObjectType::Tag => Secondary::Tag(Handle::new(raw)),
        other => bail!("{other} is not a secondary type"),
    };
    writeln!(out, "{}", secondary_key(&record)?)?;
    Ok(())
}
