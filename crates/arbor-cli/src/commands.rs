use std::fs;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use arbor_crypto::ObjectHasher;
use arbor_diff::{diff_trees, Action, Change, Changes, NoderPath};
use arbor_store::{Blob, InMemoryObjectStore};
use arbor_types::ObjectFormat;

use crate::cli::*;
use crate::snapshot::{snapshot_dir, SnapshotConfig};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.object_format, &cli.format),
        Command::HashObject(args) => cmd_hash_object(args, cli.object_format),
    }
}

fn cmd_diff(args: DiffArgs, object_format: ObjectFormat, format: &OutputFormat) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => SnapshotConfig::load(path)?,
        None => SnapshotConfig::default(),
    };
    if args.no_hidden {
        config.include_hidden = false;
    }

    let store = InMemoryObjectStore::with_format(object_format);
    let old = snapshot_dir(&store, &args.old, &config)?;
    let new = snapshot_dir(&store, &args.new, &config)?;
    let changes = diff_trees(&store, Some(&old), Some(&new))?;

    match format {
        OutputFormat::Json => {
            let records = changes
                .iter()
                .map(ChangeRecord::from_change)
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Text if args.name_status => print!("{}", name_status(&changes)?),
        OutputFormat::Text => print_changes(&changes)?,
    }
    Ok(())
}

fn cmd_hash_object(args: HashObjectArgs, object_format: ObjectFormat) -> anyhow::Result<()> {
    let data = fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let hasher = ObjectHasher::with_defaults(object_format);
    println!("{}", Blob::new(data).to_stored_object().compute_id(&hasher));
    Ok(())
}

fn status_letter(action: Action) -> &'static str {
    match action {
        Action::Insert => "A",
        Action::Delete => "D",
        Action::Modify => "M",
    }
}

/// `git diff --name-status` style listing, one change per line.
fn name_status(changes: &Changes) -> anyhow::Result<String> {
    let mut out = String::new();
    for change in changes {
        out.push_str(status_letter(change.action()?));
        out.push('\t');
        out.push_str(&change.path());
        out.push('\n');
    }
    Ok(out)
}

fn print_changes(changes: &Changes) -> anyhow::Result<()> {
    if changes.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    for change in changes {
        let path = change.path();
        match change.action()? {
            Action::Insert => println!("  {} {}", "inserted:".green(), path),
            Action::Delete => println!("  {} {}", "deleted: ".red(), path),
            Action::Modify => println!("  {} {}", "modified:".yellow(), path),
        }
    }
    let count = |a| changes.with_action(a).count();
    println!(
        "\n{} inserted, {} deleted, {} modified",
        count(Action::Insert).to_string().green().bold(),
        count(Action::Delete).to_string().red().bold(),
        count(Action::Modify).to_string().yellow().bold(),
    );
    Ok(())
}

/// JSON view of one change.
#[derive(Debug, Serialize)]
struct ChangeRecord {
    action: String,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    old: Option<EntryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new: Option<EntryRecord>,
}

#[derive(Debug, Serialize)]
struct EntryRecord {
    mode: String,
    id: String,
}

impl EntryRecord {
    fn from_path(path: &NoderPath) -> Option<Self> {
        path.last().map(|noder| Self {
            mode: noder.mode().to_string(),
            id: noder.hash().to_hex(),
        })
    }
}

impl ChangeRecord {
    fn from_change(change: &Change) -> anyhow::Result<Self> {
        Ok(Self {
            action: change.action()?.to_string(),
            path: change.path(),
            old: change.from.as_ref().and_then(EntryRecord::from_path),
            new: change.to.as_ref().and_then(EntryRecord::from_path),
        })
    }
}
