use std::path::PathBuf;

use arbor_types::ObjectFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arbor",
    about = "Arbor: content-addressed tree snapshots and diffs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Digest algorithm for object ids (sha1 or sha256)
    #[arg(long, global = true, default_value = "sha1")]
    pub object_format: ObjectFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes between two directories
    Diff(DiffArgs),
    /// Compute the blob id of a file
    HashObject(HashObjectArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// One line per change: status letter and path
    #[arg(long)]
    pub name_status: bool,
    /// Leave out files and directories whose names start with '.'
    #[arg(long)]
    pub no_hidden: bool,
    /// JSON file with snapshot settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    pub file: PathBuf,
}
