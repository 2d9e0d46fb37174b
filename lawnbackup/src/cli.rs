use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "lawnbackup",
    about = "Create, inspect and restore launcher backup archives.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(visible_alias = "c", about = "Create a new backup archive")]
    Create(CreateArgs),

    #[command(visible_alias = "r", about = "Restore application files from an archive")]
    Restore(RestoreArgs),

    #[command(visible_alias = "i", about = "Show an archive's metadata record")]
    Info(InfoArgs),

    #[command(visible_aliases = ["l", "ls"], about = "List entries in an archive")]
    List(ListArgs),
}

#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    /// Display label stored in the archive metadata
    pub name: String,

    /// Profile directory holding the launcher state files
    #[arg(short, long, value_name = "DIR")]
    pub profile: PathBuf,

    /// Include the launcher database
    #[arg(long)]
    pub homescreen: bool,

    /// Include the preferences file
    #[arg(long)]
    pub settings: bool,

    /// Include every category
    #[arg(short, long, conflicts_with_all = ["homescreen", "settings"])]
    pub all: bool,

    /// Where to write the archive [default: <profile>/backups/<name>.lawnchairbackup]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct RestoreArgs {
    /// Path to the backup archive
    pub archive: PathBuf,

    /// Profile directory holding the launcher state files
    #[arg(short, long, value_name = "DIR")]
    pub profile: PathBuf,

    /// Restore the launcher database
    #[arg(long)]
    pub homescreen: bool,

    /// Restore the preferences file
    #[arg(long)]
    pub settings: bool,

    /// Restore every category the archive contains
    #[arg(short, long, conflicts_with_all = ["homescreen", "settings"])]
    pub all: bool,
}

#[derive(Debug, clap::Args)]
pub struct InfoArgs {
    /// Path to the backup archive
    pub archive: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Path to the backup archive
    pub archive: PathBuf,
}
