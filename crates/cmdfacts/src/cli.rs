//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// cmdfacts - Extract compilation facts from intercepted build commands
#[derive(Parser, Debug)]
#[command(name = "cmdfacts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to cmdfacts.yaml config file
    #[arg(short, long, global = true, env = "CMDFACTS_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one extension (and its prerequisites) over a command batch
    Parse(ParseArgs),

    /// List the registered extensions
    Extensions(ExtensionsArgs),
}

// Parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Extension to run (e.g. CC, Macros, Typedefs)
    pub extension: String,

    /// Raw command batch (JSON Lines)
    pub cmds_file: Utf8PathBuf,

    /// Working root; each extension writes to <work-dir>/<Name>
    #[arg(short, long, default_value = "cmdfacts-work")]
    pub work_dir: Utf8PathBuf,
}

// Extensions command
#[derive(Args, Debug)]
pub struct ExtensionsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
