//! Intercepted and normalized build command types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One intercepted build invocation, as written by the interception shim
///
/// The raw command batch is a JSON Lines file with one of these per line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawCommand {
    /// Identifier, unique within the batch
    pub id: String,

    /// Working directory at invocation time
    pub cwd: PathBuf,

    /// Resolved executable path
    pub which: String,

    /// Full argument vector, including argv[0]
    pub command: Vec<String>,
}

/// A normalized build command
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommandRecord {
    /// Identifier, unique within the batch
    pub id: String,

    /// Resolved executable
    pub command: String,

    /// Options in their original order; persisted separately from the record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<String>,

    /// Input files as written on the command line
    #[serde(rename = "in", default)]
    pub inputs: Vec<String>,

    /// Output files
    #[serde(default)]
    pub out: Vec<String>,

    /// Working directory at invocation time
    pub cwd: PathBuf,

    /// Dependency set, present only when joined by a loader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<BTreeSet<String>>,
}

impl CommandRecord {
    /// True if the command reads its input from standard input
    pub fn reads_stdin(&self) -> bool {
        self.inputs.iter().any(|i| i == "-") || self.opts.iter().any(|o| o == "-")
    }
}
