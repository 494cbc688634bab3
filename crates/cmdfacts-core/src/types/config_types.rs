//! Configuration types shared by every extension of a run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default compiler recognition patterns: generic `cc`, versioned gcc/g++/mcc,
/// versioned clang.
pub const DEFAULT_CC_WHICH_LIST: &[&str] = &[
    r"^.*cc$",
    r"^.*[mg]cc(-?\d+(\.\d+){0,2})?$",
    r"^.*clang(-?\d+(\.\d+){0,2})?$",
];

/// Configuration mapping handed to every extension of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionConfig {
    /// Logging verbosity (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Compiler command extraction settings
    #[serde(default)]
    pub cc: CcConfig,

    /// Raw fact source settings
    #[serde(default)]
    pub info: InfoConfig,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cc: CcConfig::default(),
            info: InfoConfig::default(),
        }
    }
}

/// Settings for the `CC` extension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct CcConfig {
    /// Regular expressions matched against the executable of each command
    #[serde(default = "default_which_list")]
    pub which_list: Vec<String>,

    /// Include system headers in dependency discovery (`-M` rather than `-MM`)
    #[serde(default = "default_true")]
    pub with_system_header_files: bool,

    /// Forward every discovered dependency to the `Storage` extension
    #[serde(default)]
    pub store_deps: bool,
}

impl Default for CcConfig {
    fn default() -> Self {
        Self {
            which_list: default_which_list(),
            with_system_header_files: true,
            store_deps: false,
        }
    }
}

/// Settings for the `Info` extension
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct InfoConfig {
    /// Directory holding raw fact files produced by an external stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_which_list() -> Vec<String> {
    DEFAULT_CC_WHICH_LIST.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}
