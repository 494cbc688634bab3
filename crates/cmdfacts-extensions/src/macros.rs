//! Macro definitions and expansions
//!
//! Definitions arrive as `<file> <macro> <location>` and are kept per file
//! and macro in stream order, duplicates included. Expansions arrive as
//! `<file> <macro><rest>` where `<rest>` is a comma-separated list; every
//! ` actual_argN=<value>` entry contributes `<value>` to the argument list of
//! that occurrence and other entries are ignored.

use crate::extension::{Extension, ExtensionBase};
use crate::facts::{aggregate, FactFold};
use crate::info::fact_source;
use cmdfacts_core::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S*) (\S*) (\S*)").expect("valid definition regex"));

static EXPANSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S*) (\S*)(.*)").expect("valid expansion regex"));

static ACTUAL_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ actual_arg\d+=(.*)").expect("valid argument regex"));

const DEFINE_FOLDER: &str = "define";
const EXPAND_FOLDER: &str = "expand";

/// Definition locations per file, then per macro
pub type MacroDefinitions = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Expansions per file, then per macro
pub type MacroExpansions = BTreeMap<String, BTreeMap<String, MacroExpansion>>;

/// All expansions of one macro in one file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroExpansion {
    /// One argument list per occurrence, in stream order
    pub args: Vec<Vec<String>>,
}

/// Fold for macro definition lines
#[derive(Debug, Default)]
pub struct DefinitionFold(MacroDefinitions);

impl FactFold for DefinitionFold {
    type Shard = BTreeMap<String, Vec<String>>;

    fn add_line(&mut self, line: &str) -> bool {
        let Some(caps) = DEFINITION_RE.captures(line) else {
            return false;
        };

        self.0
            .entry(caps[1].to_string())
            .or_default()
            .entry(caps[2].to_string())
            .or_default()
            .push(caps[3].to_string());
        true
    }

    fn into_map(self) -> MacroDefinitions {
        self.0
    }
}

/// Fold for macro expansion lines
#[derive(Debug, Default)]
pub struct ExpansionFold(MacroExpansions);

impl FactFold for ExpansionFold {
    type Shard = BTreeMap<String, MacroExpansion>;

    fn add_line(&mut self, line: &str) -> bool {
        let Some(caps) = EXPANSION_RE.captures(line) else {
            return false;
        };

        let args = caps[3]
            .split(',')
            .filter_map(|entry| ACTUAL_ARG_RE.captures(entry))
            .map(|arg| arg[1].to_string())
            .collect();

        self.0
            .entry(caps[1].to_string())
            .or_default()
            .entry(caps[2].to_string())
            .or_default()
            .args
            .push(args);
        true
    }

    fn into_map(self) -> MacroExpansions {
        self.0
    }
}

#[derive(Debug)]
pub struct Macros {
    base: ExtensionBase,
}

impl Macros {
    pub fn new(base: ExtensionBase) -> Result<Self> {
        Ok(Self { base })
    }

    /// Stored definitions, restricted to `files` if given
    pub fn load_macros_definitions(&self, files: Option<&[String]>) -> Result<MacroDefinitions> {
        self.base.load_by_key(DEFINE_FOLDER, files)
    }

    /// Stored expansions, restricted to `files` if given
    pub fn load_macros_expansions(&self, files: Option<&[String]>) -> Result<MacroExpansions> {
        self.base.load_by_key(EXPAND_FOLDER, files)
    }
}

impl Extension for Macros {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn parse(&self, cmds_file: &Path) -> Result<()> {
        let _span = self.base.span().entered();

        if self.base.is_parsed() {
            info!("Skip parsing");
            return Ok(());
        }

        self.base.discard_partial()?;
        self.base.parse_prerequisites(cmds_file)?;
        let source = fact_source(&self.base, "Info")?;

        info!("Processing macros definitions");
        let mut define = DefinitionFold::default();
        aggregate(source.iter_macros_definitions()?, &mut define)?;

        info!("Processing macros expansions");
        let mut expand = ExpansionFold::default();
        aggregate(source.iter_macros_expansions()?, &mut expand)?;

        info!("Dump parsed data");
        self.base.store_by_key(&define.into_map(), DEFINE_FOLDER)?;
        self.base.store_by_key(&expand.into_map(), EXPAND_FOLDER)?;

        self.base.mark_parsed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
