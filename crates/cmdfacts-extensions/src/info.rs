//! Raw-fact source
//!
//! The `Info` extension hands out three line-oriented fact streams: macro
//! definitions, macro expansions and typedefs. Producing those streams from
//! compiler diagnostics happens in an external stage; `Info` imports the
//! resulting files from `info.facts-dir` into its working directory and reads
//! them back lazily.

use crate::extension::{Extension, ExtensionBase};
use cmdfacts_core::{Error, Result};
use std::any::Any;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// A lazy, single-pass sequence of fact lines
pub type Lines<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// Raw-fact source capability
pub trait FactSource {
    fn iter_macros_definitions(&self) -> Result<Lines<'_>>;
    fn iter_macros_expansions(&self) -> Result<Lines<'_>>;
    fn iter_typedefs(&self) -> Result<Lines<'_>>;
}

pub const MACROS_DEFINITIONS_FILE: &str = "macros-definitions.txt";
pub const MACROS_EXPANSIONS_FILE: &str = "macros-expansions.txt";
pub const TYPEDEFS_FILE: &str = "typedefs.txt";

const FACT_FILES: &[&str] = &[MACROS_DEFINITIONS_FILE, MACROS_EXPANSIONS_FILE, TYPEDEFS_FILE];

/// File-backed raw-fact source
#[derive(Debug)]
pub struct Info {
    base: ExtensionBase,
}

impl Info {
    pub fn new(base: ExtensionBase) -> Result<Self> {
        Ok(Self { base })
    }

    fn import_facts(&self, facts_dir: &Path) -> Result<()> {
        for file in FACT_FILES {
            let src = facts_dir.join(file);
            if !src.is_file() {
                warn!("{} is missing, its facts will be empty", src.display());
                continue;
            }

            let dest = self.base.artifact_path(file);
            fs::create_dir_all(self.base.work_dir())?;
            fs::copy(&src, &dest)?;
            debug!("Imported {}", src.display());
        }
        Ok(())
    }

    fn iter_file(&self, file: &str) -> Result<Lines<'_>> {
        let path = self.base.artifact_path(file);
        if !path.is_file() {
            debug!("{} does not exist", path.display());
            return Ok(Box::new(std::iter::empty()));
        }

        let reader = BufReader::new(File::open(&path)?);
        Ok(Box::new(reader.lines().map(|line| line.map_err(Error::from))))
    }
}

impl Extension for Info {
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

        match &self.base.conf().info.facts_dir {
            Some(dir) => self.import_facts(dir)?,
            None => info!("No facts directory configured, fact streams will be empty"),
        }

        self.base.mark_parsed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_fact_source(&self) -> Option<&dyn FactSource> {
        Some(self)
    }
}

impl FactSource for Info {
    fn iter_macros_definitions(&self) -> Result<Lines<'_>> {
        self.iter_file(MACROS_DEFINITIONS_FILE)
    }

    fn iter_macros_expansions(&self) -> Result<Lines<'_>> {
        self.iter_file(MACROS_EXPANSIONS_FILE)
    }

    fn iter_typedefs(&self) -> Result<Lines<'_>> {
        self.iter_file(TYPEDEFS_FILE)
    }
}

/// Look up the fact source among an extension's prerequisites
pub(crate) fn fact_source<'a>(base: &'a ExtensionBase, capability: &str) -> Result<&'a dyn FactSource> {
    base.extension(capability)?.as_fact_source().ok_or_else(|| {
        Error::prerequisite(base.name(), capability, "not a fact source")
    })
}
