//! Typedef declarations per file
//!
//! Lines look like `declaration: typedef <decl>; path: <scope file>`. Each
//! file keeps its distinct declarations in first-seen order.

use crate::extension::{Extension, ExtensionBase};
use crate::facts::{aggregate, FactFold};
use crate::info::fact_source;
use cmdfacts_core::Result;
use regex::Regex;
use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

static TYPEDEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^declaration: typedef ([^\n]+); path: ([^\n]+)").expect("valid typedef regex")
});

const TYPEDEFS_FOLDER: &str = "typedefs";

/// Declarations per scope file
pub type TypedefMap = BTreeMap<String, Vec<String>>;

/// Fold for typedef lines
#[derive(Debug, Default)]
pub struct TypedefFold {
    typedefs: TypedefMap,
    seen: HashSet<(String, String)>,
}

impl FactFold for TypedefFold {
    type Shard = Vec<String>;

    fn add_line(&mut self, line: &str) -> bool {
        let Some(caps) = TYPEDEF_RE.captures(line) else {
            return false;
        };

        let declaration = caps[1].to_string();
        let scope_file = caps[2].to_string();

        if self.seen.insert((scope_file.clone(), declaration.clone())) {
            self.typedefs.entry(scope_file).or_default().push(declaration);
        }
        true
    }

    fn into_map(self) -> TypedefMap {
        self.typedefs
    }
}

#[derive(Debug)]
pub struct Typedefs {
    base: ExtensionBase,
}

impl Typedefs {
    pub fn new(base: ExtensionBase) -> Result<Self> {
        Ok(Self { base })
    }

    /// Stored declarations, restricted to `files` if given
    pub fn load_typedefs(&self, files: Option<&[String]>) -> Result<TypedefMap> {
        self.base.load_by_key(TYPEDEFS_FOLDER, files)
    }
}

impl Extension for Typedefs {
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

        info!("Processing typedefs");
        let mut fold = TypedefFold::default();
        aggregate(source.iter_typedefs()?, &mut fold)?;

        let shards = self.base.store_by_key(&fold.into_map(), TYPEDEFS_FOLDER)?;
        info!("Stored typedefs of {} files", shards);

        self.base.mark_parsed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
