//! Compiler commands and their file dependencies
//!
//! Every recognized compiler command is re-run with flags that make the
//! compiler write a Make-style dependency listing to a scratch file. The
//! parsed listing, joined with the command's own inputs, becomes the
//! dependency set stored under `deps/<id>.json`.

use crate::common::{self, CommandPatterns, CommandStore};
use crate::depfile;
use crate::extension::{Extension, ExtensionBase};
use crate::storage::archive;
use cmdfacts_core::{resolve_path, CommandRecord, Error, RawCommand, Result};
use std::any::Any;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffixes of C, C++ and assembly sources and headers
const FILE_EXTENSIONS: &[&str] = &[
    ".c", ".i", ".h", ".C", ".cc", ".cpp", ".cxx", ".c++", ".hh", ".hpp", ".hxx", ".h++", ".s",
    ".S", ".asm",
];

#[derive(Debug)]
pub struct CC {
    base: ExtensionBase,
    patterns: CommandPatterns,
}

impl CC {
    pub fn new(base: ExtensionBase) -> Result<Self> {
        let patterns = CommandPatterns::new(&base.conf().cc.which_list)?;
        Ok(Self { base, patterns })
    }

    fn store(&self) -> CommandStore<'_> {
        CommandStore::new(&self.base)
    }

    fn parse_cmd(&self, cmd: &RawCommand) -> Result<()> {
        let record = common::parse_one(cmd);

        if common::is_bad(&record) {
            debug!("Skip command {}", record.id);
            return Ok(());
        }

        debug!("Parsed command: {:?}", record);

        // Compilers may leave later sources out of the listing when several
        // are compiled at once, so inputs are always added back.
        let mut deps: BTreeSet<String> = self.discover_deps(&record)?.into_iter().collect();
        deps.extend(record.inputs.iter().cloned());
        debug!("Dependencies: {:?}", deps);

        self.dump_deps_by_id(&record.id, &deps)?;
        self.store().dump_cmd_by_id(&record)?;

        if self.base.conf().cc.store_deps {
            self.store_src_files(&deps, &record.cwd)?;
        }

        Ok(())
    }

    /// Dependencies reported by the compiler for `record`
    fn discover_deps(&self, record: &CommandRecord) -> Result<Vec<String>> {
        let deps_file = self.collect_deps(record)?;

        if !deps_file.is_file() {
            return Ok(Vec::new());
        }

        let deps = depfile::parse_deps_file(&deps_file)?;
        let _ = fs::remove_file(&deps_file);
        Ok(deps)
    }

    /// Re-run the compiler so that it writes its dependency listing
    fn collect_deps(&self, record: &CommandRecord) -> Result<PathBuf> {
        let deps_file = self.base.temp_dir().join(format!("{}-deps.txt", record.id));

        if record.reads_stdin() || record.inputs.is_empty() {
            debug!("Not running command {}: no input files to read", record.id);
            return Ok(deps_file);
        }

        let args = child_args(record, &deps_file, self.base.conf().cc.with_system_header_files);
        debug!("Running {} {}", record.command, args.join(" "));

        duct::cmd(record.command.as_str(), &args)
            .dir(&record.cwd)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run()
            .map_err(|e| Error::environment(format!("failed to run {}: {}", record.command, e)))?;

        Ok(deps_file)
    }

    fn store_src_files(&self, deps: &BTreeSet<String>, cwd: &Path) -> Result<()> {
        let storage = archive(&self.base, "Storage")?;
        for dep in deps {
            storage.add(&resolve_path(cwd, dep))?;
        }
        Ok(())
    }

    pub fn load_deps_by_id(&self, id: &str) -> Result<BTreeSet<String>> {
        self.base.load(format!("deps/{}.json", id))
    }

    pub fn dump_deps_by_id(&self, id: &str, deps: &BTreeSet<String>) -> Result<()> {
        self.base.store(deps, format!("deps/{}.json", id))
    }

    pub fn load_cmd_by_id(&self, id: &str) -> Result<CommandRecord> {
        self.store().load_cmd_by_id(id)
    }

    pub fn load_opts_by_id(&self, id: &str) -> Result<Vec<String>> {
        self.store().load_opts_by_id(id)
    }

    /// Stored commands ordered by identifier
    ///
    /// `compile_only` drops commands with any input that is not a C, C++ or
    /// assembly source or header, such as link steps over object files.
    pub fn load_all_cmds(
        &self,
        with_opts: bool,
        with_deps: bool,
        compile_only: bool,
    ) -> Result<Vec<CommandRecord>> {
        let mut cmds = Vec::new();

        for mut cmd in self.store().load_all_cmds()? {
            if compile_only && !cmd.inputs.iter().all(|i| is_source_file(i)) {
                continue;
            }
            if with_opts {
                cmd.opts = self.load_opts_by_id(&cmd.id)?;
            }
            if with_deps {
                cmd.deps = Some(self.load_deps_by_id(&cmd.id)?);
            }
            cmds.push(cmd);
        }

        Ok(cmds)
    }
}

impl Extension for CC {
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

        let matched = common::parse_commands(cmds_file, &self.patterns, |cmd| self.parse_cmd(cmd))?;
        info!("Processed {} compiler commands", matched);

        self.base.mark_parsed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Options, dependency flags and inputs for the re-run
fn child_args(record: &CommandRecord, deps_file: &Path, with_system_headers: bool) -> Vec<String> {
    let extra = if with_system_headers {
        [format!("-Wp,-MD,{}", deps_file.display()), "-M".to_string()]
    } else {
        [format!("-Wp,-MMD,{}", deps_file.display()), "-MM".to_string()]
    };

    record
        .opts
        .iter()
        .cloned()
        .chain(extra)
        .chain(record.inputs.iter().cloned())
        .collect()
}

fn is_source_file(input: &str) -> bool {
    let name = Path::new(input)
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match name.rfind('.') {
        Some(pos) if pos > 0 => FILE_EXTENSIONS.contains(&&name[pos..]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn record(opts: &[&str], inputs: &[&str]) -> CommandRecord {
        CommandRecord {
            id: "1".to_string(),
            command: "gcc".to_string(),
            opts: opts.iter().map(|s| s.to_string()).collect(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_child_args_with_system_headers() {
        let args = child_args(
            &record(&["-O2", "-Iinc"], &["a.c"]),
            Path::new("/tmp/x/1-deps.txt"),
            true,
        );
        assert_eq!(args, vec!["-O2", "-Iinc", "-Wp,-MD,/tmp/x/1-deps.txt", "-M", "a.c"]);
    }

    #[test]
    fn test_child_args_user_headers_only() {
        let args = child_args(&record(&[], &["a.c", "b.c"]), Path::new("d.txt"), false);
        assert_eq!(args, vec!["-Wp,-MMD,d.txt", "-MM", "a.c", "b.c"]);
    }

    #[test_case("main.c", true)]
    #[test_case("src/lib.cpp", true)]
    #[test_case("boot.S", true)]
    #[test_case("x.h++", true)]
    #[test_case("main.o", false)]
    #[test_case("libfoo.a", false)]
    #[test_case("Makefile", false)]
    #[test_case(".c", false)]
    fn test_source_suffixes(input: &str, expected: bool) {
        assert_eq!(is_source_file(input), expected);
    }
}
