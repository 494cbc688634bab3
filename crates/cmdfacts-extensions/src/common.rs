//! Command normalization shared by command extensions
//!
//! Reads the raw command batch (JSON Lines of [`RawCommand`]), selects the
//! commands whose executable matches a set of patterns, splits their
//! argument vectors into options, inputs and outputs, and persists the
//! resulting [`CommandRecord`]s per identifier.

use crate::extension::ExtensionBase;
use cmdfacts_core::{CommandRecord, Error, RawCommand, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Options whose value is the following argument when written separately
const OPTS_WITH_ARG: &[&str] = &[
    "-I",
    "-D",
    "-U",
    "-include",
    "-imacros",
    "-isystem",
    "-iquote",
    "-idirafter",
    "-iprefix",
    "-isysroot",
    "-MF",
    "-MT",
    "-MQ",
    "-x",
    "-L",
    "-l",
    "-Xlinker",
    "-Xpreprocessor",
    "-Xassembler",
    "--param",
];

/// Options that only query the toolchain
const QUERY_OPTS: &[&str] = &["--version", "-dumpversion", "-dumpmachine", "--help", "-###"];

/// Compiled executable recognition patterns
#[derive(Debug, Clone)]
pub struct CommandPatterns(Vec<Regex>);

impl CommandPatterns {
    pub fn new(patterns: &[String]) -> Result<Self> {
        patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| Error::invalid_pattern(p, e)))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// True if `which` matches any pattern
    pub fn matches(&self, which: &str) -> bool {
        self.0.iter().any(|re| re.is_match(which))
    }
}

/// Read every raw command of a JSON Lines batch
pub fn read_raw_commands(cmds_file: &Path) -> Result<Vec<RawCommand>> {
    if !cmds_file.is_file() {
        return Err(Error::not_found(cmds_file.display().to_string()));
    }

    let reader = BufReader::new(File::open(cmds_file)?);
    let mut cmds = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        cmds.push(serde_json::from_str(&line)?);
    }
    Ok(cmds)
}

/// Feed every raw command whose executable matches `patterns` to `parse_cmd`
///
/// Stops at the first error. Returns the number of matching commands.
pub fn parse_commands<F>(cmds_file: &Path, patterns: &CommandPatterns, mut parse_cmd: F) -> Result<usize>
where
    F: FnMut(&RawCommand) -> Result<()>,
{
    let mut matched = 0;
    for cmd in read_raw_commands(cmds_file)? {
        if !patterns.matches(&cmd.which) {
            continue;
        }
        matched += 1;
        parse_cmd(&cmd)?;
    }
    Ok(matched)
}

/// Split a raw command into a normalized record
pub fn parse_one(cmd: &RawCommand) -> CommandRecord {
    let mut record = CommandRecord {
        id: cmd.id.clone(),
        command: cmd.which.clone(),
        cwd: cmd.cwd.clone(),
        ..Default::default()
    };

    let mut args = cmd.command.iter().skip(1);
    while let Some(arg) = args.next() {
        if arg == "-o" {
            if let Some(out) = args.next() {
                record.out.push(out.clone());
            }
        } else if let Some(out) = arg.strip_prefix("-o").filter(|o| !o.is_empty()) {
            record.out.push(out.to_string());
        } else if arg == "-" {
            record.inputs.push(arg.clone());
        } else if OPTS_WITH_ARG.contains(&arg.as_str()) {
            record.opts.push(arg.clone());
            if let Some(value) = args.next() {
                record.opts.push(value.clone());
            }
        } else if arg.starts_with('-') {
            record.opts.push(arg.clone());
        } else {
            record.inputs.push(arg.clone());
        }
    }

    record
}

/// True for commands that should not be processed
///
/// Toolchain queries (`--version`, `-print-*`, a lone `-v`, ...) and
/// commands reading or writing `/dev/null` produce nothing worth keeping.
pub fn is_bad(record: &CommandRecord) -> bool {
    let query = record
        .opts
        .iter()
        .any(|o| QUERY_OPTS.contains(&o.as_str()) || o.starts_with("-print-"));
    let version_only = record.inputs.is_empty() && record.opts.iter().all(|o| o == "-v") && !record.opts.is_empty();
    let null_io = record
        .inputs
        .iter()
        .chain(record.out.iter())
        .any(|f| f == "/dev/null");

    query || version_only || null_io
}

/// Per-identifier command persistence in an extension's working directory
///
/// Records go to `cmds/<id>.json` (without options) and options to
/// `opts/<id>.json`.
pub struct CommandStore<'a> {
    base: &'a ExtensionBase,
}

impl<'a> CommandStore<'a> {
    pub fn new(base: &'a ExtensionBase) -> Self {
        Self { base }
    }

    /// Persist the record and its options separately
    pub fn dump_cmd_by_id(&self, record: &CommandRecord) -> Result<()> {
        let stored = CommandRecord {
            opts: Vec::new(),
            deps: None,
            ..record.clone()
        };
        self.base.store(&stored, format!("cmds/{}.json", record.id))?;
        self.dump_opts_by_id(&record.id, &record.opts)
    }

    pub fn load_cmd_by_id(&self, id: &str) -> Result<CommandRecord> {
        self.base.load(format!("cmds/{}.json", id))
    }

    pub fn dump_opts_by_id(&self, id: &str, opts: &[String]) -> Result<()> {
        self.base.store(opts, format!("opts/{}.json", id))
    }

    pub fn load_opts_by_id(&self, id: &str) -> Result<Vec<String>> {
        self.base.load(format!("opts/{}.json", id))
    }

    /// Every stored record without options, ordered by identifier
    ///
    /// Identifiers that are integers sort numerically, before any others.
    pub fn load_all_cmds(&self) -> Result<Vec<CommandRecord>> {
        let dir = self.base.artifact_path("cmds");
        if !dir.is_dir() {
            debug!("No commands stored in {}", dir.display());
            return Ok(Vec::new());
        }

        let mut cmds = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                cmds.push(self.base.load::<CommandRecord>(&path)?);
            }
        }

        cmds.sort_by(|a, b| compare_ids(&a.id, &b.id));
        Ok(cmds)
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
