//! Make-style dependency file parsing
//!
//! Compilers invoked with `-M`/`-MM` write a fragment like
//!
//! ```text
//! main.o: main.c include/util.h \
//!   /usr/include/stdio.h
//! ```
//!
//! Only the first target's block is taken: collection stops at the first
//! continuation line containing a colon. Tokens are split on single spaces,
//! so a path with an escaped space comes back as two tokens.

use cmdfacts_core::{Error, Result};
use std::fs;
use std::path::Path;

/// Parse the dependency list of the first target in `content`
pub fn parse_deps(content: &str) -> Result<Vec<String>> {
    parse_with_origin(content, "<input>")
}

/// Read and parse a dependency file
pub fn parse_deps_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    parse_with_origin(&content, &path.display().to_string())
}

fn parse_with_origin(content: &str, origin: &str) -> Result<Vec<String>> {
    let mut lines = content.split_inclusive('\n');
    let header = lines.next().unwrap_or_default();

    let first = match header.split_once(':') {
        Some((target, rest)) if !target.is_empty() && !rest.trim_end_matches(['\r', '\n']).is_empty() => rest,
        _ => return Err(Error::deps_format(origin, header.trim_end_matches(['\r', '\n']))),
    };

    let mut deps = Vec::new();
    for line in std::iter::once(first).chain(lines) {
        if line.contains(':') {
            break;
        }

        let line = line
            .trim_start_matches(' ')
            .trim_end_matches([' ', '\\', '\r', '\n']);
        if line.is_empty() {
            continue;
        }

        deps.extend(line.split(' ').map(str::to_string));
    }

    Ok(deps)
}
