//! Test constants for cmdfacts-extensions tests

#![allow(dead_code)]

/// Name of the scripted compiler; matches the default `^.*cc$` pattern
pub const FAKE_CC: &str = "fakecc";

/// Invocation log written by the scripted compiler, one line per run
pub const FAKE_CC_LOG: &str = "fakecc.log";

/// Raw command batch file name
pub const CMDS_FILE: &str = "cmds.jsonl";

/// Scripted compiler body; `@LOG@` is replaced with the log path
///
/// Writes `out.o: <first input>` to the file named by `-Wp,-MD,` or
/// `-Wp,-MMD,`, followed by one continuation line per entry of
/// `<first input>.deps` when that file exists.
pub const FAKE_CC_SCRIPT: &str = r#"#!/bin/sh
echo "$@" >> '@LOG@'
depfile=""
inputs=""
skip=0
for arg in "$@"; do
  if [ "$skip" = 1 ]; then skip=0; continue; fi
  case "$arg" in
    -Wp,-MD,*) depfile="${arg#-Wp,-MD,}" ;;
    -Wp,-MMD,*) depfile="${arg#-Wp,-MMD,}" ;;
    -o) skip=1 ;;
    -*) ;;
    *) inputs="$inputs $arg" ;;
  esac
done
[ -n "$depfile" ] || exit 0
first=""
for f in $inputs; do first="$f"; break; done
{
  printf 'out.o: %s' "$first"
  if [ -f "$first.deps" ]; then
    while read -r dep; do printf ' \\\n  %s' "$dep"; done < "$first.deps"
  fi
  printf '\n'
} > "$depfile"
"#;

/// Scripted compiler that writes an unparsable dependency file
pub const BAD_CC_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -Wp,-MD,*) echo "garbage" > "${arg#-Wp,-MD,}" ;;
    -Wp,-MMD,*) echo "garbage" > "${arg#-Wp,-MMD,}" ;;
  esac
done
"#;

pub const MACRO_DEFINITIONS: &[&str] = &[
    "src/a.h MAX 3",
    "src/a.h MIN 4",
    "src/a.h MAX 3",
    "src/b.h VERSION 1",
    "malformed",
];

pub const MACRO_EXPANSIONS: &[&str] = &[
    "src/main.c MAX actual_arg1=a, actual_arg2=b",
    "src/main.c MAX actual_arg1=1, actual_arg2=2",
    "src/main.c VERSION",
];

pub const TYPEDEFS: &[&str] = &[
    "declaration: typedef int counter_t; path: src/a.h",
    "declaration: typedef unsigned char byte; path: src/a.h",
    "declaration: typedef int counter_t; path: src/a.h",
    "declaration: typedef long off_t; path: /usr/include/sys/types.h",
    "declaration: struct not_a_typedef; path: src/a.h",
];
