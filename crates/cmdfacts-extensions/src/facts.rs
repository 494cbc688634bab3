//! Textual fact aggregation
//!
//! Macro and typedef extraction share one shape: match each line of a raw
//! fact stream against a pattern, fold the matches into a two-level mapping
//! keyed by file, then store that mapping sharded by file.

use crate::info::Lines;
use cmdfacts_core::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Fold of one fact kind into a per-file mapping
pub trait FactFold {
    /// Value stored for one file
    type Shard: Serialize;

    /// Consume one raw line; returns false if the line did not match
    fn add_line(&mut self, line: &str) -> bool;

    /// Finish the fold
    fn into_map(self) -> BTreeMap<String, Self::Shard>;
}

/// Feed every line of `lines` to `fold`
///
/// Returns the number of matching lines. Non-matching lines are dropped.
pub fn aggregate<F: FactFold>(lines: Lines<'_>, fold: &mut F) -> Result<usize> {
    let mut matched = 0;
    let mut skipped = 0;

    for line in lines {
        if fold.add_line(&line?) {
            matched += 1;
        } else {
            skipped += 1;
        }
    }

    debug!("Matched {} lines, skipped {}", matched, skipped);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdfacts_core::Error;
    use std::io;

    #[derive(Default)]
    struct Counter(BTreeMap<String, usize>);

    impl FactFold for Counter {
        type Shard = usize;

        fn add_line(&mut self, line: &str) -> bool {
            match line.split_once(' ') {
                Some((file, _)) => {
                    *self.0.entry(file.to_string()).or_default() += 1;
                    true
                }
                None => false,
            }
        }

        fn into_map(self) -> BTreeMap<String, usize> {
            self.0
        }
    }

    fn lines(raw: &'static [&'static str]) -> Lines<'static> {
        Box::new(raw.iter().map(|l| Ok::<_, Error>(l.to_string())))
    }

    #[test]
    fn test_non_matching_lines_are_dropped() {
        let mut fold = Counter::default();
        let matched = aggregate(lines(&["a.c x", "garbage", "a.c y", "b.c z"]), &mut fold).unwrap();

        assert_eq!(matched, 3);
        let map = fold.into_map();
        assert_eq!(map["a.c"], 2);
        assert_eq!(map["b.c"], 1);
    }

    #[test]
    fn test_stream_error_propagates() {
        let failing: Lines<'static> = Box::new(
            vec![
                Ok("a.c x".to_string()),
                Err(Error::Io(io::Error::other("truncated"))),
            ]
            .into_iter(),
        );

        let mut fold = Counter::default();
        assert!(matches!(aggregate(failing, &mut fold), Err(Error::Io(_))));
    }
}
