//! # Marker detection
//!
//! Looks for the "do not submit" marker in the lines a patch adds. Context and deleted lines are
//! ignored: removing a marker, or touching code near one, must not hold a pull request.

use crate::diff::{Hunk, LineKind};

#[cfg(test)]
#[path = "marker_tests.rs"]
mod tests;

/// The marker that holds a pull request when it appears on an added line.
pub const DO_NOT_SUBMIT_MARKER: &str = "DO NOT SUBMIT";

/// Where a marker was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLocation {
    /// Index of the hunk in the patch
    pub hunk: usize,

    /// Line number of the added line in the new version of the file
    pub new_line: u32,

    /// The added line, without its `+` prefix
    pub text: String,
}

/// Returns `true` if any added line in `hunks` contains the default marker.
///
/// The match is a case-sensitive substring match with no word boundaries.
pub fn has_marker(hunks: &[Hunk]) -> bool {
    contains_marker(hunks, DO_NOT_SUBMIT_MARKER)
}

/// Returns `true` if any added line in `hunks` contains `marker`. Stops at the first match.
pub fn contains_marker(hunks: &[Hunk], marker: &str) -> bool {
    hunks
        .iter()
        .flat_map(|hunk| hunk.added_lines())
        .any(|line| line.contains(marker))
}

/// Finds the first added line containing `marker`, with its position in the new file.
pub fn find_first_marker(hunks: &[Hunk], marker: &str) -> Option<MarkerLocation> {
    find_markers(hunks, marker).next()
}

/// Iterates lazily over every added line containing `marker`, in patch order.
///
/// Line numbers saturate at `u32::MAX` rather than wrapping for hunks that start near it.
pub fn find_markers<'a>(
    hunks: &'a [Hunk],
    marker: &'a str,
) -> impl Iterator<Item = MarkerLocation> + 'a {
    hunks.iter().enumerate().flat_map(move |(index, hunk)| {
        let mut new_line = hunk.new_start;
        hunk.classified_lines().filter_map(move |(kind, line)| {
            let current = new_line;
            match kind {
                LineKind::Context => {
                    new_line = new_line.saturating_add(1);
                    None
                }
                LineKind::Addition => {
                    new_line = new_line.saturating_add(1);
                    let text = &line[1..];
                    text.contains(marker).then(|| MarkerLocation {
                        hunk: index,
                        new_line: current,
                        text: text.to_string(),
                    })
                }
                LineKind::Deletion | LineKind::NoNewline => None,
            }
        })
    })
}
