//! # Hold decision
//!
//! Decides whether a pull request needs the hold label by looking for the marker in the added
//! lines of each changed file.

use donotsubmit_developer_platforms::models::PullRequestFile;
use tracing::{debug, info, warn};

use crate::diff::parse_hunks;
use crate::marker::{contains_marker, find_first_marker};

#[cfg(test)]
#[path = "hold_tests.rs"]
mod tests;

/// Returns `true` as soon as one file adds a line containing `marker`.
///
/// An empty file list never wants a hold. The result does not depend on the order of `files`.
pub fn wants_hold(files: &[PullRequestFile], marker: &str) -> bool {
    files.iter().any(|file| file_has_marker(file, marker))
}

/// Returns `true` if the patch of `file` adds a line containing `marker`.
///
/// Files without a patch (binary files, renames) never contain the marker. A patch that cannot be
/// parsed is logged and treated as marker-free, so one bad patch does not prevent the other files
/// from being checked.
pub fn file_has_marker(file: &PullRequestFile, marker: &str) -> bool {
    let Some(patch) = file.patch.as_deref() else {
        debug!(file = file.filename.as_str(), "File has no patch to scan");
        return false;
    };

    let hunks = match parse_hunks(patch) {
        Ok(h) => h,
        Err(e) => {
            warn!(
                file = file.filename.as_str(),
                error = e.to_string(),
                "Failed to parse the patch. Treating the file as not containing the marker."
            );
            return false;
        }
    };

    if !contains_marker(&hunks, marker) {
        return false;
    }

    if let Some(location) = find_first_marker(&hunks, marker) {
        info!(
            file = file.filename.as_str(),
            line = location.new_line,
            "Found the marker on an added line"
        );
    }
    true
}
