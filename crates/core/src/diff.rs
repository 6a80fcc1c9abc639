//! # Unified diff hunks
//!
//! Splits the patch text of a single file into its hunks. Platforms such as GitHub deliver the
//! patch of each changed file without the `diff --git` preamble, but the parser also accepts
//! and skips that preamble so that full `git diff` output for one file can be fed in directly.
//!
//! Hunk bodies are kept apart from the file header lines, so a `+++ b/file` header is never
//! mistaken for an added line.

use crate::errors::DiffParseError;

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

/// Prefixes of the extended header lines git writes before the first hunk of a file.
const PREAMBLE_PREFIXES: [&str; 15] = [
    "diff --git ",
    "index ",
    "--- ",
    "+++ ",
    "old mode ",
    "new mode ",
    "deleted file mode ",
    "new file mode ",
    "similarity index ",
    "dissimilarity index ",
    "rename from ",
    "rename to ",
    "copy from ",
    "copy to ",
    "Binary files ",
];

/// The role of one line in a hunk body, taken from its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line (` `). An empty line is read as an empty context line.
    Context,

    /// Line only present in the new version of the file (`+`).
    Addition,

    /// Line only present in the old version of the file (`-`).
    Deletion,

    /// The `\ No newline at end of file` annotation.
    NoNewline,
}

impl LineKind {
    fn of(line: &str) -> Option<Self> {
        match line.as_bytes().first() {
            None | Some(b' ') => Some(LineKind::Context),
            Some(b'+') => Some(LineKind::Addition),
            Some(b'-') => Some(LineKind::Deletion),
            Some(b'\\') => Some(LineKind::NoNewline),
            Some(_) => None,
        }
    }
}

/// A contiguous block of changes in a patch.
///
/// The ranges come from the `@@ -orig_start,orig_lines +new_start,new_lines @@` header. The
/// body lines are stored exactly as they appear in the patch, prefix character included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub orig_start: u32,
    pub orig_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,

    /// Text after the closing `@@`, usually the enclosing function signature
    pub section: Option<String>,

    pub lines: Vec<String>,
}

impl Hunk {
    /// Iterates over the body lines together with their kind.
    pub fn classified_lines(&self) -> impl Iterator<Item = (LineKind, &str)> {
        self.lines
            .iter()
            .map(|line| (LineKind::of(line).unwrap_or(LineKind::Context), line.as_str()))
    }

    /// Iterates over the text of the added lines, without the leading `+`.
    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| line.strip_prefix('+'))
    }
}

/// Parses the patch text of one file into its hunks, in patch order.
///
/// An empty patch, as reported for binary files or pure renames, has no hunks. The line counts
/// in hunk headers are not checked against the body, since platform patches do not always
/// agree with them.
///
/// # Errors
///
/// Returns a `DiffParseError` if text other than git's extended header lines appears before the
/// first hunk, if a hunk header cannot be read, or if a body line starts with a character that
/// has no meaning in a unified diff.
///
/// # Examples
///
/// ```
/// use donotsubmit_core::diff::parse_hunks;
///
/// let hunks = parse_hunks("@@ -1,2 +1,2 @@\n context\n-old\n+new").unwrap();
/// assert_eq!(hunks.len(), 1);
/// assert_eq!(hunks[0].added_lines().collect::<Vec<_>>(), vec!["new"]);
/// ```
pub fn parse_hunks(patch: &str) -> Result<Vec<Hunk>, DiffParseError> {
    let mut hunks: Vec<Hunk> = Vec::new();
    if patch.is_empty() {
        return Ok(hunks);
    }

    let text = patch.strip_suffix('\n').unwrap_or(patch);
    for (index, line) in text.split('\n').enumerate() {
        let line_number = index + 1;

        if line.starts_with("@@") {
            hunks.push(parse_hunk_header(line, line_number)?);
            continue;
        }

        match hunks.last_mut() {
            None => {
                if !PREAMBLE_PREFIXES.iter().any(|p| line.starts_with(p)) {
                    return Err(DiffParseError::UnexpectedPreamble {
                        line: line_number,
                        content: line.to_string(),
                    });
                }
            }
            Some(hunk) => {
                if LineKind::of(line).is_none() {
                    return Err(DiffParseError::InvalidHunkLine {
                        line: line_number,
                        content: line.to_string(),
                    });
                }
                hunk.lines.push(line.to_string());
            }
        }
    }

    Ok(hunks)
}

fn parse_hunk_header(line: &str, line_number: usize) -> Result<Hunk, DiffParseError> {
    let invalid = || DiffParseError::InvalidHunkHeader {
        line: line_number,
        header: line.to_string(),
    };

    let rest = line.strip_prefix("@@ ").ok_or_else(invalid)?;
    let (ranges, section) = rest.split_once(" @@").ok_or_else(invalid)?;

    let mut parts = ranges.split(' ');
    let (orig_start, orig_lines) = parts
        .next()
        .and_then(|r| r.strip_prefix('-'))
        .and_then(parse_range)
        .ok_or_else(invalid)?;
    let (new_start, new_lines) = parts
        .next()
        .and_then(|r| r.strip_prefix('+'))
        .and_then(parse_range)
        .ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    let section = section.trim();
    Ok(Hunk {
        orig_start,
        orig_lines,
        new_start,
        new_lines,
        section: (!section.is_empty()).then(|| section.to_string()),
        lines: Vec::new(),
    })
}

/// Reads `start[,count]`. A missing count means one line.
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
