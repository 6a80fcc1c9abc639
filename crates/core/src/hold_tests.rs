use super::*;
use crate::marker::DO_NOT_SUBMIT_MARKER;
use crate::test_support::{file, CLEAN_PATCH, MALFORMED_PATCH, MARKED_PATCH};

#[test]
fn test_wants_hold_empty_file_list() {
    assert!(!wants_hold(&[], DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_wants_hold_single_marked_file() {
    let files = vec![file("src/lib.rs", Some(MARKED_PATCH))];

    assert!(wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_wants_hold_no_marked_files() {
    let files = vec![
        file("src/lib.rs", Some(CLEAN_PATCH)),
        file("logo.png", None),
        file("renamed.rs", Some("")),
    ];

    assert!(!wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_wants_hold_malformed_patch_does_not_suppress_other_files() {
    let files = vec![
        file("broken.rs", Some(MALFORMED_PATCH)),
        file("src/lib.rs", Some(MARKED_PATCH)),
    ];

    assert!(wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_malformed_patch_is_treated_as_marker_free() {
    let broken = file("broken.rs", Some(MALFORMED_PATCH));

    assert!(!file_has_marker(&broken, DO_NOT_SUBMIT_MARKER));
    assert!(!wants_hold(&[broken], DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_wants_hold_is_independent_of_file_order() {
    let mut files = vec![
        file("a.rs", Some(CLEAN_PATCH)),
        file("b.rs", Some(MALFORMED_PATCH)),
        file("c.rs", None),
        file("d.rs", Some(MARKED_PATCH)),
    ];

    assert!(wants_hold(&files, DO_NOT_SUBMIT_MARKER));
    files.reverse();
    assert!(wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_wants_hold_with_custom_marker() {
    let files = vec![file("a.rs", Some("@@ -0,0 +1 @@\n+// NOCOMMIT"))];

    assert!(wants_hold(&files, "NOCOMMIT"));
    assert!(!wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}

#[test]
fn test_hunk_starting_at_last_line_number_does_not_overflow() {
    let files = vec![file(
        "a.rs",
        Some("@@ -1 +4294967295 @@\n+fine\n+DO NOT SUBMIT"),
    )];

    assert!(wants_hold(&files, DO_NOT_SUBMIT_MARKER));
}
