// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn split_plain_string_list() {
    assert_eq!(vec!["a", "b", "c"], split_string_list("a|b|c"));
    assert_eq!(vec!["single"], split_string_list("single"));
    assert_eq!(vec![""], split_string_list(""));
}

#[test]
fn split_escaped_separator() {
    assert_eq!(vec!["a|b", "c"], split_string_list("a\\|b|c"));
    // A backslash that does not escape a separator is kept
    assert_eq!(vec!["C:\\dir", "x"], split_string_list("C:\\dir|x"));
}

#[test]
fn join_escapes_separator() {
    assert_eq!("a\\|b|c", join_string_list(["a|b", "c"]));
    assert_eq!("", join_string_list(Vec::<String>::new()));
}

#[test]
fn join_then_split_restores_parts() {
    let parts = vec!["Rock|Pop".to_owned(), String::new(), "Jazz".to_owned()];
    assert_eq!(parts, split_string_list(&join_string_list(&parts)));
}

#[test]
fn number_with_and_without_total() {
    assert_eq!(Some(3), number_without_total("3/12"));
    assert_eq!(Some(7), number_without_total(" 7 "));
    assert_eq!(None, number_without_total("x/12"));
    assert_eq!((3, 12), parse_number_pair("3/12"));
    assert_eq!((5, 0), parse_number_pair("5"));
    assert_eq!((0, 0), parse_number_pair("abc"));
}
