// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Multiple values of a key are presented as a single string,
//! joined by [`STRING_LIST_SEPARATOR`].

use itertools::Itertools as _;

pub const STRING_LIST_SEPARATOR: char = '|';

const ESCAPE_CHAR: char = '\\';

/// Split at unescaped separators and unescape the parts.
#[must_use]
pub fn split_string_list(joined: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut part = String::new();
    let mut chars = joined.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE_CHAR if chars.peek() == Some(&STRING_LIST_SEPARATOR) => {
                part.push(STRING_LIST_SEPARATOR);
                chars.next();
            }
            STRING_LIST_SEPARATOR => {
                parts.push(std::mem::take(&mut part));
            }
            c => part.push(c),
        }
    }
    parts.push(part);
    parts
}

/// Escape separators within the parts and join them.
#[must_use]
pub fn join_string_list<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let escaped_separator = format!("{ESCAPE_CHAR}{STRING_LIST_SEPARATOR}");
    parts
        .into_iter()
        .map(|part| {
            part.as_ref()
                .replace(STRING_LIST_SEPARATOR, &escaped_separator)
        })
        .join(&STRING_LIST_SEPARATOR.to_string())
}

/// Parse the number of a `number/total` pair, ignoring the total.
#[must_use]
pub fn number_without_total(input: &str) -> Option<i32> {
    let number = input.split_once('/').map_or(input, |(number, _)| number);
    number.trim().parse().ok()
}

/// Parse `number/total`, both parts defaulting to 0.
#[must_use]
pub fn parse_number_pair(input: &str) -> (i32, i32) {
    let (number, total) = input.split_once('/').unwrap_or((input, ""));
    (
        number.trim().parse().unwrap_or_default(),
        total.trim().parse().unwrap_or_default(),
    )
}

#[must_use]
pub fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
