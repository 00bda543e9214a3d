// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use mime::Mime;

pub mod picture;

/// Upper-case file extension of a path.
#[must_use]
pub fn file_extension_upper(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_uppercase)
}

/// Guess the MIME type of an attachment from its file name.
#[must_use]
pub fn guess_mime_from_file_name(file_name: &str) -> Option<Mime> {
    mime_guess::from_path(file_name).first()
}
