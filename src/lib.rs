// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Read and write the tags of audio files through a
//! container-independent frame model.

pub use tagweave_core::*;

#[cfg(feature = "media-file")]
pub use tagweave_media_file as media_file;
