// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use tagweave_core::frame::{CustomFrameNames, NUM_CUSTOM_FRAMES};

use crate::{Error, Result};

pub const FILE_NAME: &str = "tagweave_tags";

pub const FILE_SUFFIX: &str = "ron";

pub const DEFAULT_RIFF_TRACK_NAME: &str = "IPRT";

pub const DEFAULT_COMMENT_NAME: &str = "COMMENT";

/// Chunk ids that are recognized as track number in RIFF INFO tags.
#[must_use]
pub const fn riff_track_names() -> &'static [&'static str] {
    &["IPRT", "ITRK", "TRCK"]
}

/// How pictures are stored in Vorbis comments without native
/// picture blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureName {
    /// Base64 encoded FLAC picture block in `METADATA_BLOCK_PICTURE`
    #[default]
    MetadataBlockPicture,

    /// Base64 encoded image data in `COVERART` with the MIME type
    /// in `COVERARTMIME`
    CoverArt,
}

impl PictureName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetadataBlockPicture => "METADATA_BLOCK_PICTURE",
            Self::CoverArt => "COVERART",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Chunk id used for the track number in RIFF INFO tags.
    pub riff_track_name: String,

    /// Field name used for comments in Vorbis comments.
    pub comment_name: String,

    pub picture_name: PictureName,

    /// Write the ID3v2 chunk of WAV files as `id3 `.
    pub lowercase_id3_chunk: bool,

    /// Add the total number of tracks when writing track numbers.
    pub total_num_tracks: bool,

    /// Names of user-defined custom frames.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_frame_names: Vec<String>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            riff_track_name: DEFAULT_RIFF_TRACK_NAME.to_owned(),
            comment_name: DEFAULT_COMMENT_NAME.to_owned(),
            picture_name: PictureName::default(),
            lowercase_id3_chunk: false,
            total_num_tracks: false,
            custom_frame_names: Vec::new(),
        }
    }
}

impl TagConfig {
    /// Registry of the configured custom frame names.
    #[must_use]
    pub fn custom_frames(&self) -> CustomFrameNames {
        if self.custom_frame_names.len() > NUM_CUSTOM_FRAMES {
            log::warn!(
                "Ignoring {num_ignored} of {num_total} custom frame names",
                num_ignored = self.custom_frame_names.len() - NUM_CUSTOM_FRAMES,
                num_total = self.custom_frame_names.len(),
            );
        }
        CustomFrameNames::new(&self.custom_frame_names)
    }

    /// Chunk ids that are recognized as RIFF track numbers, including
    /// the configured one.
    #[must_use]
    pub fn is_riff_track_name(&self, name: &str) -> bool {
        riff_track_names().contains(&name) || self.riff_track_name == name
    }

    pub fn load(parent_dir: &Path) -> Result<Self> {
        let file_path = new_config_file_path(parent_dir.to_path_buf());
        log::info!("Loading tag configuration from file: {}", file_path.display());
        match fs::read(&file_path) {
            Ok(bytes) => ron::de::from_bytes(&bytes).map_err(|err| Error::Config(err.into())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Default::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, parent_dir: &Path) -> Result<()> {
        let file_path = new_config_file_path(parent_dir.to_path_buf());
        log::info!("Saving tag configuration into file: {}", file_path.display());
        let mut bytes = String::new();
        ron::ser::to_writer_pretty(&mut bytes, self, Default::default())
            .map_err(|err| Error::Config(err.into()))?;
        if let Some(parent_path) = file_path.parent() {
            fs::create_dir_all(parent_path)?;
        }
        fs::write(&file_path, &bytes)?;
        Ok(())
    }
}

#[must_use]
fn new_config_file_path(parent_dir: PathBuf) -> PathBuf {
    let mut path_buf = parent_dir;
    path_buf.push(FILE_NAME);
    path_buf.set_extension(FILE_SUFFIX);
    path_buf
}

#[cfg(test)]
mod tests;
