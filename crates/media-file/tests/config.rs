// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;

use tagweave_media_file::{
    Error,
    config::{FILE_NAME, FILE_SUFFIX, PictureName, TagConfig},
};
use tempfile::TempDir;

#[test]
fn load_missing_file_returns_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(TagConfig::default(), TagConfig::load(dir.path()).unwrap());
}

#[test]
fn save_and_load() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("settings");
    let config = TagConfig {
        riff_track_name: "ITRK".to_owned(),
        comment_name: "DESCRIPTION".to_owned(),
        picture_name: PictureName::CoverArt,
        lowercase_id3_chunk: true,
        total_num_tracks: true,
        custom_frame_names: vec!["RELEASETYPE".to_owned()],
    };
    config.save(&config_dir).unwrap();
    assert!(
        config_dir
            .join(format!("{FILE_NAME}.{FILE_SUFFIX}"))
            .is_file()
    );
    assert_eq!(config, TagConfig::load(&config_dir).unwrap());
}

#[test]
fn invalid_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(format!("{FILE_NAME}.{FILE_SUFFIX}")),
        "(riff_track_name: 42)",
    )
    .unwrap();
    assert!(matches!(
        TagConfig::load(dir.path()),
        Err(Error::Config(_))
    ));
}
