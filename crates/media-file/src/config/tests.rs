// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagweave_core::FrameType;

use super::*;

#[test]
fn default_config() {
    let config = TagConfig::default();
    assert_eq!("IPRT", config.riff_track_name);
    assert_eq!("COMMENT", config.comment_name);
    assert_eq!(PictureName::MetadataBlockPicture, config.picture_name);
    assert!(config.custom_frames().is_empty());
}

#[test]
fn riff_track_names_include_configured_name() {
    let config = TagConfig {
        riff_track_name: "ITRA".to_owned(),
        ..Default::default()
    };
    assert!(config.is_riff_track_name("ITRA"));
    assert!(config.is_riff_track_name("IPRT"));
    assert!(config.is_riff_track_name("TRCK"));
    assert!(!config.is_riff_track_name("INAM"));
}

#[test]
fn custom_frames_from_config() {
    let config = TagConfig {
        custom_frame_names: vec!["!RELEASE TYPE".to_owned(), "VERSION".to_owned()],
        ..Default::default()
    };
    let custom_frames = config.custom_frames();
    assert_eq!(FrameType::Custom(0), custom_frames.type_of("ReleaseType"));
    assert_eq!(Some("VERSION"), custom_frames.name_of(FrameType::Custom(1)));
}

#[test]
fn deserialize_partial_config_with_defaults() {
    let config: TagConfig = ron::de::from_str("(comment_name: \"DESCRIPTION\")").unwrap();
    assert_eq!("DESCRIPTION", config.comment_name);
    assert_eq!(DEFAULT_RIFF_TRACK_NAME, config.riff_track_name);
    assert_eq!(PictureName::MetadataBlockPicture, config.picture_name);
}

#[test]
fn picture_names() {
    assert_eq!(
        "METADATA_BLOCK_PICTURE",
        PictureName::MetadataBlockPicture.as_str()
    );
    assert_eq!("COVERART", PictureName::CoverArt.as_str());
}
