// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs, path::Path};

use tagweave_core::{
    Frame, FrameFilter, FrameIndex, FrameType,
    picture::{PictureFields, PictureType},
};
use tagweave_media_file::{
    config::TagConfig,
    fmt::TagSlot,
    io::{
        TagFile,
        ebml::{
            binary_element, encode_vint_with_length, ids, master_element, string_element,
            unsigned_int_element,
        },
    },
};
use tempfile::TempDir;

const PNG_DATA: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

const CLUSTER_DATA: &[u8] = b"0123456789abcdef";

/// Byte offsets of interest within a generated file.
#[derive(Debug)]
struct Offsets {
    segment_size: usize,
    segment_data: usize,
    seek_position: usize,
    tags: usize,
    cluster: usize,
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seek_head(position: u64) -> Vec<u8> {
    let mut seek = binary_element(ids::SEEK_ID, &ids::TAGS.to_be_bytes());
    seek.extend(binary_element(ids::SEEK_POSITION, &position.to_be_bytes()));
    master_element(ids::SEEK_HEAD, &master_element(ids::SEEK, &seek))
}

/// EBML header and a segment with a seek head, an audio track,
/// a title tag and a cluster behind the tags.
fn minimal_file() -> (Vec<u8>, Offsets) {
    let mut header = string_element(ids::DOC_TYPE, "matroska");
    header.extend(unsigned_int_element(ids::DOC_TYPE_VERSION, 4));
    let mut data = master_element(ids::EBML, &header);

    let info = master_element(ids::INFO, &[]);
    let mut track_entry = unsigned_int_element(ids::TRACK_TYPE, 2);
    track_entry.extend(string_element(ids::CODEC_ID, "A_FLAC"));
    let tracks = master_element(ids::TRACKS, &master_element(ids::TRACK_ENTRY, &track_entry));
    let mut simple_tag = string_element(ids::TAG_NAME, "TITLE");
    simple_tag.extend(string_element(ids::TAG_STRING, "Song"));
    let mut tag = master_element(ids::TARGETS, &[]);
    tag.extend(master_element(ids::SIMPLE_TAG, &simple_tag));
    let tags = master_element(ids::TAGS, &master_element(ids::TAG, &tag));
    let cluster = binary_element(ids::CLUSTER, CLUSTER_DATA);

    let seek_head_len = seek_head(0).len();
    let tags_position = seek_head_len + info.len() + tracks.len();
    let mut segment = seek_head(tags_position as u64);
    segment.extend(info);
    segment.extend(tracks);
    segment.extend(tags);
    segment.extend(cluster);

    data.extend(ids::SEGMENT.to_be_bytes());
    let segment_size = data.len();
    data.extend(encode_vint_with_length(segment.len() as u64, 8).unwrap());
    let segment_data = data.len();
    data.extend(segment);

    let offsets = Offsets {
        segment_size,
        segment_data,
        seek_position: segment_data + seek_head_len - 8,
        tags: segment_data + tags_position,
        cluster: data.len() - CLUSTER_DATA.len(),
    };
    (data, offsets)
}

fn write_minimal_file(dir: &Path) -> (std::path::PathBuf, Offsets) {
    let (data, offsets) = minimal_file();
    let path = dir.join("test.mka");
    fs::write(&path, data).unwrap();
    (path, offsets)
}

fn seek_position(data: &[u8], offsets: &Offsets) -> usize {
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&data[offsets.seek_position..offsets.seek_position + 8]);
    usize::try_from(u64::from_be_bytes(bytes)).unwrap()
}

#[test]
fn read_title_and_audio_properties() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, _) = write_minimal_file(dir.path());

    let mut tag_file = TagFile::open(&path, &TagConfig::default()).unwrap();
    assert_eq!(
        Some("Matroska Version 4 Codec A_FLAC".to_owned()),
        tag_file.audio_properties()
    );
    assert_eq!(Some("Matroska"), tag_file.tag_format(TagSlot::Primary));
    assert!(!tag_file.has_tag(TagSlot::Legacy));

    let frames = tag_file.get_all_frames(TagSlot::Primary).unwrap().unwrap();
    let title = frames.find_by_type(FrameType::Title).unwrap();
    assert_eq!("Song", title.value());
    assert_eq!(FrameIndex::Native(0), title.index());
}

#[test]
fn save_relocates_tags_and_preserves_clusters() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, offsets) = write_minimal_file(dir.path());
    let config = TagConfig::default();

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    let frames = tag_file.get_all_frames(TagSlot::Primary).unwrap().unwrap();
    let mut title = frames.find_by_type(FrameType::Title).unwrap().clone();
    title.set_value("New Song");
    assert!(tag_file.set_frame(TagSlot::Primary, &mut title).unwrap());
    let mut artist = Frame::new(FrameType::Artist, "Band", "", FrameIndex::Unpositioned);
    assert!(tag_file.set_frame(TagSlot::Primary, &mut artist).unwrap());
    let mut picture = PictureFields {
        mime_type: "image/png".to_owned(),
        image_format: "PNG".to_owned(),
        picture_type: PictureType::CoverFront,
        description: "Cover".to_owned(),
        data: PNG_DATA.to_vec(),
        ..Default::default()
    }
    .into_frame("", FrameIndex::Unpositioned);
    assert!(tag_file.add_frame(TagSlot::Primary, &mut picture).unwrap());
    assert!(tag_file.is_changed());

    let outcome = tag_file.save(false).unwrap();
    assert!(outcome.file_changed);
    assert!(!tag_file.is_changed());
    tag_file.close();

    let data = fs::read(&path).unwrap();
    assert_eq!(
        CLUSTER_DATA,
        &data[offsets.cluster..offsets.cluster + CLUSTER_DATA.len()]
    );
    assert_eq!(ids::VOID as u8, data[offsets.tags]);
    let expected_segment_size =
        encode_vint_with_length((data.len() - offsets.segment_data) as u64, 8).unwrap();
    assert_eq!(
        expected_segment_size.as_slice(),
        &data[offsets.segment_size..offsets.segment_data]
    );
    let tags_offset = offsets.segment_data + seek_position(&data, &offsets);
    assert!(tags_offset > offsets.cluster);
    assert_eq!(
        ids::TAGS.to_be_bytes(),
        data[tags_offset..tags_offset + 4]
    );

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    let frames = tag_file.get_all_frames(TagSlot::Primary).unwrap().unwrap();
    assert_eq!(
        "New Song",
        frames.find_by_type(FrameType::Title).unwrap().value()
    );
    assert_eq!("Band", frames.find_by_type(FrameType::Artist).unwrap().value());
    let picture = frames.find_by_type(FrameType::Picture).unwrap();
    assert!(picture.index().extra().is_some());
    let fields = PictureFields::from_frame(picture);
    assert_eq!("image/png", fields.mime_type);
    assert_eq!("Cover", fields.description);
    assert_eq!(PNG_DATA, fields.data.as_slice());
}

#[test]
fn saving_again_reclaims_appended_tags() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, _) = write_minimal_file(dir.path());
    let config = TagConfig::default();

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    let mut title = Frame::new(FrameType::Title, "First", "", FrameIndex::Unpositioned);
    assert!(tag_file.set_frame(TagSlot::Primary, &mut title).unwrap());
    tag_file.save(false).unwrap();
    let len_after_first_save = fs::metadata(&path).unwrap().len();

    let mut title = Frame::new(FrameType::Title, "Other", "", FrameIndex::Unpositioned);
    assert!(tag_file.set_frame(TagSlot::Primary, &mut title).unwrap());
    tag_file.save(false).unwrap();
    assert_eq!(len_after_first_save, fs::metadata(&path).unwrap().len());

    tag_file.close();
    let mut tag_file = TagFile::open(&path, &config).unwrap();
    let frames = tag_file.get_all_frames(TagSlot::Primary).unwrap().unwrap();
    assert_eq!(1, frames.len());
    assert_eq!("Other", frames.find_by_type(FrameType::Title).unwrap().value());
}

#[test]
fn deleting_all_frames_strips_tags() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, offsets) = write_minimal_file(dir.path());
    let config = TagConfig::default();

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    assert!(
        tag_file
            .delete_frames(TagSlot::Primary, &FrameFilter::all())
            .unwrap()
    );
    assert!(tag_file.save(false).unwrap().file_changed);
    tag_file.close();

    let data = fs::read(&path).unwrap();
    assert_eq!(ids::VOID as u8, data[offsets.tags]);
    assert_eq!(
        CLUSTER_DATA,
        &data[offsets.cluster..offsets.cluster + CLUSTER_DATA.len()]
    );

    let tag_file = TagFile::open(&path, &config).unwrap();
    assert!(!tag_file.has_tag(TagSlot::Primary));
    assert_eq!(
        Some("Matroska Version 4 Codec A_FLAC".to_owned()),
        tag_file.audio_properties()
    );
}

#[test]
fn stripping_absent_tags_keeps_file() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, _) = write_minimal_file(dir.path());
    let config = TagConfig::default();

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    tag_file
        .delete_frames(TagSlot::Primary, &FrameFilter::all())
        .unwrap();
    assert!(tag_file.save(false).unwrap().file_changed);
    tag_file.close();
    let stripped = fs::read(&path).unwrap();

    let mut tag_file = TagFile::open(&path, &config).unwrap();
    tag_file.make_tag_settable(TagSlot::Primary).unwrap();
    assert!(!tag_file.save(true).unwrap().file_changed);
    assert_eq!(stripped, fs::read(&path).unwrap());
}

#[test]
fn unchanged_file_is_not_rewritten() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, _) = write_minimal_file(dir.path());
    let original = fs::read(&path).unwrap();

    let mut tag_file = TagFile::open(&path, &TagConfig::default()).unwrap();
    let frames = tag_file.get_all_frames(TagSlot::Primary).unwrap().unwrap();
    let mut title = frames.find_by_type(FrameType::Title).unwrap().clone();
    title.set_value_changed(true);
    assert!(tag_file.set_frame(TagSlot::Primary, &mut title).unwrap());
    assert!(!title.is_value_changed());
    assert!(!tag_file.is_changed());

    assert!(!tag_file.save(false).unwrap().file_changed);
    assert_eq!(original, fs::read(&path).unwrap());
}

#[test]
fn stale_frames_are_rejected() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let (path, _) = write_minimal_file(dir.path());

    let mut tag_file = TagFile::open(&path, &TagConfig::default()).unwrap();
    let mut stale = Frame::new(FrameType::Title, "Stale", "TITLE", FrameIndex::Native(7));
    assert!(!tag_file.set_frame(TagSlot::Primary, &mut stale).unwrap());
    assert!(!tag_file.is_changed());
}
