// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagweave_core::picture::PictureType;

use crate::{config::TagConfig, fmt::tests::ContextFixture};

use super::*;

fn sample_tag() -> XiphComment {
    let mut tag = XiphComment::new();
    tag.add_field("TITLE", "Title", false);
    tag.add_field("ARTIST", "First", false);
    tag.add_field("ARTIST", "Second", false);
    tag.add_field("TRACKNUMBER", "5", false);
    tag
}

fn sample_picture() -> Frame {
    PictureFields {
        description: "Cover".to_owned(),
        data: b"\x89PNG\r\n\x1a\nnot really an image".to_vec(),
        mime_type: "image/png".to_owned(),
        image_format: "PNG".to_owned(),
        picture_type: PictureType::CoverBack,
        ..Default::default()
    }
    .into_frame("", FrameIndex::Unpositioned)
}

#[test]
fn lookup_names_ignoring_case_and_equal_signs() {
    assert_eq!(Some(FrameType::Track), vorbis_table_type("tracknumber"));
    assert_eq!(Some(FrameType::EncodedBy), vorbis_table_type("ENCODED-BY="));
    assert_eq!(Some(FrameType::Picture), vorbis_table_type("COVERART"));
    assert_eq!(
        Some(FrameType::Picture),
        vorbis_table_type("METADATA_BLOCK_PICTURE")
    );
    assert_eq!(None, vorbis_table_type("UNKNOWN"));
    assert_eq!(Some("ALBUMARTISTSORT"), vorbis_name_of_type(FrameType::SortAlbumArtist));
    assert_eq!(None, vorbis_name_of_type(FrameType::Other));
}

#[test]
fn multiple_values_are_flattened() {
    let fixture = ContextFixture::new();
    let frames = get_all_frames(&sample_tag(), &fixture.context()).into_vec();
    let summary = frames
        .iter()
        .map(|frame| (frame.frame_type(), frame.value(), frame.index()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (FrameType::Artist, "First", FrameIndex::Native(0)),
            (FrameType::Artist, "Second", FrameIndex::Native(1)),
            (FrameType::Title, "Title", FrameIndex::Native(2)),
            (FrameType::Track, "5", FrameIndex::Native(3)),
        ],
        summary
    );
}

#[test]
fn set_one_of_multiple_values() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let mut frame = get_all_frames(&tag, &context).into_vec().swap_remove(1);

    assert_eq!(Mutation::Unchanged, set_frame(&mut tag, 1, &frame, &context));
    frame.set_value_if_changed("Changed");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 1, &frame, &context));
    assert_eq!(
        Some(&["First".to_owned(), "Changed".to_owned()][..]),
        tag.get("ARTIST")
    );
    assert_eq!(Mutation::Rejected, set_frame(&mut tag, 4, &frame, &context));
}

#[test]
fn add_frames() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = Frame::new(FrameType::Artist, "Third", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!("ARTIST", frame.internal_name());
    assert_eq!(FrameIndex::Native(2), frame.index());

    let mut frame = Frame::new(FrameType::Other, "", "my=key", FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut extra_frames, &mut frame, &context);
    assert_eq!("MYKEY", frame.internal_name());
    assert_eq!(Some(&[" ".to_owned()][..]), tag.get("MYKEY"));
    assert!(extra_frames.is_empty());
}

#[test]
fn configured_comment_name() {
    let fixture = ContextFixture::with_config(TagConfig {
        comment_name: "DESCRIPTION".to_owned(),
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = XiphComment::new();

    let frame = Frame::new(FrameType::Comment, "Text", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        set_frame_without_index(&mut tag, &frame, &context)
    );
    assert_eq!(Some(&["Text".to_owned()][..]), tag.get("DESCRIPTION"));
    assert!(!tag.contains("COMMENT"));
}

#[test]
fn pictures_are_embedded_as_base64() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = XiphComment::new();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = sample_picture();
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!(FrameIndex::Native(0), frame.index());
    let stored = tag.get("METADATA_BLOCK_PICTURE").unwrap()[0].clone();
    let picture = decode_base64_picture_block(&stored).unwrap();
    assert_eq!("Cover", picture.description);
    assert_eq!(PictureType::CoverBack, picture.picture_type);

    let frames = get_all_frames(&tag, &context).into_vec();
    assert_eq!(1, frames.len());
    assert_eq!(FrameType::Picture, frames[0].frame_type());
    assert_eq!("Cover", frames[0].value());
    assert!(are_picture_fields_equal_ignoring_name(&frames[0], &frame));

    assert_eq!(Mutation::Unchanged, set_frame(&mut tag, 0, &frames[0], &context));
    assert_eq!(Mutation::Modified, delete_frame(&mut tag, &frames[0], &context));
    assert!(tag.is_empty());
}

fn are_picture_fields_equal_ignoring_name(lhs: &Frame, rhs: &Frame) -> bool {
    PictureFields::from_frame(lhs).eq_ignoring_image_properties(&PictureFields::from_frame(rhs))
}

#[test]
fn cover_art_with_mime_field() {
    let fixture = ContextFixture::with_config(TagConfig {
        picture_name: PictureName::CoverArt,
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = XiphComment::new();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = sample_picture();
    add_frame(&mut tag, &mut extra_frames, &mut frame, &context);
    assert_eq!("COVERART", frame.internal_name());
    assert_eq!(Some(&["image/png".to_owned()][..]), tag.get("COVERARTMIME"));
    assert_eq!(
        Some(&[encode_base64(b"\x89PNG\r\n\x1a\nnot really an image")][..]),
        tag.get("COVERART")
    );

    let picture = get_all_frames(&tag, &context)
        .into_vec()
        .into_iter()
        .find(|frame| frame.frame_type() == FrameType::Picture)
        .unwrap();
    let fields = PictureFields::from_frame(&picture);
    assert_eq!("image/png", fields.mime_type);
    assert_eq!(b"\x89PNG\r\n\x1a\nnot really an image".to_vec(), fields.data);
}

#[test]
fn flac_pictures_are_extra_frames() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = XiphComment::with_picture_blocks();
    let mut extra_frames = ExtraFrames::default();
    assert!(extra_frames.populate(read_extra_frames(&tag)));

    let mut frame = sample_picture();
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!(FrameIndex::Extra(0), frame.index());
    sync_extra_frames(&mut tag, &extra_frames);

    assert_eq!(0, tag.field_count());
    assert_eq!(1, tag.pictures().len());
    assert_eq!("Cover", tag.pictures()[0].description);
    let frames = read_extra_frames(&tag);
    assert_eq!(FrameIndex::Extra(0), frames[0].index());
}

#[test]
fn delete_frames_by_filter() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    assert!(delete_frames(
        &mut tag,
        &FrameFilter::with_types([FrameType::Artist]),
        &context
    ));
    assert_eq!(2, tag.field_count());
    assert!(delete_frames(&mut tag, &FrameFilter::all(), &context));
    assert!(tag.is_empty());
}

#[test]
fn total_number_of_tracks() {
    let mut tag = sample_tag();
    add_total_number_of_tracks(&mut tag, 12);
    assert_eq!(Some(&["12".to_owned()][..]), tag.get("TRACKTOTAL"));

    let mut tag = XiphComment::new();
    add_total_number_of_tracks(&mut tag, 12);
    assert!(tag.is_empty());
}

#[test]
fn frame_ids_include_picture_name() {
    let fixture = ContextFixture::with_config(TagConfig {
        picture_name: PictureName::CoverArt,
        ..Default::default()
    });
    let frame_ids = frame_ids(&fixture.context());
    assert!(frame_ids.iter().any(|id| id == "COVERART"));
    assert!(frame_ids.iter().any(|id| id == "TRACKTOTAL"));
}

#[test]
fn audio_properties_summary() {
    assert_eq!(
        Some("FLAC 24 bit".to_owned()),
        read_audio_properties(&AudioProperties::Flac { bit_depth: 24 })
    );
    assert_eq!(
        Some("FLAC".to_owned()),
        read_audio_properties(&AudioProperties::Flac { bit_depth: 0 })
    );
    assert_eq!(
        Some("Opus 1".to_owned()),
        read_audio_properties(&AudioProperties::Opus { version: 1 })
    );
    assert_eq!(
        Some("Ogg Vorbis".to_owned()),
        read_audio_properties(&AudioProperties::OggVorbis)
    );
    assert_eq!(None, read_audio_properties(&AudioProperties::Mpc));
}

#[test]
fn set_unmodified_frames_is_unchanged() {
    let fixture = ContextFixture::with_config(TagConfig {
        comment_name: "DESCRIPTION".to_owned(),
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = sample_tag();
    tag.add_field("COMMENT", "Note", false);
    tag.add_field("DESCRIPTION", "First", false);
    tag.add_field("DESCRIPTION", "Second", false);
    tag.add_field("MYKEY", "Mine", false);
    let expected = tag.clone();

    for frame in get_all_frames(&expected, &context).into_vec() {
        let FrameIndex::Native(index) = frame.index() else {
            unreachable!();
        };
        assert_eq!(
            Mutation::Unchanged,
            set_frame(&mut tag, index, &frame, &context),
            "{frame:?}"
        );
    }
    assert_eq!(expected, tag);
}

#[test]
fn set_comment_keeps_other_comment_field() {
    let fixture = ContextFixture::with_config(TagConfig {
        comment_name: "DESCRIPTION".to_owned(),
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = XiphComment::new();
    tag.add_field("COMMENT", "Note", false);
    tag.add_field("DESCRIPTION", "First", false);
    tag.add_field("DESCRIPTION", "Second", false);

    let mut frame = get_all_frames(&tag, &context).into_vec().remove(0);
    assert_eq!(FrameType::Comment, frame.frame_type());
    frame.set_value_if_changed("Changed");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 0, &frame, &context));
    assert_eq!(Some(&["Changed".to_owned()][..]), tag.get("COMMENT"));
    assert_eq!(
        Some(&["First".to_owned(), "Second".to_owned()][..]),
        tag.get("DESCRIPTION")
    );
}

#[test]
fn set_frame_of_other_type_moves_single_value() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    let frame = Frame::new(FrameType::Mood, "Calm", "", FrameIndex::Native(1));
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 1, &frame, &context));
    assert_eq!(Some(&["First".to_owned()][..]), tag.get("ARTIST"));
    assert_eq!(Some(&["Calm".to_owned()][..]), tag.get("MOOD"));
    assert_eq!(4, tag.field_count());
}
