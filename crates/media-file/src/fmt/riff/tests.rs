// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{config::TagConfig, fmt::tests::ContextFixture};

use super::*;

fn sample_tag() -> InfoTag {
    let mut tag = InfoTag::new();
    tag.set_field_text("INAM", "Title");
    tag.set_field_text("IART", "Artist");
    tag.set_field_text("ITRK", "7");
    tag.set_field_text("IARL", "Archive");
    tag
}

#[test]
fn frames_are_ordered_by_chunk_id() {
    let fixture = ContextFixture::new();
    let frames = get_all_frames(&sample_tag(), &fixture.context()).into_vec();
    let summary = frames
        .iter()
        .map(|frame| (frame.frame_type(), frame.internal_name(), frame.index()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (FrameType::Other, "IARL", FrameIndex::Native(0)),
            (FrameType::Artist, "IART", FrameIndex::Native(1)),
            (FrameType::Title, "INAM", FrameIndex::Native(2)),
            (FrameType::Track, "ITRK", FrameIndex::Native(3)),
        ],
        summary
    );
}

#[test]
fn configured_track_name() {
    let fixture = ContextFixture::with_config(TagConfig {
        riff_track_name: "TRCK".to_owned(),
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = InfoTag::new();

    let mut frame = Frame::new(FrameType::Track, "3", "", FrameIndex::Unpositioned);
    assert_eq!(Mutation::Modified, add_frame(&mut tag, &mut frame, &context));
    assert_eq!("TRCK", frame.internal_name());
    assert_eq!(FrameIndex::Native(0), frame.index());

    // A recognized track id is kept
    let mut frame = Frame::new(FrameType::Track, "4", "IPRT", FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut frame, &context);
    assert_eq!("IPRT", frame.internal_name());
    assert_eq!(Some("4"), tag.field_text("IPRT"));
    assert_eq!(Some("3"), tag.field_text("TRCK"));
}

#[test]
fn unknown_names_are_truncated() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = InfoTag::new();

    let mut frame = Frame::new(FrameType::Other, "x", "isbjxyz", FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut frame, &context);
    assert_eq!("ISBJ", frame.internal_name());

    let mut frame = Frame::new(FrameType::Other, "", "AB", FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut frame, &context);
    assert_eq!("IKEY", frame.internal_name());
    // Empty values are stored as a single space
    assert_eq!(Some(" "), tag.field_text("IKEY"));
}

#[test]
fn set_frame_by_index() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let mut frames = get_all_frames(&tag, &context).into_vec();

    let title = frames
        .iter_mut()
        .find(|frame| frame.frame_type() == FrameType::Title)
        .unwrap();
    let FrameIndex::Native(index) = title.index() else {
        unreachable!();
    };
    assert_eq!(Mutation::Unchanged, set_frame(&mut tag, index, title, &context));
    title.set_value_if_changed("New Title");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, index, title, &context));
    assert_eq!(Some("New Title"), tag.field_text("INAM"));

    assert_eq!(Mutation::Rejected, set_frame(&mut tag, 4, title, &context));
}

#[test]
fn set_basic_frame_without_index() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    let frame = Frame::new(FrameType::Genre, "Jazz", "", FrameIndex::Unpositioned);
    assert_eq!(Mutation::Modified, set_frame_without_index(&mut tag, &frame, &context));
    assert_eq!(Some("Jazz"), tag.field_text("IGNR"));

    let frame = Frame::new(FrameType::Genre, "", "", FrameIndex::Unpositioned);
    assert_eq!(Mutation::Modified, set_frame_without_index(&mut tag, &frame, &context));
    assert_eq!(None, tag.field_text("IGNR"));
    assert_eq!(Mutation::Unchanged, set_frame_without_index(&mut tag, &frame, &context));
}

#[test]
fn delete_frames_by_filter() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    assert!(delete_frames(
        &mut tag,
        &FrameFilter::with_types([FrameType::Title, FrameType::Artist]),
        &context
    ));
    assert_eq!(2, tag.len());
    assert!(!delete_frames(&mut tag, &FrameFilter::none(), &context));
    assert!(delete_frames(&mut tag, &FrameFilter::all(), &context));
    assert!(tag.is_empty());
}

#[test]
fn frame_ids_of_info_tags() {
    let frame_ids = frame_ids();
    assert!(frame_ids.contains(&FrameType::Track.display_name().to_owned()));
    assert!(frame_ids.contains(&FrameType::Rating.display_name().to_owned()));
    assert!(!frame_ids.contains(&FrameType::Picture.display_name().to_owned()));
    assert!(frame_ids.iter().any(|id| id == "IARL"));
}

#[test]
fn audio_properties_summary() {
    assert_eq!(
        Some("WAV PCM 16 bit".to_owned()),
        read_audio_properties(&AudioProperties::Wav {
            format: 1,
            bit_depth: 16
        })
    );
    assert_eq!(
        Some("WAV".to_owned()),
        read_audio_properties(&AudioProperties::Wav {
            format: 0xFFFE,
            bit_depth: 0
        })
    );
    assert_eq!(
        Some("AIFF 24 bit".to_owned()),
        read_audio_properties(&AudioProperties::Aiff { bit_depth: 24 })
    );
    assert_eq!(None, read_audio_properties(&AudioProperties::Mpc));
}

#[test]
fn set_unmodified_frames_is_unchanged() {
    let fixture = ContextFixture::with_config(TagConfig {
        riff_track_name: "TRCK".to_owned(),
        ..Default::default()
    });
    let context = fixture.context();
    let mut tag = sample_tag();
    tag.set_field_text("isbj", "Subject");
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
fn set_frame_of_other_type_replaces_field() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    // IARL
    let frame = Frame::new(FrameType::Genre, "Jazz", "", FrameIndex::Native(0));
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 0, &frame, &context));
    assert_eq!(None, tag.field_text("IARL"));
    assert_eq!(Some("Jazz"), tag.field_text("IGNR"));
    assert_eq!(4, tag.len());
}
