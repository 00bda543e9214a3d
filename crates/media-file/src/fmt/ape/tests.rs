// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::fmt::tests::ContextFixture;

use super::*;

const JPEG_DATA: &[u8] = b"\xFF\xD8\xFF\xE0fake jpeg";

fn sample_tag() -> ApeTag {
    let mut tag = ApeTag::new();
    tag.insert(ApeItem::text("Title", vec!["Title".to_owned()]));
    tag.insert(ApeItem::text("YEAR", vec!["2001".to_owned()]));
    tag.insert(ApeItem::text(
        "Artist",
        vec!["First".to_owned(), "Second".to_owned()],
    ));
    let mut payload = b"Front\0".to_vec();
    payload.extend_from_slice(JPEG_DATA);
    tag.insert(ApeItem::binary("COVER ART (FRONT)", payload));
    tag
}

#[test]
fn pictures_are_not_native_frames() {
    let fixture = ContextFixture::new();
    let frames = get_all_frames(&sample_tag(), &fixture.context()).into_vec();
    let summary = frames
        .iter()
        .map(|frame| (frame.frame_type(), frame.value(), frame.index()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (FrameType::Artist, "First|Second", FrameIndex::Native(0)),
            (FrameType::Title, "Title", FrameIndex::Native(1)),
            (FrameType::Date, "2001", FrameIndex::Native(2)),
        ],
        summary
    );
}

#[test]
fn picture_payload_with_description() {
    let frames = read_extra_frames(&sample_tag());
    assert_eq!(1, frames.len());
    let fields = PictureFields::from_frame(&frames[0]);
    assert_eq!(FrameIndex::Extra(0), frames[0].index());
    assert_eq!("Front", frames[0].value());
    assert_eq!(PictureType::CoverFront, fields.picture_type);
    assert_eq!("image/jpeg", fields.mime_type);
    assert_eq!(JPEG_DATA, fields.data.as_slice());
}

#[test]
fn picture_payload_without_description() {
    assert_eq!(
        (String::new(), JPEG_DATA),
        parse_picture_payload(JPEG_DATA)
    );
    assert_eq!(
        (String::new(), &[][..]),
        parse_picture_payload(&[])
    );
    assert_eq!(
        ("Back".to_owned(), &b"data"[..]),
        parse_picture_payload(b"Back\0data")
    );
}

#[test]
fn year_key_for_dates() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = ApeTag::new();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = Frame::new(FrameType::Date, "2024", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!("YEAR", frame.internal_name());
    assert_eq!(
        Some(&ApeValue::Text(vec!["2024".to_owned()])),
        tag.item("YEAR").map(|item| &item.value)
    );
    assert!(!tag.contains("DATE"));

    let frames = get_all_frames(&tag, &context).into_vec();
    assert_eq!(FrameType::Date, frames[0].frame_type());
}

#[test]
fn multiple_values_are_split() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let mut frame = get_all_frames(&tag, &context).into_vec().swap_remove(0);

    assert_eq!(Mutation::Unchanged, set_frame(&mut tag, 0, &frame, &context));
    frame.set_value_if_changed("One|Two|Three");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 0, &frame, &context));
    assert_eq!(
        Some(&ApeValue::Text(vec![
            "One".to_owned(),
            "Two".to_owned(),
            "Three".to_owned()
        ])),
        tag.item("ARTIST").map(|item| &item.value)
    );
    assert_eq!(Mutation::Rejected, set_frame(&mut tag, 3, &frame, &context));
}

#[test]
fn add_picture_with_description() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = ApeTag::new();
    let mut extra_frames = ExtraFrames::default();
    assert!(extra_frames.populate(read_extra_frames(&tag)));

    let mut frame = PictureFields {
        description: "Front".to_owned(),
        data: JPEG_DATA.to_vec(),
        ..Default::default()
    }
    .into_frame("", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!(FrameIndex::Extra(0), frame.index());
    assert!(tag.is_empty());

    sync_extra_frames(&mut tag, &extra_frames);
    let mut payload = b"Front\0".to_vec();
    payload.extend_from_slice(JPEG_DATA);
    assert_eq!(
        Some(&ApeValue::Binary(payload)),
        tag.item("COVER ART (FRONT)").map(|item| &item.value)
    );
}

#[test]
fn empty_pictures_get_unused_types() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let mut extra_frames = ExtraFrames::default();
    extra_frames.populate(read_extra_frames(&tag));

    let mut frame = Frame::new(FrameType::Picture, "", "", FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut extra_frames, &mut frame, &context);
    assert_eq!(FrameIndex::Extra(1), frame.index());
    assert_eq!(
        PictureType::CoverBack,
        PictureFields::from_frame(&frame).picture_type
    );
    assert_eq!("COVER ART (BACK)", frame.internal_name());

    sync_extra_frames(&mut tag, &extra_frames);
    assert!(tag.contains("COVER ART (FRONT)"));
    assert!(tag.contains("COVER ART (BACK)"));
}

#[test]
fn delete_frames_keeps_pictures_for_cache() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    assert!(delete_frames(&mut tag, &FrameFilter::all(), &context));
    assert_eq!(1, tag.len());
    assert!(tag.contains("COVER ART (FRONT)"));
}

#[test]
fn delete_frame_by_index() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    let frames = get_all_frames(&tag, &context).into_vec();

    assert_eq!(Mutation::Modified, delete_frame(&mut tag, &frames[1], &context));
    assert!(!tag.contains("TITLE"));
    assert_eq!(Mutation::Unchanged, delete_frame(&mut tag, &frames[1], &context));
}

#[test]
fn name_lookup() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    assert_eq!(FrameType::Track, type_from_ape_key("Track", &context));
    assert_eq!(FrameType::EncodedBy, type_from_ape_key("Encoded By", &context));
    assert_eq!(FrameType::Picture, type_from_ape_key("Cover Art (Back)", &context));
    assert_eq!(FrameType::Other, type_from_ape_key("MY KEY", &context));
}

#[test]
fn audio_properties_summary() {
    assert_eq!(
        Some("APE 3.990 16 bit".to_owned()),
        read_audio_properties(&AudioProperties::Ape {
            version: 3990,
            bit_depth: 16
        })
    );
    assert_eq!(
        Some("WavPack 407 24 bit".to_owned()),
        read_audio_properties(&AudioProperties::WavPack {
            version: 0x407,
            bit_depth: 24
        })
    );
    assert_eq!(Some("MPC".to_owned()), read_audio_properties(&AudioProperties::Mpc));
}

#[test]
fn set_unmodified_frames_is_unchanged() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    tag.insert(ApeItem::text("DATE", vec!["1999".to_owned()]));
    tag.insert(ApeItem::text("Mood", vec!["Calm".to_owned()]));
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
fn set_frame_keeps_alias_key() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = ApeTag::new();
    tag.insert(ApeItem::text("DATE", vec!["1999".to_owned()]));

    let mut frame = get_all_frames(&tag, &context).into_vec().remove(0);
    assert_eq!(FrameType::Date, frame.frame_type());
    frame.set_value_if_changed("2000");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 0, &frame, &context));
    assert_eq!(
        vec!["DATE"],
        tag.items().map(|item| item.key.as_str()).collect::<Vec<_>>()
    );
    assert!(!tag.contains(YEAR_KEY));
    assert_eq!(
        Some(&ApeValue::Text(vec!["2000".to_owned()])),
        tag.item("DATE").map(|item| &item.value)
    );
}
