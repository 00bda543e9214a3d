// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::fmt::tests::ContextFixture;

use super::*;

const PNG_DATA: &[u8] = b"\x89PNG\r\n\x1a\nfake png";

fn simple_tag(name: &str, value: &str, target_type_value: u64) -> SimpleTag {
    let mut simple_tag = SimpleTag::new(name, SimpleTagValue::String(value.to_owned()));
    simple_tag.target_type_value = target_type_value;
    simple_tag
}

fn chapter(uid: u64, start_ms: u64, end_ms: u64, title: &str) -> ChapterAtom {
    ChapterAtom {
        uid,
        time_start_ns: start_ms * NANOS_PER_MILLI,
        time_end_ns: end_ms * NANOS_PER_MILLI,
        hidden: false,
        displays: vec![ChapterDisplay {
            string: title.to_owned(),
            language: "eng".to_owned(),
        }],
    }
}

fn sample_tag() -> MatroskaTag {
    MatroskaTag {
        simple_tags: vec![
            simple_tag("TITLE", "Album", TARGET_TYPE_ALBUM),
            simple_tag("TITLE", "Track", TARGET_TYPE_TRACK),
            simple_tag("ARTIST", "Artist", 0),
            simple_tag("PART_NUMBER", "2", TARGET_TYPE_ALBUM),
        ],
        attachments: vec![
            AttachedFile {
                uid: 7,
                file_name: "cover.png".to_owned(),
                mime_type: "image/png".to_owned(),
                description: "Cover".to_owned(),
                data: PNG_DATA.to_vec(),
            },
            AttachedFile {
                uid: 8,
                file_name: "notes.txt".to_owned(),
                mime_type: "text/plain".to_owned(),
                description: "Notes".to_owned(),
                data: b"notes".to_vec(),
            },
        ],
        editions: vec![ChapterEdition {
            uid: 1,
            hidden: false,
            default: true,
            ordered: false,
            chapters: vec![chapter(1, 0, 1000, "Intro"), chapter(2, 2000, 3000, "Outro")],
        }],
    }
}

#[test]
fn target_types_select_frame_types() {
    let fixture = ContextFixture::new();
    let frames = get_all_frames(&sample_tag(), &fixture.context()).into_vec();
    let summary = frames
        .iter()
        .map(|frame| (frame.frame_type(), frame.value(), frame.index()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (FrameType::Album, "Album", FrameIndex::Native(0)),
            (FrameType::Title, "Track", FrameIndex::Native(1)),
            (FrameType::Artist, "Artist", FrameIndex::Native(2)),
            (FrameType::Disc, "2", FrameIndex::Native(3)),
        ],
        summary
    );
    assert_eq!(
        Some(&FieldValue::Int(5)),
        frames[0].field_value(FieldId::TargetType)
    );
}

#[test]
fn undefined_target_type_is_not_strict() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    assert_eq!(FrameType::Title, type_of_simple_tag("TITLE", 0, &context));
    assert_eq!(
        FrameType::SortName,
        type_of_simple_tag("TITLESORT", 0, &context)
    );
    assert_eq!(
        FrameType::ReleaseDate,
        type_of_simple_tag("DATE_RELEASED", 0, &context)
    );
    assert_eq!(FrameType::Other, type_of_simple_tag("DIRECTOR", 30, &context));
}

#[test]
fn add_album_level_frame() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = MatroskaTag::default();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = Frame::new(FrameType::AlbumArtist, "Band", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!("ARTIST", frame.internal_name());
    assert_eq!(FrameIndex::Native(0), frame.index());
    assert_eq!(TARGET_TYPE_ALBUM, tag.simple_tags[0].target_type_value);
    assert_eq!(
        SimpleTagValue::String("Band".to_owned()),
        tag.simple_tags[0].value
    );

    let frames = get_all_frames(&tag, &context).into_vec();
    assert_eq!(FrameType::AlbumArtist, frames[0].frame_type());
    assert_eq!(Mutation::Unchanged, set_frame(&mut tag, 0, &frames[0], &context));
}

#[test]
fn binary_simple_tags() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = MatroskaTag::default();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = Frame::new(
        FrameType::Other,
        "",
        "FINGERPRINT - binary",
        FrameIndex::Unpositioned,
    );
    frame.set_field_list(vec![Field::new(FieldId::Data, vec![1_u8, 2, 3])]);
    add_frame(&mut tag, &mut extra_frames, &mut frame, &context);
    assert_eq!("FINGERPRINT", tag.simple_tags[0].name);
    assert_eq!(SimpleTagValue::Binary(vec![1, 2, 3]), tag.simple_tags[0].value);

    let frames = get_all_frames(&tag, &context).into_vec();
    assert_eq!("FINGERPRINT - binary", frames[0].internal_name());
    assert_eq!(
        Some(&FieldValue::Bytes(vec![1, 2, 3])),
        frames[0].field_value(FieldId::Data)
    );
}

#[test]
fn set_frame_without_index_replaces_value() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    let frame = Frame::new(FrameType::Artist, "Other", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        set_frame_without_index(&mut tag, &frame, &context)
    );
    assert_eq!(4, tag.simple_tags.len());
    assert_eq!(
        Mutation::Unchanged,
        set_frame_without_index(&mut tag, &frame, &context)
    );

    let frame = Frame::new(FrameType::Title, "", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        set_frame_without_index(&mut tag, &frame, &context)
    );
    assert_eq!(3, tag.simple_tags.len());
    assert_eq!("Album", frame_value(&tag.simple_tags[0]));
}

fn frame_value(simple_tag: &SimpleTag) -> &str {
    match &simple_tag.value {
        SimpleTagValue::String(text) => text,
        SimpleTagValue::Binary(_) => "",
    }
}

#[test]
fn delete_frames_by_filter() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    assert!(delete_frames(
        &mut tag,
        &FrameFilter::with_types([FrameType::Album]),
        &context
    ));
    assert_eq!(3, tag.simple_tags.len());
    assert_eq!(TARGET_TYPE_TRACK, tag.simple_tags[0].target_type_value);

    let frames = get_all_frames(&tag, &context).into_vec();
    assert_eq!(Mutation::Modified, delete_frame(&mut tag, &frames[0], &context));
    assert!(delete_frames(&mut tag, &FrameFilter::all(), &context));
    assert!(tag.simple_tags.is_empty());
    assert_eq!(2, tag.attachments.len());
}

#[test]
fn attachments_are_extra_frames() {
    let frames = read_extra_frames(&sample_tag());
    assert_eq!(3, frames.len());

    assert_eq!(FrameType::Picture, frames[0].frame_type());
    assert_eq!("Cover", frames[0].value());
    let fields = PictureFields::from_frame(&frames[0]);
    assert_eq!("image/png", fields.mime_type);
    assert_eq!(PNG_DATA, fields.data.as_slice());

    assert_eq!(FrameType::Other, frames[1].frame_type());
    assert_eq!(GENERAL_OBJECT_NAME, frames[1].internal_name());
    let fields = ObjectFields::from_frame(&frames[1]);
    assert_eq!("notes.txt", fields.filename);
    assert_eq!(FrameIndex::Extra(1), frames[1].index());

    assert_eq!(CHAPTERS_NAME, frames[2].internal_name());
    assert_eq!(FrameIndex::Extra(2), frames[2].index());
}

#[test]
fn extra_frames_round_trip() {
    let tag = sample_tag();
    let mut extra_frames = ExtraFrames::default();
    extra_frames.populate(read_extra_frames(&tag));

    let mut synced = MatroskaTag {
        simple_tags: tag.simple_tags.clone(),
        ..Default::default()
    };
    sync_extra_frames(&mut synced, &extra_frames);
    assert_eq!(tag, synced);
}

#[test]
fn chapters_with_gaps() {
    let frames = read_extra_frames(&sample_tag());
    let entries = frames[2]
        .field_value(FieldId::Data)
        .and_then(FieldValue::as_list)
        .unwrap();
    assert_eq!(
        &[
            FieldValue::Int(0),
            FieldValue::Text("Intro".to_owned()),
            FieldValue::Int(1000),
            FieldValue::Text(String::new()),
            FieldValue::Int(2000),
            FieldValue::Text("Outro".to_owned()),
            FieldValue::Int(3000),
            FieldValue::Text(String::new()),
        ][..],
        entries
    );
    assert_eq!(
        Some(&FieldValue::Text("eng".to_owned())),
        frames[2].field_value(FieldId::Language)
    );
}

#[test]
fn chapter_text_with_attributes() {
    let mut atom = chapter(5, 0, 1000, "Intro");
    atom.hidden = true;
    atom.displays.push(ChapterDisplay {
        string: "Einleitung".to_owned(),
        language: "ger".to_owned(),
    });
    let text = chapter_text(&atom, 1, "eng");
    let object = serde_json::from_str::<Map<String, Value>>(&text).unwrap();
    assert_eq!(Some(&Value::from(5_u64)), object.get("uid"));
    assert_eq!(Some(&Value::Bool(true)), object.get("hidden"));
    assert_eq!(Some(&Value::from("Einleitung")), object.get("ger"));

    let mut parsed = parse_chapter_text(&text, 1, "eng");
    parsed.time_end_ns = atom.time_end_ns;
    parsed.displays.sort_by(|lhs, rhs| lhs.language.cmp(&rhs.language));
    atom.displays.sort_by(|lhs, rhs| lhs.language.cmp(&rhs.language));
    assert_eq!(atom, parsed);

    assert_eq!(
        vec![ChapterDisplay {
            string: "Plain".to_owned(),
            language: "eng".to_owned(),
        }],
        parse_chapter_text(r#"{"text":"Plain"}"#, 1, "eng").displays
    );
}

#[test]
fn edition_attributes() {
    let edition = ChapterEdition {
        default: false,
        ordered: true,
        ..Default::default()
    };
    let description = edition_description(&edition);
    let mut parsed = ChapterEdition::default();
    apply_edition_description(&mut parsed, &description);
    assert!(!parsed.default);
    assert!(parsed.ordered);
    assert!(!parsed.hidden);

    apply_edition_description(&mut parsed, "");
    assert!(parsed.default);
    assert!(!parsed.ordered);
}

#[test]
fn add_picture_attachment() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = MatroskaTag::default();
    let mut extra_frames = ExtraFrames::default();
    extra_frames.populate(read_extra_frames(&tag));

    let mut frame = Frame::new(FrameType::Picture, "", "", FrameIndex::Unpositioned);
    assert_eq!(
        Mutation::Modified,
        add_frame(&mut tag, &mut extra_frames, &mut frame, &context)
    );
    assert_eq!(FrameIndex::Extra(0), frame.index());
    assert!(frame.field_value(FieldId::Filename).is_some());

    sync_extra_frames(&mut tag, &extra_frames);
    assert_eq!(1, tag.attachments.len());
    let attachment = &tag.attachments[0];
    assert_eq!("cover.jpg", attachment.file_name);
    assert_eq!("image/jpeg", attachment.mime_type);
    assert_ne!(0, attachment.uid);
    assert!(tag.simple_tags.is_empty());
}

#[test]
fn add_chapters() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = MatroskaTag::default();
    let mut extra_frames = ExtraFrames::default();

    let mut frame = Frame::new(FrameType::Other, "", CHAPTERS_NAME, FrameIndex::Unpositioned);
    add_frame(&mut tag, &mut extra_frames, &mut frame, &context);
    sync_extra_frames(&mut tag, &extra_frames);
    assert_eq!(1, tag.editions.len());
    assert_eq!(1, tag.editions[0].uid);
    assert!(tag.editions[0].default);
    assert!(tag.editions[0].chapters.is_empty());
}

#[test]
fn frame_ids_include_extra_names() {
    let frame_ids = frame_ids();
    assert!(frame_ids.iter().any(|id| id == CHAPTERS_NAME));
    assert!(frame_ids.iter().any(|id| id == "TOTAL_PARTS"));
    assert!(frame_ids.iter().any(|id| id == FrameType::Picture.display_name()));
}

#[test]
fn audio_properties_summary() {
    assert_eq!(
        Some("Matroska Version 4 Codec A_FLAC".to_owned()),
        read_audio_properties(&AudioProperties::Matroska {
            doc_type: "matroska".to_owned(),
            doc_type_version: 4,
            codec_id: "A_FLAC".to_owned(),
        })
    );
    assert_eq!(
        Some("Webm Version 2".to_owned()),
        read_audio_properties(&AudioProperties::Matroska {
            doc_type: "webm".to_owned(),
            doc_type_version: 2,
            codec_id: String::new(),
        })
    );
    assert_eq!(None, read_audio_properties(&AudioProperties::Mpc));
}

#[test]
fn set_unmodified_frames_is_unchanged() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();
    tag.simple_tags.extend([
        simple_tag("Mood", "Calm", 0),
        simple_tag("ARTIST", "Ensemble", 25),
    ]);
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
fn set_frame_keeps_undefined_target_type() {
    let fixture = ContextFixture::new();
    let context = fixture.context();
    let mut tag = sample_tag();

    let mut frame = get_all_frames(&tag, &context).into_vec().remove(2);
    assert_eq!(FrameType::Artist, frame.frame_type());
    frame.set_value("Other");
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 2, &frame, &context));
    assert_eq!(0, tag.simple_tags[2].target_type_value);
    assert_eq!("Other", frame_value(&tag.simple_tags[2]));

    assert!(frame.set_field(FieldId::TargetType, FieldValue::Int(5)));
    assert_eq!(Mutation::Modified, set_frame(&mut tag, 2, &frame, &context));
    assert_eq!(TARGET_TYPE_ALBUM, tag.simple_tags[2].target_type_value);
}
