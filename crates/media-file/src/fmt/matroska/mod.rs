// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Matroska and WebM files.
//!
//! Simple tags are native frames. Attachments and chapter editions
//! are exposed as extra frames.

use serde_json::{Map, Value};
use tagweave_core::{
    frame::{Field, FieldId, FieldValue, Frame, FrameCollection, FrameFilter, FrameIndex, FrameType, TextEncoding},
    picture::{ObjectFields, PictureFields, PictureType},
};

use super::{
    ExtraFrames, KeyCharset, Mutation, TagContext, TagSlot, custom_or_other_type, fix_up_key,
    standard_frame_ids,
};
use crate::{
    native::{
        AttachedFile, AudioProperties, ChapterAtom, ChapterDisplay, ChapterEdition, ContainerKind,
        MatroskaTag, NativeTagKind, SimpleTag, SimpleTagValue,
        matroska::{TARGET_TYPE_ALBUM, TARGET_TYPE_TRACK},
    },
    util::{guess_mime_from_file_name, picture::image_format_from_mime_type},
};

pub const EXTENSIONS: &[&str] = &["MKA", "MKV", "WEBM"];

pub const TAG_FORMAT: &str = "Matroska";

/// Internal name of attachments that are not pictures.
pub const GENERAL_OBJECT_NAME: &str = "General Object";

/// Internal name of chapter editions.
pub const CHAPTERS_NAME: &str = "Chapters";

/// Suffix of the internal name of simple tags with a binary value.
pub const BINARY_SUFFIX: &str = " - binary";

const PICTURE_NAME: &str = "PICTURE";

const UNDEFINED_LANGUAGE: &str = "und";

/// Chapter times are in milliseconds, see ID3v2 `SYLT`.
const TIMESTAMP_FORMAT_MS: i64 = 2;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Official tag names without a frame type.
const EXTRA_FRAME_IDS: &[&str] = &[
    "DIRECTOR",
    "DURATION",
    "SUMMARY",
    "SYNOPSIS",
    "TOTAL_PARTS",
    CHAPTERS_NAME,
    GENERAL_OBJECT_NAME,
];

#[derive(Debug, Clone, Copy)]
struct TagName {
    frame_type: FrameType,
    name: &'static str,
    target_type_value: u64,

    /// Only matches an explicit target type.
    strict: bool,
}

const fn track(frame_type: FrameType, name: &'static str) -> TagName {
    TagName {
        frame_type,
        name,
        target_type_value: TARGET_TYPE_TRACK,
        strict: false,
    }
}

const fn album(frame_type: FrameType, name: &'static str, strict: bool) -> TagName {
    TagName {
        frame_type,
        name,
        target_type_value: TARGET_TYPE_ALBUM,
        strict,
    }
}

const TAG_NAMES: [TagName; 49] = [
    track(FrameType::Title, "TITLE"),
    track(FrameType::Artist, "ARTIST"),
    album(FrameType::Album, "TITLE", true),
    track(FrameType::Comment, "COMMENT"),
    track(FrameType::Date, "DATE_RECORDED"),
    track(FrameType::Track, "PART_NUMBER"),
    track(FrameType::Genre, "GENRE"),
    album(FrameType::AlbumArtist, "ARTIST", true),
    track(FrameType::Arranger, "ARRANGER"),
    track(FrameType::Author, "WRITTEN_BY"),
    track(FrameType::Bpm, "BPM"),
    track(FrameType::CatalogNumber, "CATALOG_NUMBER"),
    track(FrameType::Compilation, "COMPILATION"),
    track(FrameType::Composer, "COMPOSER"),
    track(FrameType::Conductor, "CONDUCTOR"),
    track(FrameType::Copyright, "COPYRIGHT"),
    album(FrameType::Disc, "PART_NUMBER", true),
    track(FrameType::EncodedBy, "ENCODER"),
    track(FrameType::EncoderSettings, "ENCODER_SETTINGS"),
    track(FrameType::EncodingTime, "DATE_ENCODED"),
    track(FrameType::Grouping, "GROUPING"),
    track(FrameType::InitialKey, "INITIAL_KEY"),
    track(FrameType::Isrc, "ISRC"),
    track(FrameType::Language, "LANGUAGE"),
    track(FrameType::Lyricist, "LYRICIST"),
    track(FrameType::Lyrics, "LYRICS"),
    track(FrameType::Media, "ORIGINAL_MEDIA_TYPE"),
    track(FrameType::Mood, "MOOD"),
    track(FrameType::OriginalAlbum, "ORIGINALALBUM"),
    track(FrameType::OriginalArtist, "ORIGINALARTIST"),
    track(FrameType::OriginalDate, "ORIGINALDATE"),
    track(FrameType::Description, "DESCRIPTION"),
    track(FrameType::Performer, "PERFORMER"),
    track(FrameType::Picture, PICTURE_NAME),
    track(FrameType::Publisher, "LABEL_CODE"),
    track(FrameType::ReleaseCountry, "RELEASECOUNTRY"),
    track(FrameType::Remixer, "REMIXED_BY"),
    album(FrameType::SortAlbum, "TITLESORT", true),
    album(FrameType::SortAlbumArtist, "ARTISTSORT", true),
    track(FrameType::SortArtist, "ARTISTSORT"),
    track(FrameType::SortComposer, "COMPOSERSORT"),
    track(FrameType::SortName, "TITLESORT"),
    track(FrameType::Subtitle, "SUBTITLE"),
    track(FrameType::Website, "WEBSITE"),
    track(FrameType::WwwAudioFile, "WWWAUDIOFILE"),
    track(FrameType::WwwAudioSource, "WWWAUDIOSOURCE"),
    album(FrameType::ReleaseDate, "DATE_RELEASED", false),
    track(FrameType::Rating, "RATING"),
    track(FrameType::Work, "WORK"),
];

/// Name and target type value of the simple tag for a frame.
fn simple_tag_name(frame: &Frame, context: &TagContext<'_>) -> (String, u64) {
    let frame_type = frame.frame_type();
    if frame_type.is_custom()
        && let Some(name) = context.custom_frames.name_of(frame_type)
    {
        return (name.to_uppercase(), TARGET_TYPE_TRACK);
    }
    if let Some(entry) = TAG_NAMES.iter().find(|entry| entry.frame_type == frame_type) {
        return (entry.name.to_owned(), entry.target_type_value);
    }
    let name = frame.name();
    let name = name.strip_suffix(BINARY_SUFFIX).unwrap_or(name);
    (
        fix_up_key(name, KeyCharset::Vorbis).to_uppercase(),
        TARGET_TYPE_TRACK,
    )
}

/// Frame type of a simple tag.
///
/// An undefined target type matches all entries that are not strict.
fn type_of_simple_tag(
    name: &str,
    target_type_value: u64,
    context: &TagContext<'_>,
) -> FrameType {
    TAG_NAMES
        .iter()
        .find(|entry| {
            entry.name.eq_ignore_ascii_case(name)
                && (entry.target_type_value == target_type_value
                    || (target_type_value == 0 && !entry.strict))
        })
        .map_or_else(
            || custom_or_other_type(name, context),
            |entry| entry.frame_type,
        )
}

fn is_extra_frame(frame: &Frame) -> bool {
    match frame.frame_type() {
        FrameType::Picture => true,
        FrameType::Other => {
            let name = frame.internal_name();
            name == GENERAL_OBJECT_NAME || name == CHAPTERS_NAME
        }
        _ => false,
    }
}

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    EXTENSIONS
        .contains(&extension)
        .then_some(ContainerKind::Matroska)
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    (container_kind == ContainerKind::Matroska && slot == TagSlot::Primary)
        .then_some(NativeTagKind::Matroska)
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    let AudioProperties::Matroska {
        doc_type,
        doc_type_version,
        codec_id,
    } = audio_properties
    else {
        return None;
    };
    let mut chars = doc_type.chars();
    let mut summary = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    });
    summary.push_str(&format!(" Version {doc_type_version}"));
    if !codec_id.is_empty() {
        summary.push_str(&format!(" Codec {codec_id}"));
    }
    Some(summary)
}

fn frame_of_simple_tag(simple_tag: &SimpleTag, index: usize, context: &TagContext<'_>) -> Frame {
    let frame_type = type_of_simple_tag(&simple_tag.name, simple_tag.target_type_value, context);
    let (value, internal_name, value_field) = match &simple_tag.value {
        SimpleTagValue::String(text) => (
            text.clone(),
            simple_tag.name.clone(),
            Field::new(FieldId::Text, text.as_str()),
        ),
        SimpleTagValue::Binary(data) => (
            String::new(),
            format!("{name}{BINARY_SUFFIX}", name = simple_tag.name),
            Field::new(FieldId::Data, data.clone()),
        ),
    };
    let mut frame = Frame::new(frame_type, value, internal_name, FrameIndex::Native(index));
    frame.set_field_list(vec![
        value_field,
        Field::new(
            FieldId::TargetType,
            i64::try_from(simple_tag.target_type_value / 10).unwrap_or_default(),
        ),
        Field::new(FieldId::Language, simple_tag.language.as_str()),
        Field::new(FieldId::Default, simple_tag.default),
        Field::new(FieldId::Id, simple_tag.track_uid.to_string()),
    ]);
    frame
}

fn simple_tag_of_frame(frame: &Frame, context: &TagContext<'_>) -> SimpleTag {
    let (name, default_target_type_value) = simple_tag_name(frame, context);
    let value = if frame.internal_name().ends_with(BINARY_SUFFIX) {
        let data = frame
            .field_value(FieldId::Data)
            .and_then(FieldValue::as_bytes)
            .unwrap_or_else(|| frame.value().as_bytes());
        SimpleTagValue::Binary(data.to_vec())
    } else {
        SimpleTagValue::String(frame.value().to_owned())
    };
    let mut simple_tag = SimpleTag::new(name, value);
    simple_tag.target_type_value = frame
        .field_value(FieldId::TargetType)
        .and_then(FieldValue::to_int)
        .and_then(|target_type| u64::try_from(target_type).ok())
        .filter(|target_type| *target_type > 0)
        .map_or(default_target_type_value, |target_type| target_type * 10);
    if let Some(language) = frame
        .field_value(FieldId::Language)
        .map(FieldValue::to_text)
        .filter(|language| !language.is_empty())
    {
        simple_tag.language = language.into_owned();
    }
    if let Some(default) = frame.field_value(FieldId::Default).and_then(FieldValue::to_int) {
        simple_tag.default = default != 0;
    }
    simple_tag.track_uid = frame
        .field_value(FieldId::Id)
        .and_then(|id| id.to_text().trim().parse().ok())
        .unwrap_or_default();
    simple_tag
}

#[must_use]
pub fn get_all_frames(tag: &MatroskaTag, context: &TagContext<'_>) -> FrameCollection {
    tag.simple_tags
        .iter()
        .enumerate()
        .map(|(index, simple_tag)| frame_of_simple_tag(simple_tag, index, context))
        .collect::<Vec<_>>()
        .into()
}

pub(crate) fn set_frame(
    tag: &mut MatroskaTag,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some(existing) = tag.simple_tags.get_mut(index) else {
        log::debug!("Simple tag index {index} out of range");
        return Mutation::Rejected;
    };
    let mut simple_tag = simple_tag_of_frame(frame, context);
    // The field only carries the level, keep the exact native value
    let target_type = frame
        .field_value(FieldId::TargetType)
        .and_then(FieldValue::to_int)
        .unwrap_or_default();
    if i64::try_from(existing.target_type_value / 10).is_ok_and(|level| level == target_type) {
        simple_tag.target_type_value = existing.target_type_value;
    }
    if existing.name.eq_ignore_ascii_case(&simple_tag.name) {
        simple_tag.name.clone_from(&existing.name);
    }
    if *existing == simple_tag {
        return Mutation::Unchanged;
    }
    *existing = simple_tag;
    Mutation::Modified
}

/// Position of the first simple tag with the same name and frame type.
fn position_of_simple_tag(
    tag: &MatroskaTag,
    name: &str,
    target_type_value: u64,
    context: &TagContext<'_>,
) -> Option<usize> {
    let frame_type = type_of_simple_tag(name, target_type_value, context);
    tag.simple_tags.iter().position(|existing| {
        existing.name == name
            && type_of_simple_tag(&existing.name, existing.target_type_value, context)
                == frame_type
    })
}

pub(crate) fn set_frame_without_index(
    tag: &mut MatroskaTag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let simple_tag = simple_tag_of_frame(frame, context);
    let position = position_of_simple_tag(
        tag,
        &simple_tag.name,
        simple_tag.target_type_value,
        context,
    );
    match position {
        Some(index) if frame.value().is_empty() => {
            tag.simple_tags.remove(index);
            Mutation::Modified
        }
        None if frame.value().is_empty() => Mutation::Unchanged,
        Some(index) => {
            let existing = &mut tag.simple_tags[index];
            if existing.value == simple_tag.value {
                return Mutation::Unchanged;
            }
            existing.value = simple_tag.value;
            Mutation::Modified
        }
        None => {
            tag.simple_tags.push(simple_tag);
            Mutation::Modified
        }
    }
}

fn default_extra_fields(frame: &Frame) -> Vec<Field> {
    if frame.internal_name() == CHAPTERS_NAME {
        let edition = ChapterEdition {
            default: true,
            ..Default::default()
        };
        return chapters_fields(&edition, UNDEFINED_LANGUAGE);
    }
    let mut fields = if frame.frame_type() == FrameType::Picture {
        let mut fields = PictureFields::default().to_field_list();
        fields.push(Field::new(FieldId::Filename, ""));
        fields
    } else {
        ObjectFields::default().to_field_list()
    };
    fields.push(Field::new(FieldId::Id, "0"));
    fields
}

pub(crate) fn add_frame(
    tag: &mut MatroskaTag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if is_extra_frame(frame) {
        if frame.field_list().is_empty() {
            let fields = default_extra_fields(frame);
            frame.set_field_list(fields);
        }
        if frame.frame_type() == FrameType::Picture {
            frame.set_internal_name(PICTURE_NAME);
        }
        extra_frames.push(frame);
        return Mutation::Modified;
    }
    let (name, target_type_value) = simple_tag_name(frame, context);
    let binary = frame.internal_name().ends_with(BINARY_SUFFIX);
    if frame.field_list().is_empty() {
        let value_field = if binary {
            Field::new(FieldId::Data, frame.value().as_bytes().to_vec())
        } else {
            Field::new(FieldId::Text, frame.value())
        };
        frame.set_field_list(vec![
            value_field,
            Field::new(
                FieldId::TargetType,
                i64::try_from(target_type_value / 10).unwrap_or_default(),
            ),
            Field::new(FieldId::Language, UNDEFINED_LANGUAGE),
            Field::new(FieldId::Default, true),
            Field::new(FieldId::Id, "0"),
        ]);
    }
    let internal_name = if binary {
        format!("{name}{BINARY_SUFFIX}")
    } else {
        name
    };
    frame.set_internal_name(internal_name);
    let simple_tag = simple_tag_of_frame(frame, context);
    tag.simple_tags.push(simple_tag);
    frame.set_index(FrameIndex::Native(tag.simple_tags.len() - 1));
    Mutation::Modified
}

pub(crate) fn delete_frame(
    tag: &mut MatroskaTag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let index = frame.index().native().or_else(|| {
        let (name, target_type_value) = simple_tag_name(frame, context);
        position_of_simple_tag(tag, &name, target_type_value, context)
    });
    match index {
        Some(index) if index < tag.simple_tags.len() => {
            tag.simple_tags.remove(index);
            Mutation::Modified
        }
        _ => Mutation::Unchanged,
    }
}

pub(crate) fn delete_frames(
    tag: &mut MatroskaTag,
    filter: &FrameFilter,
    context: &TagContext<'_>,
) -> bool {
    let len_before = tag.simple_tags.len();
    if filter.are_all_enabled() {
        tag.simple_tags.clear();
    } else {
        tag.simple_tags.retain(|simple_tag| {
            let frame_type =
                type_of_simple_tag(&simple_tag.name, simple_tag.target_type_value, context);
            !filter.is_enabled(frame_type, &simple_tag.name)
        });
    }
    tag.simple_tags.len() != len_before
}

#[must_use]
pub fn frame_ids() -> Vec<String> {
    let mut frame_ids = standard_frame_ids(|_| true);
    frame_ids.extend(EXTRA_FRAME_IDS.iter().map(|name| (*name).to_owned()));
    frame_ids
}

fn frame_of_attachment(attachment: &AttachedFile, index: usize) -> Frame {
    let mut frame = if attachment.mime_type.starts_with("image/") {
        PictureFields {
            image_format: image_format_from_mime_type(&attachment.mime_type).to_owned(),
            mime_type: attachment.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: attachment.description.clone(),
            data: attachment.data.clone(),
            ..Default::default()
        }
        .into_frame(PICTURE_NAME, FrameIndex::Extra(index))
    } else {
        let fields = ObjectFields {
            text_encoding: TextEncoding::Utf8,
            mime_type: attachment.mime_type.clone(),
            filename: attachment.file_name.clone(),
            description: attachment.description.clone(),
            data: attachment.data.clone(),
        };
        let mut frame = Frame::new(
            FrameType::Other,
            attachment.description.as_str(),
            GENERAL_OBJECT_NAME,
            FrameIndex::Extra(index),
        );
        frame.set_field_list(fields.to_field_list());
        frame
    };
    if frame.frame_type() == FrameType::Picture {
        frame
            .field_list_mut()
            .push(Field::new(FieldId::Filename, attachment.file_name.as_str()));
    }
    frame
        .field_list_mut()
        .push(Field::new(FieldId::Id, attachment.uid.to_string()));
    frame
}

/// Unique id of an attachment, derived from its contents.
fn attachment_uid(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes).max(1)
}

fn field_uid(frame: &Frame) -> u64 {
    frame
        .field_value(FieldId::Id)
        .and_then(|id| id.to_text().trim().parse().ok())
        .unwrap_or_default()
}

fn attachment_of_frame(frame: &Frame) -> AttachedFile {
    let filename = frame
        .field_value(FieldId::Filename)
        .map(|filename| filename.to_text().into_owned())
        .unwrap_or_default();
    let (mime_type, file_name, description, data) = if frame.frame_type() == FrameType::Picture {
        let fields = PictureFields::from_frame(frame);
        let file_name = if filename.is_empty() {
            format!("cover.{ext}", ext = fields.image_format.to_lowercase())
        } else {
            filename
        };
        (fields.mime_type, file_name, fields.description, fields.data)
    } else {
        let fields = ObjectFields::from_frame(frame);
        let mime_type = if fields.mime_type.is_empty() {
            guess_mime_from_file_name(&fields.filename)
                .map_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string(), |mime| mime.to_string())
        } else {
            fields.mime_type
        };
        (mime_type, fields.filename, fields.description, fields.data)
    };
    let uid = match field_uid(frame) {
        0 => attachment_uid(&data),
        uid => uid,
    };
    AttachedFile {
        uid,
        file_name,
        mime_type,
        description,
        data,
    }
}

fn millis(nanos: u64) -> i64 {
    i64::try_from(nanos / NANOS_PER_MILLI).unwrap_or(i64::MAX)
}

fn nanos(millis: i64) -> u64 {
    u64::try_from(millis)
        .unwrap_or_default()
        .saturating_mul(NANOS_PER_MILLI)
}

/// Attributes of an edition that differ from the defaults, as JSON.
fn edition_description(edition: &ChapterEdition) -> String {
    let mut attributes = Map::new();
    if !edition.default {
        attributes.insert("default".to_owned(), Value::Bool(false));
    }
    if edition.ordered {
        attributes.insert("ordered".to_owned(), Value::Bool(true));
    }
    if edition.hidden {
        attributes.insert("hidden".to_owned(), Value::Bool(true));
    }
    if attributes.is_empty() {
        String::new()
    } else {
        Value::Object(attributes).to_string()
    }
}

fn apply_edition_description(edition: &mut ChapterEdition, description: &str) {
    edition.default = true;
    edition.ordered = false;
    edition.hidden = false;
    if description.trim().is_empty() {
        return;
    }
    match serde_json::from_str::<Map<String, Value>>(description) {
        Ok(attributes) => {
            let flag = |key: &str| attributes.get(key).and_then(Value::as_bool);
            edition.default = flag("default").unwrap_or(true);
            edition.ordered = flag("ordered").unwrap_or(false);
            edition.hidden = flag("hidden").unwrap_or(false);
        }
        Err(err) => {
            log::warn!("Ignoring invalid chapter edition attributes \"{description}\": {err}");
        }
    }
}

/// Text of a chapter: either a plain title in the default language
/// or a JSON object with a title per language.
fn chapter_text(chapter: &ChapterAtom, chapter_number: u64, language: &str) -> String {
    if let [display] = chapter.displays.as_slice()
        && display.language == language
        && chapter.uid == chapter_number
        && !chapter.hidden
        && !display.string.is_empty()
        && !display.string.starts_with('{')
    {
        return display.string.clone();
    }
    let mut object = Map::new();
    for display in &chapter.displays {
        object.insert(display.language.clone(), Value::String(display.string.clone()));
    }
    if chapter.uid != chapter_number {
        object.insert("uid".to_owned(), Value::from(chapter.uid));
    }
    if chapter.hidden {
        object.insert("hidden".to_owned(), Value::Bool(true));
    }
    Value::Object(object).to_string()
}

fn parse_chapter_text(text: &str, chapter_number: u64, language: &str) -> ChapterAtom {
    let mut chapter = ChapterAtom {
        uid: chapter_number,
        ..Default::default()
    };
    let object = text
        .starts_with('{')
        .then(|| serde_json::from_str::<Map<String, Value>>(text).ok())
        .flatten();
    let Some(object) = object else {
        chapter.displays.push(ChapterDisplay {
            string: text.to_owned(),
            language: language.to_owned(),
        });
        return chapter;
    };
    for (key, value) in object {
        match key.as_str() {
            "uid" => {
                if let Some(uid) = value.as_u64() {
                    chapter.uid = uid;
                }
            }
            "hidden" => chapter.hidden = value.as_bool().unwrap_or_default(),
            _ => {
                let Value::String(string) = value else {
                    log::debug!("Ignoring chapter attribute {key} = {value}");
                    continue;
                };
                let language = if key == "text" {
                    language.to_owned()
                } else {
                    key.clone()
                };
                chapter.displays.push(ChapterDisplay { string, language });
            }
        }
    }
    chapter
}

/// Synchronized text with a time stamp at the start of each chapter.
///
/// Gaps between chapters and the end of the last chapter are marked
/// by entries with an empty text.
fn chapters_fields(edition: &ChapterEdition, language: &str) -> Vec<Field> {
    let mut entries = Vec::with_capacity(edition.chapters.len() * 4);
    let mut previous_end = None;
    for (chapter, chapter_number) in edition.chapters.iter().zip(1..) {
        if let Some(end) = previous_end
            && end != chapter.time_start_ns
        {
            entries.push(FieldValue::Int(millis(end)));
            entries.push(FieldValue::Text(String::new()));
        }
        entries.push(FieldValue::Int(millis(chapter.time_start_ns)));
        entries.push(FieldValue::Text(chapter_text(chapter, chapter_number, language)));
        previous_end = Some(chapter.time_end_ns);
    }
    if let Some(end) = previous_end {
        entries.push(FieldValue::Int(millis(end)));
        entries.push(FieldValue::Text(String::new()));
    }
    vec![
        Field::new(FieldId::TextEnc, TextEncoding::Utf8),
        Field::new(FieldId::Language, language),
        Field::new(FieldId::TimestampFormat, TIMESTAMP_FORMAT_MS),
        Field::new(FieldId::ContentType, 0_i64),
        Field::new(FieldId::Description, edition_description(edition)),
        Field::new(FieldId::Data, FieldValue::List(entries)),
        Field::new(FieldId::Id, edition.uid.to_string()),
    ]
}

fn frame_of_edition(edition: &ChapterEdition, index: usize) -> Frame {
    let language = edition
        .chapters
        .iter()
        .flat_map(|chapter| &chapter.displays)
        .map(|display| display.language.as_str())
        .next()
        .unwrap_or(UNDEFINED_LANGUAGE);
    let fields = chapters_fields(edition, language);
    let mut frame = Frame::new(
        FrameType::Other,
        edition_description(edition),
        CHAPTERS_NAME,
        FrameIndex::Extra(index),
    );
    frame.set_field_list(fields);
    frame
}

fn edition_of_frame(frame: &Frame, edition_number: u64) -> ChapterEdition {
    let language = frame
        .field_value(FieldId::Language)
        .map(FieldValue::to_text)
        .filter(|language| !language.is_empty())
        .map_or_else(|| UNDEFINED_LANGUAGE.to_owned(), |language| language.into_owned());
    let mut edition = ChapterEdition {
        uid: match field_uid(frame) {
            0 => edition_number,
            uid => uid,
        },
        ..Default::default()
    };
    let description = frame
        .field_value(FieldId::Description)
        .map(FieldValue::to_text)
        .unwrap_or_default();
    apply_edition_description(&mut edition, &description);
    let entries = frame
        .field_value(FieldId::Data)
        .and_then(FieldValue::as_list)
        .unwrap_or_default();
    let timed_texts = entries
        .chunks_exact(2)
        .map(|pair| (pair[0].to_int().unwrap_or_default(), pair[1].to_text()))
        .collect::<Vec<_>>();
    let mut chapter_number = 0;
    for (pos, (start_ms, text)) in timed_texts.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        chapter_number += 1;
        let end_ms = timed_texts
            .get(pos + 1)
            .map_or(*start_ms, |(next_ms, _)| *next_ms);
        let mut chapter = parse_chapter_text(text, chapter_number, &language);
        chapter.time_start_ns = nanos(*start_ms);
        chapter.time_end_ns = nanos(end_ms);
        edition.chapters.push(chapter);
    }
    edition
}

pub(crate) fn read_extra_frames(tag: &MatroskaTag) -> Vec<Frame> {
    let mut frames = tag
        .attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| frame_of_attachment(attachment, index))
        .collect::<Vec<_>>();
    let offset = frames.len();
    frames.extend(
        tag.editions
            .iter()
            .enumerate()
            .map(|(index, edition)| frame_of_edition(edition, offset + index)),
    );
    frames
}

pub(crate) fn sync_extra_frames(tag: &mut MatroskaTag, extra_frames: &ExtraFrames) {
    tag.attachments.clear();
    tag.editions.clear();
    let mut edition_number = 0;
    for frame in extra_frames.iter() {
        if frame.frame_type() == FrameType::Other && frame.internal_name() == CHAPTERS_NAME {
            edition_number += 1;
            tag.editions.push(edition_of_frame(frame, edition_number));
        } else if is_extra_frame(frame) {
            tag.attachments.push(attachment_of_frame(frame));
        }
    }
}

#[cfg(test)]
mod tests;
