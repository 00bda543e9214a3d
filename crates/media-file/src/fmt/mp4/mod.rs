// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MP4 `ilst` atoms.
//!
//! Atoms that are not registered in [`ATOMS`] or whose name starts
//! with an upper-case letter are stored as free-form atoms with the
//! iTunes prefix. Frames always carry the name without prefix.

use tagweave_core::{
    frame::{Field, FieldId, Frame, FrameCollection, FrameFilter, FrameIndex, FrameType},
    picture::PictureFields,
    util::string::{join_string_list, parse_number_pair, split_string_list},
};

use super::{ExtraFrames, Mutation, TagContext, TagSlot};
use crate::{
    native::{AudioProperties, ContainerKind, Mp4CoverArt, Mp4Tag, Mp4Value, NativeTagKind},
    util::picture::{
        image_format_from_mime_type, mime_type_from_mp4_image_format,
        mp4_image_format_from_mime_type,
    },
};

pub const EXTENSIONS: &[&str] = &["M4A", "M4R", "M4B", "M4P", "MP4", "3G2", "M4V", "MP4V"];

pub const TAG_FORMAT: &str = "MP4";

const FREE_FORM_MARKER: &str = "----";

const ITUNES_FREE_FORM_PREFIX: &str = "----:com.apple.iTunes:";

const COVER_ART_NAME: &str = "covr";

const TRACK_NAME: &str = "trkn";

/// Type of the data stored in an atom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ValueKind {
    ByteArray,
    CoverArt,
    Text,
    Bool,
    Int,
    IntPair,
    Byte,
    UInt,
    LongLong,
    Stem,
}

/// Atom names with their frame and value types.
///
/// If a frame type occurs more than once the last entry is used for
/// writing.
const ATOMS: &[(&str, FrameType, ValueKind)] = &[
    ("\u{a9}nam", FrameType::Title, ValueKind::Text),
    ("\u{a9}ART", FrameType::Artist, ValueKind::Text),
    ("\u{a9}wrt", FrameType::Composer, ValueKind::Text),
    ("\u{a9}alb", FrameType::Album, ValueKind::Text),
    ("\u{a9}day", FrameType::Date, ValueKind::Text),
    ("\u{a9}enc", FrameType::EncodedBy, ValueKind::Text),
    ("\u{a9}cmt", FrameType::Comment, ValueKind::Text),
    ("gnre", FrameType::Genre, ValueKind::Text),
    ("\u{a9}gen", FrameType::Genre, ValueKind::Text),
    (TRACK_NAME, FrameType::Track, ValueKind::IntPair),
    ("disk", FrameType::Disc, ValueKind::IntPair),
    ("cpil", FrameType::Compilation, ValueKind::Bool),
    ("tmpo", FrameType::Bpm, ValueKind::Int),
    ("\u{a9}grp", FrameType::Grouping, ValueKind::Text),
    ("aART", FrameType::AlbumArtist, ValueKind::Text),
    ("pgap", FrameType::Other, ValueKind::Bool),
    ("cprt", FrameType::Copyright, ValueKind::Text),
    ("\u{a9}lyr", FrameType::Lyrics, ValueKind::Text),
    ("tvsh", FrameType::Other, ValueKind::Text),
    ("tvnn", FrameType::Other, ValueKind::Text),
    ("tven", FrameType::Other, ValueKind::Text),
    ("tvsn", FrameType::Other, ValueKind::UInt),
    ("tves", FrameType::Other, ValueKind::UInt),
    ("desc", FrameType::Description, ValueKind::Text),
    ("ldes", FrameType::Other, ValueKind::Text),
    ("sonm", FrameType::SortName, ValueKind::Text),
    ("soar", FrameType::SortArtist, ValueKind::Text),
    ("soaa", FrameType::SortAlbumArtist, ValueKind::Text),
    ("soal", FrameType::SortAlbum, ValueKind::Text),
    ("soco", FrameType::SortComposer, ValueKind::Text),
    ("sosn", FrameType::Other, ValueKind::Text),
    ("\u{a9}too", FrameType::EncoderSettings, ValueKind::Text),
    ("purd", FrameType::Other, ValueKind::Text),
    ("pcst", FrameType::Other, ValueKind::Bool),
    ("keyw", FrameType::Other, ValueKind::Text),
    ("catg", FrameType::Other, ValueKind::Text),
    ("hdvd", FrameType::Other, ValueKind::UInt),
    ("stik", FrameType::Other, ValueKind::Byte),
    ("rtng", FrameType::Other, ValueKind::Byte),
    ("apID", FrameType::Other, ValueKind::Text),
    ("akID", FrameType::Other, ValueKind::Byte),
    ("sfID", FrameType::Other, ValueKind::UInt),
    ("cnID", FrameType::Other, ValueKind::UInt),
    ("atID", FrameType::Other, ValueKind::UInt),
    ("plID", FrameType::Other, ValueKind::LongLong),
    ("geID", FrameType::Other, ValueKind::UInt),
    ("ownr", FrameType::Other, ValueKind::Text),
    ("purl", FrameType::Other, ValueKind::Text),
    ("egid", FrameType::Other, ValueKind::Text),
    ("cmID", FrameType::Other, ValueKind::UInt),
    ("xid ", FrameType::Other, ValueKind::Text),
    (COVER_ART_NAME, FrameType::Picture, ValueKind::CoverArt),
    ("stem", FrameType::Other, ValueKind::Stem),
    ("\u{a9}wrk", FrameType::Work, ValueKind::Text),
    ("\u{a9}mvn", FrameType::Other, ValueKind::Text),
    ("\u{a9}mvi", FrameType::Other, ValueKind::Int),
    ("\u{a9}mvc", FrameType::Other, ValueKind::Int),
    ("shwm", FrameType::Other, ValueKind::Bool),
    ("ARRANGER", FrameType::Arranger, ValueKind::Text),
    ("AUTHOR", FrameType::Author, ValueKind::Text),
    ("CATALOGNUMBER", FrameType::CatalogNumber, ValueKind::Text),
    ("CONDUCTOR", FrameType::Conductor, ValueKind::Text),
    ("ENCODINGTIME", FrameType::EncodingTime, ValueKind::Text),
    ("INITIALKEY", FrameType::InitialKey, ValueKind::Text),
    ("ISRC", FrameType::Isrc, ValueKind::Text),
    ("LANGUAGE", FrameType::Language, ValueKind::Text),
    ("LYRICIST", FrameType::Lyricist, ValueKind::Text),
    ("MOOD", FrameType::Mood, ValueKind::Text),
    ("SOURCEMEDIA", FrameType::Media, ValueKind::Text),
    ("ORIGINALALBUM", FrameType::OriginalAlbum, ValueKind::Text),
    ("ORIGINALARTIST", FrameType::OriginalArtist, ValueKind::Text),
    ("ORIGINALDATE", FrameType::OriginalDate, ValueKind::Text),
    ("PERFORMER", FrameType::Performer, ValueKind::Text),
    ("PUBLISHER", FrameType::Publisher, ValueKind::Text),
    ("RELEASECOUNTRY", FrameType::ReleaseCountry, ValueKind::Text),
    ("REMIXER", FrameType::Remixer, ValueKind::Text),
    ("SUBTITLE", FrameType::Subtitle, ValueKind::Text),
    ("WEBSITE", FrameType::Website, ValueKind::Text),
    ("WWWAUDIOFILE", FrameType::WwwAudioFile, ValueKind::Text),
    ("WWWAUDIOSOURCE", FrameType::WwwAudioSource, ValueKind::Text),
    ("RELEASEDATE", FrameType::ReleaseDate, ValueKind::Text),
    ("rate", FrameType::Rating, ValueKind::Text),
];

fn starts_with_upper_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Atom name and value kind for writing a frame type.
fn atom_of_type(frame_type: FrameType) -> Option<(&'static str, ValueKind)> {
    if frame_type == FrameType::Other {
        return None;
    }
    ATOMS
        .iter()
        .rev()
        .find(|(_, atom_type, _)| *atom_type == frame_type)
        .map(|(name, _, kind)| (*name, *kind))
}

/// Properties of an atom name without prefix.
struct AtomInfo {
    frame_type: FrameType,
    kind: ValueKind,
    free_form: bool,
}

fn atom_info(name: &str, context: &TagContext<'_>) -> AtomInfo {
    if let Some((_, frame_type, kind)) = ATOMS.iter().find(|(atom, _, _)| *atom == name) {
        let frame_type = if *frame_type == FrameType::Other {
            context.custom_frames.type_of(name)
        } else {
            *frame_type
        };
        return AtomInfo {
            frame_type,
            kind: *kind,
            free_form: starts_with_upper_case(name),
        };
    }
    AtomInfo {
        frame_type: context.custom_frames.type_of(name),
        kind: ValueKind::Text,
        free_form: true,
    }
}

/// Strip the prefix of a free-form atom.
///
/// Names that collide with a fixed atom are marked with a leading `:`.
fn strip_free_form_name(key: &str, context: &TagContext<'_>) -> String {
    if !key.starts_with(FREE_FORM_MARKER) {
        return key.to_owned();
    }
    let name = key
        .rfind(':')
        .map_or_else(|| key.get(5..).unwrap_or_default(), |pos| &key[pos + 1..]);
    if atom_info(name, context).free_form {
        name.to_owned()
    } else {
        format!(":{name}")
    }
}

fn is_fixed_atom_name(name: &str) -> bool {
    let mut chars = name.chars();
    name.chars().count() == 4 && chars.next().is_some_and(|c| c == '\u{a9}' || c.is_ascii_lowercase())
}

/// The key under which a name is stored in the tag.
fn prefix_free_form_name(name: &str, tag: &Mp4Tag, context: &TagContext<'_>) -> String {
    if tag.contains(name) {
        return name.to_owned();
    }
    let needs_prefix = (!name.starts_with(FREE_FORM_MARKER) && !is_fixed_atom_name(name))
        || tag.contains(&format!("{ITUNES_FREE_FORM_PREFIX}{name}"));
    if !needs_prefix || !atom_info(name, context).free_form {
        return name.to_owned();
    }
    let name = name.strip_prefix(':').unwrap_or(name);
    let key = format!("{ITUNES_FREE_FORM_PREFIX}{name}");
    if tag.contains(&key) || name.is_empty() {
        return key;
    }
    // Free-form atoms with another mean, e.g. `----:com.nullsoft.winamp:`
    tag.keys()
        .find(|existing| existing.starts_with(FREE_FORM_MARKER) && existing.ends_with(name))
        .map_or(key, ToOwned::to_owned)
}

/// Atom name without prefix and value kind of a frame.
fn atom_of_frame(frame: &Frame, context: &TagContext<'_>) -> (String, ValueKind) {
    let frame_type = frame.frame_type();
    if frame_type == FrameType::Other {
        let name = frame.internal_name().to_owned();
        let kind = atom_info(&name, context).kind;
        return (name, kind);
    }
    if let Some((name, kind)) = atom_of_type(frame_type) {
        return (name.to_owned(), kind);
    }
    let name = context
        .custom_frames
        .name_of(frame_type)
        .unwrap_or_else(|| frame.internal_name())
        .to_owned();
    (name, ValueKind::Text)
}

fn parse_or_default<T: std::str::FromStr + Default>(value: &str) -> T {
    value.trim().parse().unwrap_or_default()
}

fn value_of_frame(frame: &Frame, kind: ValueKind) -> Option<Mp4Value> {
    let value = frame.value();
    let mp4_value = match kind {
        ValueKind::Text => Mp4Value::Text(split_string_list(value)),
        ValueKind::Bool => Mp4Value::Bool(parse_or_default::<i64>(value) != 0),
        ValueKind::Int => Mp4Value::Int(parse_or_default(value)),
        ValueKind::IntPair => {
            let (number, total) = parse_number_pair(value);
            Mp4Value::IntPair(number, total)
        }
        ValueKind::Byte => Mp4Value::Byte(parse_or_default(value)),
        ValueKind::UInt => Mp4Value::UInt(parse_or_default(value)),
        ValueKind::LongLong => Mp4Value::LongLong(parse_or_default(value)),
        ValueKind::CoverArt => Mp4Value::CoverArt(vec![cover_art_of_frame(frame)]),
        ValueKind::Stem => Mp4Value::Binary(
            frame
                .field_value(FieldId::Data)
                .and_then(|value| value.as_bytes())
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        ),
        ValueKind::ByteArray => {
            return None;
        }
    };
    Some(mp4_value)
}

pub(crate) fn display_value(value: &Mp4Value) -> String {
    match value {
        Mp4Value::Text(values) => join_string_list(values),
        Mp4Value::Bool(value) => if *value { "1" } else { "0" }.to_owned(),
        Mp4Value::Int(value) => value.to_string(),
        Mp4Value::IntPair(number, 0) => number.to_string(),
        Mp4Value::IntPair(number, total) => format!("{number}/{total}"),
        Mp4Value::Byte(value) => value.to_string(),
        Mp4Value::UInt(value) => value.to_string(),
        Mp4Value::LongLong(value) => value.to_string(),
        Mp4Value::CoverArt(_) | Mp4Value::Binary(_) => String::new(),
    }
}

/// Typed value of an atom whose contents are only available as text.
pub(crate) fn atom_value_from_texts(name: &str, texts: Vec<String>) -> Mp4Value {
    let kind = ATOMS
        .iter()
        .find(|(atom_name, _, _)| *atom_name == name)
        .map(|(_, _, kind)| *kind);
    match kind {
        Some(
            kind @ (ValueKind::Bool
            | ValueKind::Int
            | ValueKind::IntPair
            | ValueKind::Byte
            | ValueKind::UInt
            | ValueKind::LongLong),
        ) => {
            let text = texts.first().map(String::as_str).unwrap_or_default();
            let frame = Frame::new(FrameType::Other, text, name, FrameIndex::Unpositioned);
            value_of_frame(&frame, kind).unwrap_or(Mp4Value::Text(texts))
        }
        _ => Mp4Value::Text(texts),
    }
}

fn cover_art_of_frame(frame: &Frame) -> Mp4CoverArt {
    let PictureFields {
        mime_type, data, ..
    } = PictureFields::from_frame(frame);
    Mp4CoverArt {
        format: mp4_image_format_from_mime_type(&mime_type),
        data,
    }
}

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    EXTENSIONS
        .contains(&extension)
        .then_some(ContainerKind::Mp4)
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    (container_kind == ContainerKind::Mp4 && slot == TagSlot::Primary).then_some(NativeTagKind::Mp4)
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    let AudioProperties::Mp4 { codec, bit_depth } = audio_properties else {
        return None;
    };
    let mut summary = TAG_FORMAT.to_owned();
    if !codec.is_empty() {
        summary.push(' ');
        summary.push_str(codec);
    }
    if *bit_depth > 0 {
        summary.push_str(&format!(" {bit_depth} bit"));
    }
    Some(summary)
}

/// Items that are exposed as native frames, i.e. all but cover art.
fn native_keys(tag: &Mp4Tag) -> impl Iterator<Item = &str> {
    tag.keys().filter(|key| *key != COVER_ART_NAME)
}

#[must_use]
pub fn get_all_frames(tag: &Mp4Tag, context: &TagContext<'_>) -> FrameCollection {
    tag.items()
        .filter(|(key, _)| *key != COVER_ART_NAME)
        .enumerate()
        .map(|(index, (key, value))| {
            let name = strip_free_form_name(key, context);
            let AtomInfo { frame_type, .. } = atom_info(&name, context);
            let mut frame = Frame::new(
                frame_type,
                display_value(value),
                name,
                FrameIndex::Native(index),
            );
            if let Mp4Value::Binary(data) = value {
                frame.set_field_list(vec![Field::new(FieldId::Data, data.clone())]);
            }
            frame
        })
        .collect::<Vec<_>>()
        .into()
}

fn store_frame(tag: &mut Mp4Tag, frame: &Frame, context: &TagContext<'_>) -> Mutation {
    let (name, kind) = atom_of_frame(frame, context);
    let Some(value) = value_of_frame(frame, kind) else {
        log::debug!("Unsupported value of MP4 atom {name}");
        return Mutation::Rejected;
    };
    let key = prefix_free_form_name(&name, tag, context);
    if tag.get(&key) == Some(&value) {
        return Mutation::Unchanged;
    }
    tag.insert(key, value);
    Mutation::Modified
}

pub(crate) fn set_frame(
    tag: &mut Mp4Tag,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some(key) = native_keys(tag).nth(index).map(ToOwned::to_owned) else {
        log::debug!("MP4 item index {index} out of range");
        return Mutation::Rejected;
    };
    let name = strip_free_form_name(&key, context);
    let AtomInfo { frame_type, kind, .. } = atom_info(&name, context);
    if frame_type != frame.frame_type()
        || (frame_type == FrameType::Other && name != frame.internal_name())
    {
        return store_frame(tag, frame, context);
    }
    // Keep the existing atom, e.g. `gnre` instead of `©gen`
    let Some(value) = value_of_frame(frame, kind) else {
        log::debug!("Unsupported value of MP4 atom {name}");
        return Mutation::Rejected;
    };
    if tag.get(&key) == Some(&value) {
        return Mutation::Unchanged;
    }
    tag.insert(key, value);
    Mutation::Modified
}

pub(crate) fn set_frame_without_index(
    tag: &mut Mp4Tag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if frame.value().is_empty() {
        let (name, _) = atom_of_frame(frame, context);
        let key = prefix_free_form_name(&name, tag, context);
        return Mutation::from_modified(tag.remove(&key).is_some());
    }
    store_frame(tag, frame, context)
}

pub(crate) fn add_frame(
    tag: &mut Mp4Tag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if frame.frame_type() == FrameType::Picture {
        if frame.field_list().is_empty() {
            PictureFields::default().apply_to(frame);
        }
        frame.set_internal_name(COVER_ART_NAME);
        extra_frames.push(frame);
        return Mutation::Modified;
    }
    let (name, kind) = atom_of_frame(frame, context);
    let Some(value) = value_of_frame(frame, kind) else {
        log::debug!("Unsupported value of MP4 atom {name}");
        return Mutation::Rejected;
    };
    if kind == ValueKind::Stem && frame.field_list().is_empty() {
        frame.set_field_list(vec![Field::new(FieldId::Data, Vec::<u8>::new())]);
    }
    let key = prefix_free_form_name(&name, tag, context);
    tag.insert(key.as_str(), value);
    let index = native_keys(tag)
        .position(|existing| existing == key)
        .map_or(FrameIndex::Unpositioned, FrameIndex::Native);
    frame.set_internal_name(name);
    frame.set_index(index);
    Mutation::Modified
}

pub(crate) fn delete_frame(tag: &mut Mp4Tag, frame: &Frame, context: &TagContext<'_>) -> Mutation {
    let key = prefix_free_form_name(frame.internal_name(), tag, context);
    Mutation::from_modified(tag.remove(&key).is_some())
}

pub(crate) fn delete_frames(tag: &mut Mp4Tag, filter: &FrameFilter, context: &TagContext<'_>) -> bool {
    let len_before = tag.len();
    if filter.are_all_enabled() {
        tag.retain(|key, _| key == COVER_ART_NAME);
    } else {
        tag.retain(|key, _| {
            if key == COVER_ART_NAME {
                return true;
            }
            let name = strip_free_form_name(key, context);
            !filter.is_enabled(atom_info(&name, context).frame_type, &name)
        });
    }
    tag.len() != len_before
}

#[must_use]
pub fn frame_ids() -> Vec<String> {
    let is_listed = |name: &str, kind: ValueKind| {
        kind != ValueKind::ByteArray && !starts_with_upper_case(name)
    };
    let standard_ids = FrameType::STANDARD.into_iter().filter_map(|frame_type| {
        let (name, kind) = atom_of_type(frame_type)?;
        is_listed(name, kind).then(|| frame_type.display_name().to_owned())
    });
    let other_ids = ATOMS
        .iter()
        .filter(|(name, frame_type, kind)| *frame_type == FrameType::Other && is_listed(name, *kind))
        .map(|(name, _, _)| (*name).to_owned());
    standard_ids.chain(other_ids).collect()
}

pub(crate) fn read_extra_frames(tag: &Mp4Tag) -> Vec<Frame> {
    let Some(Mp4Value::CoverArt(cover_arts)) = tag.get(COVER_ART_NAME) else {
        return Vec::new();
    };
    cover_arts
        .iter()
        .enumerate()
        .map(|(index, cover_art)| {
            let mime_type = mime_type_from_mp4_image_format(cover_art.format, &cover_art.data);
            PictureFields {
                image_format: image_format_from_mime_type(mime_type.as_ref()).to_owned(),
                mime_type: mime_type.to_string(),
                data: cover_art.data.clone(),
                ..Default::default()
            }
            .into_frame(COVER_ART_NAME, FrameIndex::Extra(index))
        })
        .collect()
}

pub(crate) fn sync_extra_frames(tag: &mut Mp4Tag, extra_frames: &ExtraFrames) {
    let cover_arts = extra_frames
        .iter()
        .filter(|frame| frame.frame_type() == FrameType::Picture)
        .map(cover_art_of_frame)
        .collect::<Vec<_>>();
    if cover_arts.is_empty() {
        tag.remove(COVER_ART_NAME);
    } else {
        tag.insert(COVER_ART_NAME, Mp4Value::CoverArt(cover_arts));
    }
}

/// Complete a track number without total.
pub(crate) fn add_total_number_of_tracks(tag: &mut Mp4Tag, total: u32) {
    let Ok(total) = i32::try_from(total) else {
        return;
    };
    if let Some(Mp4Value::IntPair(number, 0)) = tag.get(TRACK_NAME) {
        let number = *number;
        tag.insert(TRACK_NAME, Mp4Value::IntPair(number, total));
    }
}
