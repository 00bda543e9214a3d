// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Vorbis comments of Ogg Vorbis, Opus, Speex and FLAC files.
//!
//! FLAC stores pictures in separate metadata blocks that are exposed
//! as extra frames. All other containers embed pictures as base64
//! encoded fields.

use std::{collections::HashMap, sync::LazyLock};

use tagweave_core::{
    frame::{Frame, FrameCollection, FrameFilter, FrameIndex, FrameType},
    picture::PictureFields,
};

use super::{
    ExtraFrames, KeyCharset, Mutation, TagContext, TagSlot, custom_or_other_type,
    default_frame_ids, fix_up_key, non_empty_value,
};
use crate::{
    config::PictureName,
    native::{AudioProperties, ContainerKind, NativePicture, NativeTagKind, XiphComment},
    util::picture::{
        decode_base64, decode_base64_picture_block, encode_base64, encode_base64_picture_block,
        guess_mime_type, image_format_from_mime_type,
    },
};

pub const EXTENSIONS: &[&str] = &["OGG", "OGA", "FLAC", "SPX", "OPUS"];

pub const TAG_FORMAT: &str = "Vorbis";

const COVER_ART_MIME_NAME: &str = "COVERARTMIME";

const TRACK_TOTAL_NAME: &str = "TRACKTOTAL";

/// Field names of all standard frame types.
///
/// The names are also used by APE tags and as unified property names.
const VORBIS_NAMES: [(FrameType, &str); 49] = [
    (FrameType::Title, "TITLE"),
    (FrameType::Artist, "ARTIST"),
    (FrameType::Album, "ALBUM"),
    (FrameType::Comment, "COMMENT"),
    (FrameType::Date, "DATE"),
    (FrameType::Track, "TRACKNUMBER"),
    (FrameType::Genre, "GENRE"),
    (FrameType::AlbumArtist, "ALBUMARTIST"),
    (FrameType::Arranger, "ARRANGER"),
    (FrameType::Author, "AUTHOR"),
    (FrameType::Bpm, "BPM"),
    (FrameType::CatalogNumber, "CATALOGNUMBER"),
    (FrameType::Compilation, "COMPILATION"),
    (FrameType::Composer, "COMPOSER"),
    (FrameType::Conductor, "CONDUCTOR"),
    (FrameType::Copyright, "COPYRIGHT"),
    (FrameType::Disc, "DISCNUMBER"),
    (FrameType::EncodedBy, "ENCODED-BY"),
    (FrameType::EncoderSettings, "ENCODERSETTINGS"),
    (FrameType::EncodingTime, "ENCODINGTIME"),
    (FrameType::Grouping, "GROUPING"),
    (FrameType::InitialKey, "INITIALKEY"),
    (FrameType::Isrc, "ISRC"),
    (FrameType::Language, "LANGUAGE"),
    (FrameType::Lyricist, "LYRICIST"),
    (FrameType::Lyrics, "LYRICS"),
    (FrameType::Media, "SOURCEMEDIA"),
    (FrameType::Mood, "MOOD"),
    (FrameType::OriginalAlbum, "ORIGINALALBUM"),
    (FrameType::OriginalArtist, "ORIGINALARTIST"),
    (FrameType::OriginalDate, "ORIGINALDATE"),
    (FrameType::Description, "DESCRIPTION"),
    (FrameType::Performer, "PERFORMER"),
    (FrameType::Picture, "METADATA_BLOCK_PICTURE"),
    (FrameType::Publisher, "PUBLISHER"),
    (FrameType::ReleaseCountry, "RELEASECOUNTRY"),
    (FrameType::Remixer, "REMIXER"),
    (FrameType::SortAlbum, "ALBUMSORT"),
    (FrameType::SortAlbumArtist, "ALBUMARTISTSORT"),
    (FrameType::SortArtist, "ARTISTSORT"),
    (FrameType::SortComposer, "COMPOSERSORT"),
    (FrameType::SortName, "TITLESORT"),
    (FrameType::Subtitle, "SUBTITLE"),
    (FrameType::Website, "WEBSITE"),
    (FrameType::WwwAudioFile, "WWWAUDIOFILE"),
    (FrameType::WwwAudioSource, "WWWAUDIOSOURCE"),
    (FrameType::ReleaseDate, "RELEASEDATE"),
    (FrameType::Rating, "RATING"),
    (FrameType::Work, "WORK"),
];

static TYPES_BY_VORBIS_NAME: LazyLock<HashMap<&'static str, FrameType>> = LazyLock::new(|| {
    VORBIS_NAMES
        .iter()
        .map(|(frame_type, name)| (*name, *frame_type))
        .chain([(PictureName::CoverArt.as_str(), FrameType::Picture)])
        .collect()
});

/// Vorbis field name of a standard frame type.
#[must_use]
pub(crate) fn vorbis_name_of_type(frame_type: FrameType) -> Option<&'static str> {
    VORBIS_NAMES
        .iter()
        .find(|(vorbis_type, _)| *vorbis_type == frame_type)
        .map(|(_, name)| *name)
}

/// Frame type of a Vorbis field name, ignoring case and `=`.
#[must_use]
pub(crate) fn vorbis_table_type(name: &str) -> Option<FrameType> {
    let key = name
        .chars()
        .filter(|c| *c != '=')
        .flat_map(char::to_uppercase)
        .collect::<String>();
    TYPES_BY_VORBIS_NAME.get(key.as_str()).copied()
}

fn type_from_vorbis_name(name: &str, context: &TagContext<'_>) -> FrameType {
    vorbis_table_type(name).unwrap_or_else(|| custom_or_other_type(name, context))
}

fn is_picture_field_name(name: &str) -> bool {
    name == PictureName::MetadataBlockPicture.as_str() || name == PictureName::CoverArt.as_str()
}

/// Field name under which a frame is stored.
fn vorbis_key(frame: &Frame, context: &TagContext<'_>) -> String {
    match frame.frame_type() {
        FrameType::Comment => context.config.comment_name.clone(),
        FrameType::Picture => {
            if is_picture_field_name(frame.internal_name()) {
                frame.internal_name().to_owned()
            } else {
                context.config.picture_name.as_str().to_owned()
            }
        }
        frame_type @ FrameType::Custom(_) => context
            .custom_frames
            .name_of(frame_type)
            .map_or_else(|| fix_up_key(frame.name(), KeyCharset::Vorbis), ToOwned::to_owned)
            .to_uppercase(),
        frame_type => vorbis_name_of_type(frame_type).map_or_else(
            || fix_up_key(frame.name(), KeyCharset::Vorbis).to_uppercase(),
            ToOwned::to_owned,
        ),
    }
}

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    match extension {
        "OGG" | "OGA" => Some(ContainerKind::OggVorbis),
        "FLAC" => Some(ContainerKind::Flac),
        "SPX" => Some(ContainerKind::Speex),
        "OPUS" => Some(ContainerKind::Opus),
        _ => None,
    }
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    match (container_kind, slot) {
        (ContainerKind::Flac, TagSlot::Legacy) => Some(NativeTagKind::Id3v1),
        (
            ContainerKind::Flac | ContainerKind::OggVorbis | ContainerKind::Opus | ContainerKind::Speex,
            TagSlot::Primary,
        ) => Some(NativeTagKind::Xiph),
        (ContainerKind::Flac, TagSlot::Secondary) => Some(NativeTagKind::Id3v2),
        _ => None,
    }
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    let summary = match audio_properties {
        AudioProperties::OggVorbis => "Ogg Vorbis".to_owned(),
        AudioProperties::Flac { bit_depth } => {
            if *bit_depth > 0 {
                format!("FLAC {bit_depth} bit")
            } else {
                "FLAC".to_owned()
            }
        }
        AudioProperties::Opus { version } => format!("Opus {version}"),
        AudioProperties::Speex { version } => format!("Speex {version}"),
        _ => {
            return None;
        }
    };
    Some(summary)
}

/// Decode a picture that is embedded into a text field.
fn decode_picture_field(tag: &XiphComment, name: &str, value: &str) -> PictureFields {
    if name == PictureName::CoverArt.as_str() {
        let data = decode_base64(value).unwrap_or_else(|err| {
            log::debug!("Failed to decode {name}: {err}");
            Vec::new()
        });
        let mime_type = tag
            .get(COVER_ART_MIME_NAME)
            .and_then(<[String]>::first)
            .cloned()
            .or_else(|| guess_mime_type(&data).map(|mime| mime.to_string()))
            .unwrap_or_else(|| PictureFields::default().mime_type);
        return PictureFields {
            image_format: image_format_from_mime_type(&mime_type).to_owned(),
            mime_type,
            data,
            ..Default::default()
        };
    }
    decode_base64_picture_block(value).map_or_else(
        |err| {
            log::debug!("Failed to decode {name}: {err}");
            PictureFields::default()
        },
        |picture| picture.to_fields(),
    )
}

/// Encode a picture for storing it in a text field.
fn encode_picture_field(name: &str, fields: &PictureFields) -> Option<String> {
    if name == PictureName::CoverArt.as_str() {
        return Some(encode_base64(&fields.data));
    }
    encode_base64_picture_block(&NativePicture::from_fields(fields))
        .map_err(|err| {
            log::warn!("Failed to encode picture: {err}");
        })
        .ok()
}

/// Picture fields of a frame with the description taken from an
/// edited value.
fn picture_fields_of_frame(frame: &Frame) -> PictureFields {
    let mut fields = PictureFields::from_frame(frame);
    if frame.is_value_changed() {
        frame.value().clone_into(&mut fields.description);
    }
    fields
}

/// The text to be stored for a frame.
fn field_value_of_frame(tag: &mut XiphComment, key: &str, frame: &Frame) -> Option<String> {
    if frame.frame_type() != FrameType::Picture {
        return Some(frame.value().to_owned());
    }
    let fields = picture_fields_of_frame(frame);
    let value = encode_picture_field(key, &fields)?;
    if key == PictureName::CoverArt.as_str() {
        tag.add_field(COVER_ART_MIME_NAME, fields.mime_type, true);
    }
    Some(value)
}

#[must_use]
pub fn get_all_frames(tag: &XiphComment, context: &TagContext<'_>) -> FrameCollection {
    tag.field_values()
        .enumerate()
        .map(|(index, (name, value))| {
            let frame_type = type_from_vorbis_name(name, context);
            let index = FrameIndex::Native(index);
            if frame_type == FrameType::Picture {
                decode_picture_field(tag, name, value).into_frame(name, index)
            } else {
                Frame::new(frame_type, value, name, index)
            }
        })
        .collect::<Vec<_>>()
        .into()
}

/// Field name and position within the values of that field.
fn locate_field_value(tag: &XiphComment, index: usize) -> Option<(String, usize)> {
    let mut position = 0;
    for (name, values) in tag.fields() {
        if index < position + values.len() {
            return Some((name.to_owned(), index - position));
        }
        position += values.len();
    }
    None
}

fn is_same_value(tag: &XiphComment, key: &str, stored: &str, frame: &Frame) -> bool {
    if frame.frame_type() == FrameType::Picture {
        return decode_picture_field(tag, key, stored)
            .eq_ignoring_image_properties(&picture_fields_of_frame(frame));
    }
    stored == frame.value()
}

pub(crate) fn set_frame(
    tag: &mut XiphComment,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some((name, nth)) = locate_field_value(tag, index) else {
        log::debug!("Vorbis field index {index} out of range");
        return Mutation::Rejected;
    };
    let mut key = vorbis_key(frame, context);
    // Aliases and a field that is not the configured comment name stay in place
    if !name.eq_ignore_ascii_case(&key)
        && frame.frame_type() != FrameType::Other
        && type_from_vorbis_name(&name, context) == frame.frame_type()
    {
        key.clone_from(&name);
    }
    if name.eq_ignore_ascii_case(&key) {
        let mut values = tag.get(&key).map(<[String]>::to_vec).unwrap_or_default();
        if is_same_value(tag, &key, &values[nth], frame) {
            return Mutation::Unchanged;
        }
        let Some(value) = field_value_of_frame(tag, &key, frame) else {
            return Mutation::Rejected;
        };
        // Replace the value in place to preserve the order
        values[nth] = value;
        tag.set_field_values(&key, values);
        return Mutation::Modified;
    }
    let Some(value) = field_value_of_frame(tag, &key, frame) else {
        return Mutation::Rejected;
    };
    // Only the located value moves to the new field
    let mut values = tag.get(&name).map(<[String]>::to_vec).unwrap_or_default();
    values.remove(nth);
    tag.set_field_values(&name, values);
    tag.add_field(&key, value, false);
    Mutation::Modified
}

pub(crate) fn set_frame_without_index(
    tag: &mut XiphComment,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let key = vorbis_key(frame, context);
    if frame.value().is_empty() {
        return Mutation::from_modified(tag.remove_fields(&key).is_some());
    }
    if tag.get(&key) == Some(&[frame.value().to_owned()][..]) {
        return Mutation::Unchanged;
    }
    tag.add_field(&key, frame.value(), true);
    Mutation::Modified
}

pub(crate) fn add_frame(
    tag: &mut XiphComment,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if frame.frame_type() == FrameType::Picture {
        if frame.field_list().is_empty() {
            PictureFields::default().apply_to(frame);
        }
        if tag.has_picture_blocks() {
            frame.set_internal_name(PictureName::MetadataBlockPicture.as_str());
            extra_frames.push(frame);
            return Mutation::Modified;
        }
    }
    let key = vorbis_key(frame, context);
    let Some(value) = field_value_of_frame(tag, &key, frame) else {
        return Mutation::Rejected;
    };
    tag.add_field(&key, non_empty_value(&value), false);
    let index = tag.position(&key).map_or(FrameIndex::Unpositioned, |position| {
        let count = tag.get(&key).map_or(1, <[String]>::len);
        FrameIndex::Native(position + count - 1)
    });
    frame.set_internal_name(key);
    frame.set_index(index);
    Mutation::Modified
}

pub(crate) fn delete_frame(
    tag: &mut XiphComment,
    frame: &Frame,
    _context: &TagContext<'_>,
) -> Mutation {
    let name = frame.internal_name();
    if let Some(index) = frame.index().native()
        && let Some((located_name, nth)) = locate_field_value(tag, index)
        && located_name.eq_ignore_ascii_case(name)
    {
        let mut values = tag.get(name).map(<[String]>::to_vec).unwrap_or_default();
        values.remove(nth);
        tag.set_field_values(name, values);
        return Mutation::Modified;
    }
    let value = if frame.frame_type() == FrameType::Picture {
        let Some(value) = encode_picture_field(name, &picture_fields_of_frame(frame)) else {
            return Mutation::Rejected;
        };
        value
    } else {
        frame.value().to_owned()
    };
    Mutation::from_modified(tag.remove_field_value(name, &value))
}

pub(crate) fn delete_frames(
    tag: &mut XiphComment,
    filter: &FrameFilter,
    context: &TagContext<'_>,
) -> bool {
    let count_before = tag.field_count();
    if filter.are_all_enabled() {
        tag.remove_all_fields();
    } else {
        tag.retain_fields(|name| !filter.is_enabled(type_from_vorbis_name(name, context), name));
    }
    tag.field_count() != count_before
}

#[must_use]
pub fn frame_ids(context: &TagContext<'_>) -> Vec<String> {
    let mut frame_ids = default_frame_ids(true);
    frame_ids.push(context.config.picture_name.as_str().to_owned());
    frame_ids
}

pub(crate) fn read_extra_frames(tag: &XiphComment) -> Vec<Frame> {
    tag.pictures()
        .iter()
        .enumerate()
        .map(|(index, picture)| {
            picture
                .to_fields()
                .into_frame(PictureName::MetadataBlockPicture.as_str(), FrameIndex::Extra(index))
        })
        .collect()
}

pub(crate) fn sync_extra_frames(tag: &mut XiphComment, extra_frames: &ExtraFrames) {
    let pictures = extra_frames
        .iter()
        .filter(|frame| frame.frame_type() == FrameType::Picture)
        .map(|frame| NativePicture::from_fields(&PictureFields::from_frame(frame)))
        .collect();
    tag.set_pictures(pictures);
}

/// Add `TRACKTOTAL` to a tag with a track number.
pub(crate) fn add_total_number_of_tracks(tag: &mut XiphComment, total: u32) {
    if tag.contains(vorbis_name_of_type(FrameType::Track).unwrap_or_default()) {
        tag.add_field(TRACK_TOTAL_NAME, total.to_string(), true);
    }
}

#[cfg(test)]
mod tests;
