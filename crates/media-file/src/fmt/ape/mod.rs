// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! APE tags of Monkey's Audio, Musepack and WavPack files.
//!
//! Pictures are stored as binary `COVER ART (<TYPE>)` items. Their
//! payload is the description, a null byte and the image data. These
//! items are exposed as extra frames and do not count for native
//! indices.

use tagweave_core::{
    frame::{Frame, FrameCollection, FrameFilter, FrameIndex, FrameType},
    picture::{PictureFields, PictureType},
    util::string::{join_string_list, split_string_list},
};

use super::{
    ExtraFrames, KeyCharset, Mutation, TagContext, TagSlot, custom_or_other_type,
    default_frame_ids, fix_up_key, non_empty_value,
    vorbis::{vorbis_name_of_type, vorbis_table_type},
};
use crate::{
    native::{ApeItem, ApeTag, ApeValue, AudioProperties, ContainerKind, NativeTagKind},
    util::picture::{guess_mime_type, image_format_from_mime_type},
};

pub const EXTENSIONS: &[&str] = &["APE", "MPC", "WV"];

pub const TAG_FORMAT: &str = "APE";

const COVER_ART_PREFIX: &str = "COVER ART";

const YEAR_KEY: &str = "YEAR";

const TRACK_KEY: &str = "TRACK";

/// Image data of PNG and JPEG files never starts with a description.
const IMAGE_MAGIC_BYTES: [u8; 2] = [0xFF, 0x89];

pub(crate) fn is_picture_item(item: &ApeItem) -> bool {
    matches!(item.value, ApeValue::Binary(_)) && item.key.to_uppercase().starts_with(COVER_ART_PREFIX)
}

pub(crate) fn picture_key(picture_type: PictureType) -> String {
    format!(
        "{COVER_ART_PREFIX} ({})",
        picture_type.as_key_str().to_uppercase()
    )
}

pub(crate) fn picture_type_from_key(key: &str) -> PictureType {
    key.split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map_or(PictureType::CoverFront, |(key_str, _)| {
            PictureType::from_key_str(key_str.trim())
        })
}

fn type_from_ape_key(key: &str, context: &TagContext<'_>) -> FrameType {
    if let Some(frame_type) = vorbis_table_type(key) {
        return frame_type;
    }
    let upper_key = key.to_uppercase();
    match upper_key.as_str() {
        YEAR_KEY => FrameType::Date,
        TRACK_KEY => FrameType::Track,
        "ENCODED BY" => FrameType::EncodedBy,
        _ if upper_key.starts_with(COVER_ART_PREFIX) => FrameType::Picture,
        _ => custom_or_other_type(key, context),
    }
}

fn ape_key(frame: &Frame, context: &TagContext<'_>) -> String {
    match frame.frame_type() {
        FrameType::Date => YEAR_KEY.to_owned(),
        FrameType::Track => TRACK_KEY.to_owned(),
        FrameType::Picture => picture_key(PictureFields::from_frame(frame).picture_type),
        frame_type @ FrameType::Custom(_) => context.custom_frames.name_of(frame_type).map_or_else(
            || fix_up_key(frame.name(), KeyCharset::Ape).to_uppercase(),
            str::to_uppercase,
        ),
        frame_type => vorbis_name_of_type(frame_type).map_or_else(
            || fix_up_key(frame.name(), KeyCharset::Ape).to_uppercase(),
            ToOwned::to_owned,
        ),
    }
}

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    match extension {
        "APE" => Some(ContainerKind::Ape),
        "MPC" => Some(ContainerKind::Mpc),
        "WV" => Some(ContainerKind::WavPack),
        _ => None,
    }
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    if !matches!(
        container_kind,
        ContainerKind::Ape | ContainerKind::Mpc | ContainerKind::WavPack
    ) {
        return None;
    }
    match slot {
        TagSlot::Legacy => Some(NativeTagKind::Id3v1),
        TagSlot::Primary => Some(NativeTagKind::Ape),
        TagSlot::Secondary => None,
    }
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    let summary = match audio_properties {
        AudioProperties::Ape { version, bit_depth } => format!(
            "APE {major}.{minor:03} {bit_depth} bit",
            major = version / 1000,
            minor = version % 1000
        ),
        AudioProperties::Mpc => "MPC".to_owned(),
        AudioProperties::WavPack { version, bit_depth } => {
            format!("WavPack {version:x} {bit_depth} bit")
        }
        _ => {
            return None;
        }
    };
    Some(summary)
}

fn native_items(tag: &ApeTag) -> impl Iterator<Item = &ApeItem> {
    tag.items().filter(|item| !is_picture_item(item))
}

fn item_display_value(item: &ApeItem) -> String {
    match &item.value {
        ApeValue::Text(values) => join_string_list(values),
        ApeValue::Locator(locator) => locator.clone(),
        ApeValue::Binary(_) => String::new(),
    }
}

#[must_use]
pub fn get_all_frames(tag: &ApeTag, context: &TagContext<'_>) -> FrameCollection {
    native_items(tag)
        .enumerate()
        .map(|(index, item)| {
            Frame::new(
                type_from_ape_key(&item.key, context),
                item_display_value(item),
                item.key.as_str(),
                FrameIndex::Native(index),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

fn text_item(key: &str, value: &str) -> ApeItem {
    ApeItem::text(key, split_string_list(non_empty_value(value)))
}

fn native_position(tag: &ApeTag, key: &str) -> Option<usize> {
    native_items(tag).position(|item| item.key.eq_ignore_ascii_case(key))
}

pub(crate) fn set_frame(
    tag: &mut ApeTag,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some(existing) = native_items(tag).nth(index) else {
        log::debug!("APE item index {index} out of range");
        return Mutation::Rejected;
    };
    let mut key = ape_key(frame, context);
    // Aliases like `DATE` for `YEAR` keep their key
    let same_item = existing.key.eq_ignore_ascii_case(&key)
        || (frame.frame_type() != FrameType::Other
            && type_from_ape_key(&existing.key, context) == frame.frame_type());
    if same_item {
        if item_display_value(existing) == frame.value() {
            return Mutation::Unchanged;
        }
        key.clone_from(&existing.key);
    } else {
        let existing_key = existing.key.clone();
        tag.remove(&existing_key);
    }
    tag.insert(text_item(&key, frame.value()));
    Mutation::Modified
}

pub(crate) fn set_frame_without_index(
    tag: &mut ApeTag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let key = ape_key(frame, context);
    if frame.value().is_empty() {
        return Mutation::from_modified(tag.remove(&key).is_some());
    }
    if tag
        .item(&key)
        .is_some_and(|item| item_display_value(item) == frame.value())
    {
        return Mutation::Unchanged;
    }
    tag.insert(text_item(&key, frame.value()));
    Mutation::Modified
}

/// The first picture type from front cover to publisher logo that is
/// not used by any other picture.
fn unused_picture_type(extra_frames: &ExtraFrames) -> PictureType {
    let used_types = extra_frames
        .iter()
        .filter(|frame| frame.frame_type() == FrameType::Picture)
        .map(|frame| PictureFields::from_frame(frame).picture_type)
        .collect::<Vec<_>>();
    (PictureType::CoverFront.code()..=PictureType::PublisherLogo.code())
        .filter_map(PictureType::from_repr)
        .find(|picture_type| !used_types.contains(picture_type))
        .unwrap_or(PictureType::CoverFront)
}

pub(crate) fn add_frame(
    tag: &mut ApeTag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if frame.frame_type() == FrameType::Picture {
        if frame.field_list().is_empty() {
            PictureFields {
                picture_type: unused_picture_type(extra_frames),
                ..Default::default()
            }
            .apply_to(frame);
        }
        frame.set_internal_name(ape_key(frame, context));
        extra_frames.push(frame);
        return Mutation::Modified;
    }
    let key = ape_key(frame, context);
    tag.insert(text_item(&key, frame.value()));
    let index = native_position(tag, &key).map_or(FrameIndex::Unpositioned, FrameIndex::Native);
    frame.set_internal_name(key);
    frame.set_index(index);
    Mutation::Modified
}

pub(crate) fn delete_frame(tag: &mut ApeTag, frame: &Frame, _context: &TagContext<'_>) -> Mutation {
    let name = frame.internal_name();
    let key = frame
        .index()
        .native()
        .and_then(|index| native_items(tag).nth(index))
        .filter(|item| item.key.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_owned(), |item| item.key.clone());
    Mutation::from_modified(tag.remove(&key).is_some())
}

pub(crate) fn delete_frames(tag: &mut ApeTag, filter: &FrameFilter, context: &TagContext<'_>) -> bool {
    let len_before = tag.len();
    if filter.are_all_enabled() {
        tag.retain(is_picture_item);
    } else {
        tag.retain(|item| {
            is_picture_item(item)
                || !filter.is_enabled(type_from_ape_key(&item.key, context), &item.key)
        });
    }
    tag.len() != len_before
}

#[must_use]
pub fn frame_ids() -> Vec<String> {
    default_frame_ids(true)
}

/// Split the payload of a picture item into description and image.
pub(crate) fn parse_picture_payload(payload: &[u8]) -> (String, &[u8]) {
    if payload
        .first()
        .is_none_or(|first| IMAGE_MAGIC_BYTES.contains(first))
    {
        return (String::new(), payload);
    }
    match payload.iter().position(|byte| *byte == 0) {
        Some(pos) => (
            String::from_utf8_lossy(&payload[..pos]).into_owned(),
            &payload[pos + 1..],
        ),
        None => (String::new(), payload),
    }
}

pub(crate) fn picture_payload(fields: &PictureFields) -> Vec<u8> {
    let mut payload = Vec::with_capacity(fields.description.len() + 1 + fields.data.len());
    payload.extend_from_slice(fields.description.as_bytes());
    payload.push(0);
    payload.extend_from_slice(&fields.data);
    payload
}

pub(crate) fn read_extra_frames(tag: &ApeTag) -> Vec<Frame> {
    tag.items()
        .filter(|item| is_picture_item(item))
        .enumerate()
        .filter_map(|(index, item)| {
            let ApeValue::Binary(payload) = &item.value else {
                return None;
            };
            let (description, data) = parse_picture_payload(payload);
            let mime_type = guess_mime_type(data)
                .map_or_else(|| PictureFields::default().mime_type, |mime| mime.to_string());
            let fields = PictureFields {
                image_format: image_format_from_mime_type(&mime_type).to_owned(),
                mime_type,
                picture_type: picture_type_from_key(&item.key),
                description,
                data: data.to_vec(),
                ..Default::default()
            };
            Some(fields.into_frame(item.key.as_str(), FrameIndex::Extra(index)))
        })
        .collect()
}

pub(crate) fn sync_extra_frames(tag: &mut ApeTag, extra_frames: &ExtraFrames) {
    tag.retain(|item| !is_picture_item(item));
    for frame in extra_frames
        .iter()
        .filter(|frame| frame.frame_type() == FrameType::Picture)
    {
        let fields = PictureFields::from_frame(frame);
        let key = picture_key(fields.picture_type);
        if tag.contains(&key) {
            log::debug!("Replacing picture with duplicate key {key}");
        }
        tag.insert(ApeItem::binary(key, picture_payload(&fields)));
    }
}

#[cfg(test)]
mod tests;
