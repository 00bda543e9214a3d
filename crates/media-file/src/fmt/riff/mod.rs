// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! WAV and AIFF files with their RIFF INFO chunk.

use tagweave_core::frame::{Frame, FrameCollection, FrameFilter, FrameIndex, FrameType};

use super::{Mutation, TagContext, TagSlot, custom_or_other_type, non_empty_value, standard_frame_ids};
use crate::{
    config::riff_track_names,
    native::{AudioProperties, ContainerKind, InfoTag, NativeTagKind},
};

pub const EXTENSIONS: &[&str] = &["WAV", "AIF", "AIFF"];

pub const TAG_FORMAT: &str = "RIFF INFO";

/// Fallback for frames without a usable INFO id.
const DEFAULT_INFO_ID: &str = "IKEY";

const INFO_IDS: &[(FrameType, &str)] = &[
    (FrameType::Title, "INAM"),
    (FrameType::Artist, "IART"),
    (FrameType::Album, "IPRD"),
    (FrameType::Comment, "ICMT"),
    (FrameType::Date, "ICRD"),
    (FrameType::Genre, "IGNR"),
    (FrameType::Arranger, "IENG"),
    (FrameType::Bpm, "IBPM"),
    (FrameType::Composer, "IMUS"),
    (FrameType::Copyright, "ICOP"),
    (FrameType::EncodedBy, "ITCH"),
    (FrameType::EncoderSettings, "ISFT"),
    (FrameType::EncodingTime, "IDIT"),
    (FrameType::Isrc, "ISRC"),
    (FrameType::Language, "ILNG"),
    (FrameType::Lyricist, "IWRI"),
    (FrameType::Media, "IMED"),
    (FrameType::Performer, "ISTR"),
    (FrameType::Publisher, "IPUB"),
    (FrameType::ReleaseCountry, "ICNT"),
    (FrameType::Remixer, "IEDT"),
    (FrameType::Subtitle, "PRT1"),
    (FrameType::Website, "IBSU"),
    (FrameType::Rating, "IRTD"),
];

/// Well-known INFO ids without a frame type.
const EXTRA_FRAME_IDS: &[&str] = &[
    "IARL", // Archival Location
    "ICMS", // Commissioned
    "ICRP", // Cropped
    "IDIM", // Dimensions
    "IDPI", // Dots Per Inch
    "IKEY", // Keywords
    "ILGT", // Lightness
    "IPLT", // Palette Setting
    "ISBJ", // Subject
    "ISHP", // Sharpness
    "ISRF", // Source Form
];

/// Format codes of the `fmt ` chunk, see RFC 2361, Appendix A.
const WAVE_FORMAT_NAMES: &[(u16, &str)] = &[
    (0x0001, "PCM"),
    (0x0002, "ADPCM"),
    (0x0003, "IEEE Float"),
    (0x0004, "VSELP"),
    (0x0005, "IBM CVSD"),
    (0x0006, "ALAW"),
    (0x0007, "MULAW"),
    (0x0010, "OKI ADPCM"),
    (0x0011, "DVI ADPCM"),
    (0x0012, "MediaSpace ADPCM"),
    (0x0013, "Sierra ADPCM"),
    (0x0014, "G.723 ADPCM"),
    (0x0015, "DIGISTD"),
    (0x0016, "DIGIFIX"),
    (0x0017, "OKI ADPCM"),
    (0x0018, "MediaVision ADPCM"),
    (0x0019, "CU"),
    (0x0020, "Yamaha ADPCM"),
    (0x0021, "Sonarc"),
    (0x0022, "True Speech"),
    (0x0023, "EchoSC1"),
    (0x0024, "AF36"),
    (0x0025, "APTX"),
    (0x0026, "AF10"),
    (0x0027, "Prosody 1612"),
    (0x0028, "LRC"),
    (0x0030, "Dolby AC2"),
    (0x0031, "GSM610"),
    (0x0032, "MSNAudio"),
    (0x0033, "Antex ADPCME"),
    (0x0034, "Control Res VQLPC"),
    (0x0035, "Digireal"),
    (0x0036, "DigiADPCM"),
    (0x0037, "Control Res CR10"),
    (0x0038, "NMS VBXADPCM"),
    (0x0039, "Roland RDAC"),
    (0x003a, "EchoSC3"),
    (0x003b, "Rockwell ADPCM"),
    (0x003c, "Rockwell DIGITALK"),
    (0x003d, "Xebec"),
    (0x0040, "G.721 ADPCM"),
    (0x0041, "G.728 CELP"),
    (0x0042, "MSG723"),
    (0x0050, "MPEG"),
    (0x0052, "RT24"),
    (0x0053, "PAC"),
    (0x0055, "MPEG Layer 3"),
    (0x0059, "Lucent G.723"),
    (0x0060, "Cirrus"),
    (0x0061, "ESPCM"),
    (0x0062, "Voxware"),
    (0x0063, "Canopus Atrac"),
    (0x0064, "G.726 ADPCM"),
    (0x0065, "G.722 ADPCM"),
    (0x0066, "DSAT"),
    (0x0067, "DSAT Display"),
    (0x0069, "Voxware Byte Aligned"),
    (0x0070, "Voxware AC8"),
    (0x0071, "Voxware AC10"),
    (0x0072, "Voxware AC16"),
    (0x0073, "Voxware AC20"),
    (0x0074, "Voxware MetaVoice"),
    (0x0075, "Voxware MetaSound"),
    (0x0076, "Voxware RT29HW"),
    (0x0077, "Voxware VR12"),
    (0x0078, "Voxware VR18"),
    (0x0079, "Voxware TQ40"),
    (0x0080, "Softsound"),
    (0x0081, "Voxware TQ60"),
    (0x0082, "MSRT24"),
    (0x0083, "G.729A"),
    (0x0084, "MVI MV12"),
    (0x0085, "DF G.726"),
    (0x0086, "DF GSM610"),
    (0x0088, "ISIAudio"),
    (0x0089, "Onlive"),
    (0x0091, "SBC24"),
    (0x0092, "Dolby AC3 SPDIF"),
    (0x0097, "ZyXEL ADPCM"),
    (0x0098, "Philips LPCBB"),
    (0x0099, "Packed"),
    (0x0100, "Rhetorex ADPCM"),
    (0x0101, "IRAT"),
    (0x0111, "Vivo G.723"),
    (0x0112, "Vivo Siren"),
    (0x0123, "Digital G.723"),
    (0x0200, "Creative ADPCM"),
    (0x0202, "Creative FastSpeech8"),
    (0x0203, "Creative FastSpeech10"),
    (0x0220, "Quarterdeck"),
    (0x0300, "FM Towns Snd"),
    (0x0400, "BTV Digital"),
    (0x0680, "VME VMPCM"),
    (0x1000, "OLIGSM"),
    (0x1001, "OLIADPCM"),
    (0x1002, "OLICELP"),
    (0x1003, "OLISBC"),
    (0x1004, "OLIOPR"),
    (0x1100, "LH Codec"),
    (0x1400, "Norris"),
    (0x1401, "ISIAudio"),
    (0x1500, "Soundspace Music Compression"),
    (0x2000, "DVM"),
];

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    match extension {
        "WAV" => Some(ContainerKind::Wav),
        "AIF" | "AIFF" => Some(ContainerKind::Aiff),
        _ => None,
    }
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    match (container_kind, slot) {
        (ContainerKind::Wav | ContainerKind::Aiff, TagSlot::Primary) => Some(NativeTagKind::Id3v2),
        (ContainerKind::Wav, TagSlot::Secondary) => Some(NativeTagKind::RiffInfo),
        _ => None,
    }
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    let (mut summary, bit_depth) = match audio_properties {
        AudioProperties::Wav { format, bit_depth } => {
            let mut summary = "WAV".to_owned();
            if let Some((_, name)) = WAVE_FORMAT_NAMES.iter().find(|(code, _)| code == format) {
                summary.push(' ');
                summary.push_str(name);
            }
            (summary, *bit_depth)
        }
        AudioProperties::Aiff { bit_depth } => ("AIFF".to_owned(), *bit_depth),
        _ => {
            return None;
        }
    };
    if bit_depth > 0 {
        summary.push_str(&format!(" {bit_depth} bit"));
    }
    Some(summary)
}

fn info_id_from_type(frame_type: FrameType, context: &TagContext<'_>) -> Option<String> {
    match frame_type {
        FrameType::Track => Some(context.config.riff_track_name.clone()),
        FrameType::Custom(_) => context.custom_frames.name_of(frame_type).map(ToOwned::to_owned),
        _ => INFO_IDS
            .iter()
            .find(|(info_type, _)| *info_type == frame_type)
            .map(|(_, id)| (*id).to_owned()),
    }
}

/// INFO id under which a frame is stored.
fn info_id(frame: &Frame, context: &TagContext<'_>) -> String {
    // Keep a recognized track id instead of switching to the configured one
    if frame.frame_type() == FrameType::Track
        && riff_track_names().contains(&frame.internal_name())
    {
        return frame.internal_name().to_owned();
    }
    if let Some(id) = info_id_from_type(frame.frame_type(), context) {
        return id;
    }
    let name = frame.internal_name();
    if name.chars().count() >= 4 {
        return name.chars().take(4).flat_map(char::to_uppercase).collect();
    }
    DEFAULT_INFO_ID.to_owned()
}

fn type_from_info_id(id: &str, context: &TagContext<'_>) -> FrameType {
    if let Some((frame_type, _)) = INFO_IDS.iter().find(|(_, info_id)| *info_id == id) {
        return *frame_type;
    }
    if context.config.is_riff_track_name(id) {
        return FrameType::Track;
    }
    custom_or_other_type(id, context)
}

#[must_use]
pub fn get_all_frames(tag: &InfoTag, context: &TagContext<'_>) -> FrameCollection {
    tag.fields()
        .enumerate()
        .map(|(index, (id, text))| {
            Frame::new(
                type_from_info_id(id, context),
                text,
                id,
                FrameIndex::Native(index),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

fn set_field_text(tag: &mut InfoTag, id: String, text: &str) -> Mutation {
    if tag.field_text(&id) == Some(text) {
        return Mutation::Unchanged;
    }
    tag.set_field_text(id, text);
    Mutation::Modified
}

pub(crate) fn set_frame(
    tag: &mut InfoTag,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some(existing_id) = tag.fields().nth(index).map(|(id, _)| id.to_owned()) else {
        log::debug!("INFO field index {index} out of range");
        return Mutation::Rejected;
    };
    let id = info_id(frame, context);
    if existing_id.eq_ignore_ascii_case(&id)
        || (frame.frame_type() != FrameType::Other
            && type_from_info_id(&existing_id, context) == frame.frame_type())
    {
        return set_field_text(tag, existing_id, frame.value());
    }
    tag.remove_field(&existing_id);
    tag.set_field_text(id, frame.value());
    Mutation::Modified
}

pub(crate) fn set_frame_without_index(
    tag: &mut InfoTag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let id = info_id(frame, context);
    if frame.value().is_empty() {
        return Mutation::from_modified(tag.remove_field(&id).is_some());
    }
    set_field_text(tag, id, frame.value())
}

pub(crate) fn add_frame(tag: &mut InfoTag, frame: &mut Frame, context: &TagContext<'_>) -> Mutation {
    let id = info_id(frame, context);
    tag.set_field_text(id.clone(), non_empty_value(frame.value()));
    let index = tag
        .position(&id)
        .map_or(FrameIndex::Unpositioned, FrameIndex::Native);
    frame.set_internal_name(id);
    frame.set_index(index);
    Mutation::Modified
}

pub(crate) fn delete_frame(
    tag: &mut InfoTag,
    frame: &Frame,
    _context: &TagContext<'_>,
) -> Mutation {
    Mutation::from_modified(tag.remove_field(frame.internal_name()).is_some())
}

pub(crate) fn delete_frames(tag: &mut InfoTag, filter: &FrameFilter, context: &TagContext<'_>) -> bool {
    let len_before = tag.len();
    if filter.are_all_enabled() {
        tag.clear();
    } else {
        tag.retain(|id| !filter.is_enabled(type_from_info_id(id, context), id));
    }
    tag.len() != len_before
}

#[must_use]
pub fn frame_ids() -> Vec<String> {
    let mut frame_ids = standard_frame_ids(|frame_type| {
        frame_type == FrameType::Track || INFO_IDS.iter().any(|(info_type, _)| *info_type == frame_type)
    });
    frame_ids.extend(EXTRA_FRAME_IDS.iter().map(|id| (*id).to_owned()));
    frame_ids
}

#[cfg(test)]
mod tests;
