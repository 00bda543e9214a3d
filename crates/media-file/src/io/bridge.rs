// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reading and writing of all containers except Matroska through `lofty`.

use std::{fs::File, path::Path};

use lofty::{
    aac::AacFile,
    ape::{ApeFile, ApeProperties},
    config::{ParseOptions, WriteOptions},
    file::{AudioFile, TaggedFile, TaggedFileExt as _},
    flac::FlacFile,
    iff::{
        aiff::AiffFile,
        wav::{WavFile, WavFormat, WavProperties},
    },
    mp4::{Mp4Codec, Mp4File, Mp4Properties},
    mpeg::MpegFile,
    musepack::MpcFile,
    ogg::{OpusFile, OpusProperties, SpeexFile, SpeexProperties, VorbisFile},
    picture::{MimeType, Picture, PictureType as LoftyPictureType},
    probe::Probe,
    tag::{ItemKey, ItemValue, Tag, TagExt as _, TagItem, TagType},
    wavpack::{WavPackFile, WavPackProperties},
};

use tagweave_core::picture::{PictureFields, PictureType};

use crate::{
    Error, Result,
    config::{PictureName, TagConfig},
    fmt::{ape, mp4},
    native::{
        ApeItem, ApeTag, ApeValue, AudioProperties, ContainerKind, InfoTag, Mp4CoverArt, Mp4Tag,
        Mp4Value, NativeFile, NativePicture, NativeTag, NativeTagKind, PropertyTag, XiphComment,
    },
    util::picture::{
        decode_base64_picture_block, encode_base64_picture_block, guess_mime_type,
        mime_type_from_mp4_image_format, mp4_image_format_from_mime_type,
    },
};

const TRACK_ATOM: &str = "trkn";

const DISC_ATOM: &str = "disk";

const COVER_ART_ATOM: &str = "covr";

fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(true)
}

const fn tag_type_of(tag_kind: NativeTagKind) -> Option<TagType> {
    let tag_type = match tag_kind {
        NativeTagKind::Id3v1 => TagType::Id3v1,
        NativeTagKind::Id3v2 => TagType::Id3v2,
        NativeTagKind::Ape => TagType::Ape,
        NativeTagKind::Xiph => TagType::VorbisComments,
        NativeTagKind::Mp4 => TagType::Mp4Ilst,
        NativeTagKind::RiffInfo => TagType::RiffInfo,
        NativeTagKind::Matroska => {
            return None;
        }
    };
    Some(tag_type)
}

fn tag_kind_of(tag_type: TagType) -> Option<NativeTagKind> {
    let tag_kind = match tag_type {
        TagType::Id3v1 => NativeTagKind::Id3v1,
        TagType::Id3v2 => NativeTagKind::Id3v2,
        TagType::Ape => NativeTagKind::Ape,
        TagType::VorbisComments => NativeTagKind::Xiph,
        TagType::Mp4Ilst => NativeTagKind::Mp4,
        TagType::RiffInfo => NativeTagKind::RiffInfo,
        _ => {
            return None;
        }
    };
    Some(tag_kind)
}

fn read_audio_file<F>(
    file: &mut File,
    summarize: impl FnOnce(&F::Properties, &TaggedFile) -> AudioProperties,
) -> Result<(AudioProperties, TaggedFile)>
where
    F: AudioFile + Into<TaggedFile>,
    F::Properties: Clone,
{
    let audio_file = <F as AudioFile>::read_from(file, parse_options())?;
    let properties = audio_file.properties().clone();
    let tagged_file: TaggedFile = audio_file.into();
    Ok((summarize(&properties, &tagged_file), tagged_file))
}

fn bit_depth(tagged_file: &TaggedFile) -> u8 {
    tagged_file.properties().bit_depth().unwrap_or_default()
}

fn other_format(format: &str, tagged_file: &TaggedFile) -> AudioProperties {
    let format = match tagged_file.properties().audio_bitrate() {
        Some(bitrate) if bitrate > 0 => format!("{format} {bitrate} kbps"),
        _ => format.to_owned(),
    };
    AudioProperties::Other { format }
}

fn mp4_codec_name(codec: &Mp4Codec) -> &'static str {
    match codec {
        Mp4Codec::AAC => "AAC",
        Mp4Codec::ALAC => "ALAC",
        Mp4Codec::MP3 => "MP3",
        Mp4Codec::FLAC => "FLAC",
        _ => "",
    }
}

const fn wav_format_tag(format: &WavFormat) -> u16 {
    match format {
        WavFormat::PCM => 1,
        WavFormat::IEEE_FLOAT => 3,
        WavFormat::Other(format_tag) => *format_tag,
    }
}

/// Read the audio properties and all tags of a file.
pub(crate) fn read_file(path: &Path, container_kind: ContainerKind) -> Result<NativeFile> {
    log::debug!("Reading {container_kind:?} file {}", path.display());
    let mut file = File::open(path)?;
    let (audio_properties, tagged_file) = match container_kind {
        ContainerKind::Ape => read_audio_file::<ApeFile>(
            &mut file,
            |properties: &ApeProperties, tagged_file| AudioProperties::Ape {
                version: properties.version(),
                bit_depth: bit_depth(tagged_file),
            },
        )?,
        ContainerKind::Mpc => read_audio_file::<MpcFile>(&mut file, |_, _| AudioProperties::Mpc)?,
        ContainerKind::WavPack => read_audio_file::<WavPackFile>(
            &mut file,
            |properties: &WavPackProperties, tagged_file| AudioProperties::WavPack {
                version: properties.version(),
                bit_depth: bit_depth(tagged_file),
            },
        )?,
        ContainerKind::Mp4 => read_audio_file::<Mp4File>(
            &mut file,
            |properties: &Mp4Properties, tagged_file| AudioProperties::Mp4 {
                codec: mp4_codec_name(properties.codec()).to_owned(),
                bit_depth: bit_depth(tagged_file),
            },
        )?,
        ContainerKind::Wav => read_audio_file::<WavFile>(
            &mut file,
            |properties: &WavProperties, tagged_file| AudioProperties::Wav {
                format: wav_format_tag(properties.format()),
                bit_depth: bit_depth(tagged_file),
            },
        )?,
        ContainerKind::Aiff => read_audio_file::<AiffFile>(&mut file, |_, tagged_file| {
            AudioProperties::Aiff {
                bit_depth: bit_depth(tagged_file),
            }
        })?,
        ContainerKind::OggVorbis => {
            read_audio_file::<VorbisFile>(&mut file, |_, _| AudioProperties::OggVorbis)?
        }
        ContainerKind::Flac => read_audio_file::<FlacFile>(&mut file, |_, tagged_file| {
            AudioProperties::Flac {
                bit_depth: bit_depth(tagged_file),
            }
        })?,
        ContainerKind::Opus => read_audio_file::<OpusFile>(
            &mut file,
            |properties: &OpusProperties, _| AudioProperties::Opus {
                version: properties.version(),
            },
        )?,
        ContainerKind::Speex => read_audio_file::<SpeexFile>(
            &mut file,
            |properties: &SpeexProperties, _| AudioProperties::Speex {
                version: properties.version(),
            },
        )?,
        ContainerKind::Mpeg => read_audio_file::<MpegFile>(&mut file, |_, tagged_file| {
            other_format("MPEG", tagged_file)
        })?,
        ContainerKind::Aac => read_audio_file::<AacFile>(&mut file, |_, tagged_file| {
            other_format("AAC", tagged_file)
        })?,
        ContainerKind::Matroska | ContainerKind::TrueAudio => {
            return Err(Error::UnsupportedContainer(container_kind));
        }
    };
    let mut native_file = NativeFile::new(container_kind);
    native_file.set_audio_properties(audio_properties);
    for tag in tagged_file.tags() {
        let Some(tag_kind) = tag_kind_of(tag.tag_type()) else {
            log::debug!("Ignoring {:?} tag", tag.tag_type());
            continue;
        };
        native_file.insert_tag(tag_kind, native_tag_from_lofty(tag, tag_kind, container_kind));
    }
    Ok(native_file)
}

/// Write a single native tag into a file, replacing the existing one.
pub(crate) fn save_tag(
    path: &Path,
    tag_kind: NativeTagKind,
    native_tag: &NativeTag,
    config: &TagConfig,
) -> Result<()> {
    let tag_type = tag_type_of(tag_kind).ok_or(Error::UnsupportedTag(tag_kind))?;
    let tag = lofty_tag(native_tag, tag_type);
    let write_options = WriteOptions::default().uppercase_id3v2_chunk(!config.lowercase_id3_chunk);
    log::debug!("Saving {tag_kind:?} tag into file {}", path.display());
    tag.save_to_path(path, write_options)?;
    Ok(())
}

/// Remove a tag from a file.
///
/// Returns `false` if the file does not contain the tag.
pub(crate) fn strip_tag(path: &Path, tag_kind: NativeTagKind) -> Result<bool> {
    let tag_type = tag_type_of(tag_kind).ok_or(Error::UnsupportedTag(tag_kind))?;
    let tagged_file = Probe::open(path)?
        .options(ParseOptions::new().read_properties(false))
        .read()?;
    if !tagged_file.contains_tag_type(tag_type) {
        log::debug!("No {tag_kind:?} tag to strip from file {}", path.display());
        return Ok(false);
    }
    log::debug!("Stripping {tag_kind:?} tag from file {}", path.display());
    Tag::new(tag_type).remove_from_path(path)?;
    Ok(true)
}

fn item_key_name(item: &TagItem, key_space: TagType) -> Option<String> {
    match item.key() {
        ItemKey::Unknown(key) => Some(key.clone()),
        key => key.map_key(key_space, false).map(ToOwned::to_owned),
    }
}

fn native_picture(picture: &Picture) -> NativePicture {
    let mime_type = picture
        .mime_type()
        .map(|mime_type| mime_type.as_str().to_owned())
        .filter(|mime_type| !mime_type.is_empty())
        .or_else(|| guess_mime_type(picture.data()).map(|mime| mime.to_string()))
        .unwrap_or_default();
    NativePicture {
        picture_type: PictureType::from_code(i64::from(picture.pic_type().as_u8())),
        mime_type,
        description: picture.description().unwrap_or_default().to_owned(),
        data: picture.data().to_vec(),
        ..Default::default()
    }
}

fn lofty_mime_type(mime_type: &str) -> MimeType {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/bmp" => MimeType::Bmp,
        "image/gif" => MimeType::Gif,
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/tiff" => MimeType::Tiff,
        _ => MimeType::Unknown(mime_type.to_owned()),
    }
}

fn lofty_picture(picture: &NativePicture) -> Picture {
    let description = (!picture.description.is_empty()).then(|| picture.description.clone());
    Picture::new_unchecked(
        LoftyPictureType::from_u8(picture.picture_type.code()),
        Some(lofty_mime_type(&picture.mime_type)),
        description,
        picture.data.clone(),
    )
}

fn native_tag_from_lofty(
    tag: &Tag,
    tag_kind: NativeTagKind,
    container_kind: ContainerKind,
) -> NativeTag {
    let mut native_tag = NativeTag::empty(tag_kind, container_kind);
    match &mut native_tag {
        NativeTag::Ape(ape_tag) => read_ape_tag(tag, ape_tag),
        NativeTag::Mp4(mp4_tag) => read_mp4_tag(tag, mp4_tag),
        NativeTag::Xiph(comment) => read_xiph_comment(tag, comment),
        NativeTag::RiffInfo(info_tag) => read_info_tag(tag, info_tag),
        NativeTag::Generic(property_tag) => read_property_tag(tag, property_tag),
        NativeTag::Matroska(_) => (),
    }
    native_tag
}

fn read_ape_tag(tag: &Tag, ape_tag: &mut ApeTag) {
    let mut items: Vec<ApeItem> = Vec::new();
    for item in tag.items() {
        let Some(key) = item_key_name(item, TagType::Ape) else {
            log::debug!("Ignoring APE item {:?}", item.key());
            continue;
        };
        let value = match item.value() {
            ItemValue::Text(text) => {
                ApeValue::Text(text.split('\0').map(ToOwned::to_owned).collect())
            }
            ItemValue::Locator(locator) => ApeValue::Locator(locator.clone()),
            ItemValue::Binary(data) => ApeValue::Binary(data.clone()),
        };
        let existing = items
            .iter_mut()
            .find(|existing| existing.key.eq_ignore_ascii_case(&key));
        match (existing, value) {
            (
                Some(ApeItem {
                    value: ApeValue::Text(values),
                    ..
                }),
                ApeValue::Text(more_values),
            ) => values.extend(more_values),
            (_, value) => items.push(ApeItem { key, value }),
        }
    }
    for picture in tag.pictures() {
        let fields = native_picture(picture).to_fields();
        items.push(ApeItem::binary(
            ape::picture_key(fields.picture_type),
            ape::picture_payload(&fields),
        ));
    }
    for item in items {
        ape_tag.insert(item);
    }
}

fn parse_number(text: &str) -> i32 {
    text.split('/')
        .next()
        .and_then(|number| number.trim().parse().ok())
        .unwrap_or_default()
}

fn read_mp4_tag(tag: &Tag, mp4_tag: &mut Mp4Tag) {
    let mut track = (0, 0);
    let mut disc = (0, 0);
    let mut texts: Vec<(String, Vec<String>)> = Vec::new();
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            log::debug!("Ignoring non-text MP4 item {:?}", item.key());
            continue;
        };
        match item.key() {
            ItemKey::TrackNumber => track.0 = parse_number(text),
            ItemKey::TrackTotal => track.1 = parse_number(text),
            ItemKey::DiscNumber => disc.0 = parse_number(text),
            ItemKey::DiscTotal => disc.1 = parse_number(text),
            _ => {
                let Some(name) = item_key_name(item, TagType::Mp4Ilst) else {
                    continue;
                };
                match texts.iter_mut().find(|(existing, _)| *existing == name) {
                    Some((_, values)) => values.push(text.to_owned()),
                    None => texts.push((name, vec![text.to_owned()])),
                }
            }
        }
    }
    for (name, values) in texts {
        let value = mp4::atom_value_from_texts(&name, values);
        mp4_tag.insert(name, value);
    }
    if track != (0, 0) {
        mp4_tag.insert(TRACK_ATOM, Mp4Value::IntPair(track.0, track.1));
    }
    if disc != (0, 0) {
        mp4_tag.insert(DISC_ATOM, Mp4Value::IntPair(disc.0, disc.1));
    }
    let cover_art = tag
        .pictures()
        .iter()
        .map(|picture| {
            let picture = native_picture(picture);
            Mp4CoverArt {
                format: mp4_image_format_from_mime_type(&picture.mime_type),
                data: picture.data,
            }
        })
        .collect::<Vec<_>>();
    if !cover_art.is_empty() {
        mp4_tag.insert(COVER_ART_ATOM, Mp4Value::CoverArt(cover_art));
    }
}

fn read_xiph_comment(tag: &Tag, comment: &mut XiphComment) {
    for item in tag.items() {
        let (Some(name), Some(text)) = (
            item_key_name(item, TagType::VorbisComments),
            item.value().text(),
        ) else {
            continue;
        };
        comment.add_field(&name.to_uppercase(), text, false);
    }
    let pictures = tag.pictures().iter().map(native_picture).collect::<Vec<_>>();
    if comment.has_picture_blocks() {
        comment.set_pictures(pictures);
        return;
    }
    for picture in pictures {
        match encode_base64_picture_block(&picture) {
            Ok(encoded) => {
                comment.add_field(PictureName::MetadataBlockPicture.as_str(), encoded, false);
            }
            Err(err) => log::warn!("Failed to encode picture: {err:#}"),
        }
    }
}

fn read_info_tag(tag: &Tag, info_tag: &mut InfoTag) {
    for item in tag.items() {
        let (Some(id), Some(text)) = (item_key_name(item, TagType::RiffInfo), item.value().text())
        else {
            continue;
        };
        info_tag.set_field_text(id, text);
    }
}

/// ID3 frames are exposed by their Vorbis comment names.
fn property_name(item: &TagItem) -> String {
    match item.key() {
        ItemKey::Unknown(key) => key.to_uppercase(),
        key => key
            .map_key(TagType::VorbisComments, false)
            .map_or_else(|| format!("{key:?}").to_uppercase(), ToOwned::to_owned),
    }
}

fn read_property_tag(tag: &Tag, property_tag: &mut PropertyTag) {
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            continue;
        };
        let name = property_name(item);
        let mut values = property_tag.get(&name).map(<[String]>::to_vec).unwrap_or_default();
        values.push(text.to_owned());
        property_tag.set(name, values);
    }
    if property_tag.supports_pictures() {
        property_tag.set_pictures(tag.pictures().iter().map(native_picture).collect());
    }
}

fn push_text(tag: &mut Tag, item_key: ItemKey, text: impl Into<String>) {
    push_item(tag, item_key, ItemValue::Text(text.into()));
}

fn push_item(tag: &mut Tag, item_key: ItemKey, value: ItemValue) {
    let item = TagItem::new(item_key.clone(), value);
    if !tag.push(item) {
        log::debug!(
            "Dropping item {item_key:?} that is not supported by {:?} tags",
            tag.tag_type()
        );
    }
}

fn lofty_tag(native_tag: &NativeTag, tag_type: TagType) -> Tag {
    let mut tag = Tag::new(tag_type);
    match native_tag {
        NativeTag::Ape(ape_tag) => write_ape_tag(ape_tag, &mut tag),
        NativeTag::Mp4(mp4_tag) => write_mp4_tag(mp4_tag, &mut tag),
        NativeTag::Xiph(comment) => write_xiph_comment(comment, &mut tag),
        NativeTag::RiffInfo(info_tag) => {
            for (id, text) in info_tag.fields() {
                push_text(&mut tag, ItemKey::from_key(TagType::RiffInfo, id), text);
            }
        }
        NativeTag::Generic(property_tag) => {
            for (name, values) in property_tag.properties() {
                let item_key = ItemKey::from_key(TagType::VorbisComments, name);
                for value in values {
                    push_text(&mut tag, item_key.clone(), value.as_str());
                }
            }
            for picture in property_tag.pictures() {
                tag.push_picture(lofty_picture(picture));
            }
        }
        NativeTag::Matroska(_) => (),
    }
    tag
}

fn write_ape_tag(ape_tag: &ApeTag, tag: &mut Tag) {
    for item in ape_tag.items() {
        let item_key = ItemKey::from_key(TagType::Ape, &item.key);
        match &item.value {
            ApeValue::Text(values) => push_text(tag, item_key, values.join("\0")),
            ApeValue::Binary(data) if ape::is_picture_item(item) => {
                let (description, image_data) = ape::parse_picture_payload(data);
                let fields = PictureFields {
                    picture_type: ape::picture_type_from_key(&item.key),
                    mime_type: guess_mime_type(image_data)
                        .map(|mime| mime.to_string())
                        .unwrap_or_default(),
                    description,
                    data: image_data.to_vec(),
                    ..Default::default()
                };
                tag.push_picture(lofty_picture(&NativePicture::from_fields(&fields)));
            }
            ApeValue::Binary(data) => {
                push_item(tag, item_key, ItemValue::Binary(data.clone()));
            }
            ApeValue::Locator(locator) => {
                push_item(tag, item_key, ItemValue::Locator(locator.clone()));
            }
        }
    }
}

fn write_mp4_tag(mp4_tag: &Mp4Tag, tag: &mut Tag) {
    for (name, value) in mp4_tag.items() {
        match (name, value) {
            (TRACK_ATOM, Mp4Value::IntPair(number, total)) => {
                push_text(tag, ItemKey::TrackNumber, number.to_string());
                if *total > 0 {
                    push_text(tag, ItemKey::TrackTotal, total.to_string());
                }
            }
            (DISC_ATOM, Mp4Value::IntPair(number, total)) => {
                push_text(tag, ItemKey::DiscNumber, number.to_string());
                if *total > 0 {
                    push_text(tag, ItemKey::DiscTotal, total.to_string());
                }
            }
            (_, Mp4Value::CoverArt(cover_art)) => {
                for Mp4CoverArt { format, data } in cover_art {
                    let mime_type = mime_type_from_mp4_image_format(*format, data);
                    let picture = NativePicture {
                        mime_type: mime_type.to_string(),
                        data: data.clone(),
                        ..Default::default()
                    };
                    tag.push_picture(lofty_picture(&picture));
                }
            }
            (_, Mp4Value::Binary(_)) => {
                log::debug!("Dropping binary MP4 atom {name}");
            }
            (_, Mp4Value::Text(values)) => {
                let item_key = ItemKey::from_key(TagType::Mp4Ilst, name);
                for value in values {
                    push_text(tag, item_key.clone(), value.as_str());
                }
            }
            (_, value) => {
                let item_key = ItemKey::from_key(TagType::Mp4Ilst, name);
                push_text(tag, item_key, mp4::display_value(value));
            }
        }
    }
}

fn write_xiph_comment(comment: &XiphComment, tag: &mut Tag) {
    for (name, value) in comment.field_values() {
        if name.eq_ignore_ascii_case(PictureName::MetadataBlockPicture.as_str()) {
            match decode_base64_picture_block(value) {
                Ok(picture) => tag.push_picture(lofty_picture(&picture)),
                Err(err) => log::warn!("Dropping invalid picture block: {err:#}"),
            }
            continue;
        }
        push_text(tag, ItemKey::from_key(TagType::VorbisComments, name), value);
    }
    for picture in comment.pictures() {
        tag.push_picture(lofty_picture(picture));
    }
}
