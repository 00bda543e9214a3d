// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tags, attachments and chapters of Matroska and WebM files.
//!
//! When writing, the existing `Tags`, `Attachments` and `Chapters`
//! elements are overwritten with `Void` elements and the new ones are
//! appended to the end of the segment. Trailing voids are reclaimed.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write as _},
    path::Path,
};

use crate::{
    Result,
    native::{
        AttachedFile, AudioProperties, ChapterAtom, ChapterDisplay, ChapterEdition, ContainerKind,
        MatroskaTag, NativeFile, NativeTag, NativeTagKind, SimpleTag, SimpleTagValue,
    },
};

use super::ebml::{
    self, EbmlError, ElementHeader, binary_element, ids, master_element, parse_children,
    read_child_headers, read_string, read_unsigned_int, string_element, unsigned_int_element,
};

/// Level 1 elements that are replaced on write, in the order of writing.
const REWRITTEN_IDS: [u32; 3] = [ids::CHAPTERS, ids::ATTACHMENTS, ids::TAGS];

const AUDIO_TRACK_TYPE: u64 = 2;

const DEFAULT_DOC_TYPE: &str = "matroska";

const DEFAULT_TAG_LANGUAGE: &str = "und";

const DEFAULT_CHAPTER_LANGUAGE: &str = "eng";

#[derive(Debug)]
struct SeekEntry {
    seek: ElementHeader,
    id: u32,
    position: ElementHeader,
}

#[derive(Debug)]
struct Layout {
    doc_type: String,
    doc_type_version: u64,
    segment: ElementHeader,

    /// End of the segment data, at most the end of the file.
    segment_end: u64,

    /// Level 1 elements ordered by offset.
    elements: Vec<ElementHeader>,

    seek_entries: Vec<SeekEntry>,
}

impl Layout {
    /// Where new elements are appended.
    ///
    /// This is the end of the segment unless it is preceded by voids
    /// or elements that are about to be replaced.
    fn append_offset(&self) -> u64 {
        let reaches_segment_end = self
            .elements
            .last()
            .and_then(ElementHeader::end_offset)
            .is_some_and(|end| end == self.segment_end);
        if !reaches_segment_end {
            return self.segment_end;
        }
        self.elements
            .iter()
            .rev()
            .take_while(|header| header.id == ids::VOID || REWRITTEN_IDS.contains(&header.id))
            .last()
            .map_or(self.segment_end, |header| header.offset)
    }
}

fn read_seek_entries<R: Read + Seek>(
    reader: &mut R,
    seek_head: &ElementHeader,
) -> Result<Vec<SeekEntry>> {
    let mut entries = Vec::new();
    for seek in read_child_headers(reader, seek_head)? {
        if seek.id != ids::SEEK {
            continue;
        }
        let mut id = None;
        let mut position = None;
        for child in read_child_headers(reader, &seek)? {
            match child.id {
                ids::SEEK_ID => {
                    id = u32::try_from(read_unsigned_int(&child.read_data(reader)?)).ok();
                }
                ids::SEEK_POSITION => position = Some(child),
                _ => (),
            }
        }
        if let (Some(id), Some(position)) = (id, position) {
            entries.push(SeekEntry { seek, id, position });
        }
    }
    Ok(entries)
}

fn read_layout<R: Read + Seek>(reader: &mut R) -> Result<Layout> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    let ebml_header = ElementHeader::read_at(reader, 0)?;
    if ebml_header.id != ids::EBML {
        return Err(EbmlError::NotEbml.into());
    }
    let mut doc_type = DEFAULT_DOC_TYPE.to_owned();
    let mut doc_type_version = 1;
    for (id, data) in parse_children(&ebml_header.read_data(reader)?)? {
        match id {
            ids::DOC_TYPE => doc_type = read_string(data),
            ids::DOC_TYPE_VERSION => doc_type_version = read_unsigned_int(data),
            _ => (),
        }
    }

    let mut offset = ebml_header.data_offset() + ebml_header.size.unwrap_or_default();
    let segment = loop {
        if offset >= file_size {
            return Err(EbmlError::MissingSegment.into());
        }
        let header = ElementHeader::read_at(reader, offset)?;
        if header.id == ids::SEGMENT {
            break header;
        }
        offset = header.end_offset().ok_or(EbmlError::UnknownSize {
            id: header.id,
            offset: header.offset,
        })?;
    };
    let segment_end = segment
        .end_offset()
        .map_or(file_size, |end| end.min(file_size));

    let mut elements = Vec::new();
    let mut offset = segment.data_offset();
    while offset < segment_end {
        let header = match ElementHeader::read_at(reader, offset) {
            Ok(header) => header,
            Err(err) => {
                log::warn!("Stopped scanning segment at offset {offset}: {err}");
                break;
            }
        };
        elements.push(header);
        let Some(end) = header.end_offset() else {
            log::debug!(
                "Stopped scanning segment at element {:#X} of unknown size",
                header.id
            );
            break;
        };
        offset = end;
    }

    let seek_heads = elements
        .iter()
        .filter(|header| header.id == ids::SEEK_HEAD)
        .copied()
        .collect::<Vec<_>>();
    let mut seek_entries = Vec::new();
    for seek_head in &seek_heads {
        seek_entries.extend(read_seek_entries(reader, seek_head)?);
    }

    // Elements that have not been reached by the linear scan
    for entry in &seek_entries {
        if !REWRITTEN_IDS.contains(&entry.id) && entry.id != ids::TRACKS {
            continue;
        }
        let Ok(position) = entry.position.read_data(reader).map(|data| read_unsigned_int(&data))
        else {
            continue;
        };
        let offset = segment.data_offset() + position;
        if elements.iter().any(|header| header.offset == offset) {
            continue;
        }
        match ElementHeader::read_at(reader, offset) {
            Ok(header) if header.id == entry.id && header.size.is_some() => {
                log::debug!("Found element {:#X} at offset {offset} through seek head", header.id);
                elements.push(header);
            }
            _ => log::warn!("Ignoring invalid seek entry for element {:#X}", entry.id),
        }
    }
    elements.sort_by_key(|header| header.offset);

    Ok(Layout {
        doc_type,
        doc_type_version,
        segment,
        segment_end,
        elements,
        seek_entries,
    })
}

fn read_audio_codec_id(data: &[u8]) -> Result<Option<String>> {
    for (id, track_entry) in parse_children(data)? {
        if id != ids::TRACK_ENTRY {
            continue;
        }
        let mut track_type = 0;
        let mut codec_id = String::new();
        for (id, data) in parse_children(track_entry)? {
            match id {
                ids::TRACK_TYPE => track_type = read_unsigned_int(data),
                ids::CODEC_ID => codec_id = read_string(data),
                _ => (),
            }
        }
        if track_type == AUDIO_TRACK_TYPE {
            return Ok(Some(codec_id));
        }
    }
    Ok(None)
}

fn read_simple_tag(data: &[u8], target_type_value: u64, track_uid: u64) -> Result<SimpleTag> {
    let mut simple_tag = SimpleTag::new(String::new(), SimpleTagValue::String(String::new()));
    simple_tag.language = DEFAULT_TAG_LANGUAGE.to_owned();
    simple_tag.target_type_value = target_type_value;
    simple_tag.track_uid = track_uid;
    for (id, data) in parse_children(data)? {
        match id {
            ids::TAG_NAME => simple_tag.name = read_string(data),
            ids::TAG_LANGUAGE => simple_tag.language = read_string(data),
            ids::TAG_DEFAULT => simple_tag.default = read_unsigned_int(data) != 0,
            ids::TAG_STRING => simple_tag.value = SimpleTagValue::String(read_string(data)),
            ids::TAG_BINARY => simple_tag.value = SimpleTagValue::Binary(data.to_vec()),
            // Nested simple tags are not supported
            _ => (),
        }
    }
    Ok(simple_tag)
}

fn read_simple_tags(data: &[u8], simple_tags: &mut Vec<SimpleTag>) -> Result<()> {
    for (id, tag) in parse_children(data)? {
        if id != ids::TAG {
            continue;
        }
        let children = parse_children(tag)?;
        let mut target_type_value = 0;
        let mut track_uid = 0;
        for (_, targets) in children.iter().filter(|(id, _)| *id == ids::TARGETS) {
            for (id, data) in parse_children(targets)? {
                match id {
                    ids::TARGET_TYPE_VALUE => target_type_value = read_unsigned_int(data),
                    ids::TAG_TRACK_UID if track_uid == 0 => track_uid = read_unsigned_int(data),
                    _ => (),
                }
            }
        }
        for (_, data) in children.iter().filter(|(id, _)| *id == ids::SIMPLE_TAG) {
            let simple_tag = read_simple_tag(data, target_type_value, track_uid)?;
            if simple_tag.name.is_empty() {
                log::debug!("Ignoring simple tag without name");
                continue;
            }
            simple_tags.push(simple_tag);
        }
    }
    Ok(())
}

fn read_attachments(data: &[u8], attachments: &mut Vec<AttachedFile>) -> Result<()> {
    for (id, attached_file) in parse_children(data)? {
        if id != ids::ATTACHED_FILE {
            continue;
        }
        let mut attachment = AttachedFile::default();
        for (id, data) in parse_children(attached_file)? {
            match id {
                ids::FILE_DESCRIPTION => attachment.description = read_string(data),
                ids::FILE_NAME => attachment.file_name = read_string(data),
                ids::FILE_MIME_TYPE => attachment.mime_type = read_string(data),
                ids::FILE_DATA => attachment.data = data.to_vec(),
                ids::FILE_UID => attachment.uid = read_unsigned_int(data),
                _ => (),
            }
        }
        attachments.push(attachment);
    }
    Ok(())
}

fn read_chapter_atom(data: &[u8]) -> Result<ChapterAtom> {
    let mut chapter = ChapterAtom::default();
    for (id, data) in parse_children(data)? {
        match id {
            ids::CHAPTER_UID => chapter.uid = read_unsigned_int(data),
            ids::CHAPTER_TIME_START => chapter.time_start_ns = read_unsigned_int(data),
            ids::CHAPTER_TIME_END => chapter.time_end_ns = read_unsigned_int(data),
            ids::CHAPTER_FLAG_HIDDEN => chapter.hidden = read_unsigned_int(data) != 0,
            ids::CHAPTER_DISPLAY => {
                let mut display = ChapterDisplay {
                    string: String::new(),
                    language: DEFAULT_CHAPTER_LANGUAGE.to_owned(),
                };
                for (id, data) in parse_children(data)? {
                    match id {
                        ids::CHAP_STRING => display.string = read_string(data),
                        ids::CHAP_LANGUAGE => display.language = read_string(data),
                        _ => (),
                    }
                }
                chapter.displays.push(display);
            }
            // Nested chapter atoms are flattened away
            _ => (),
        }
    }
    Ok(chapter)
}

fn read_chapters(data: &[u8], editions: &mut Vec<ChapterEdition>) -> Result<()> {
    for (id, edition_entry) in parse_children(data)? {
        if id != ids::EDITION_ENTRY {
            continue;
        }
        let mut edition = ChapterEdition::default();
        for (id, data) in parse_children(edition_entry)? {
            match id {
                ids::EDITION_UID => edition.uid = read_unsigned_int(data),
                ids::EDITION_FLAG_HIDDEN => edition.hidden = read_unsigned_int(data) != 0,
                ids::EDITION_FLAG_DEFAULT => edition.default = read_unsigned_int(data) != 0,
                ids::EDITION_FLAG_ORDERED => edition.ordered = read_unsigned_int(data) != 0,
                ids::CHAPTER_ATOM => edition.chapters.push(read_chapter_atom(data)?),
                _ => (),
            }
        }
        editions.push(edition);
    }
    Ok(())
}

/// Read the audio properties together with tags, attachments and
/// chapters.
pub(crate) fn read_file(path: &Path) -> Result<NativeFile> {
    log::debug!("Reading Matroska file {}", path.display());
    let mut file = File::open(path)?;
    let layout = read_layout(&mut file)?;
    let mut codec_id = None;
    let mut tag = MatroskaTag::default();
    for header in &layout.elements {
        match header.id {
            ids::TRACKS if codec_id.is_none() => {
                codec_id = read_audio_codec_id(&header.read_data(&mut file)?)?;
            }
            ids::TAGS => read_simple_tags(&header.read_data(&mut file)?, &mut tag.simple_tags)?,
            ids::ATTACHMENTS => {
                read_attachments(&header.read_data(&mut file)?, &mut tag.attachments)?;
            }
            ids::CHAPTERS => read_chapters(&header.read_data(&mut file)?, &mut tag.editions)?,
            _ => (),
        }
    }
    let mut native_file = NativeFile::new(ContainerKind::Matroska);
    native_file.set_audio_properties(AudioProperties::Matroska {
        doc_type: layout.doc_type,
        doc_type_version: layout.doc_type_version,
        codec_id: codec_id.unwrap_or_default(),
    });
    if !tag.is_empty() {
        native_file.insert_tag(NativeTagKind::Matroska, NativeTag::Matroska(tag));
    }
    Ok(native_file)
}

fn encode_simple_tag(simple_tag: &SimpleTag) -> Vec<u8> {
    let mut content = string_element(ids::TAG_NAME, &simple_tag.name);
    let language = if simple_tag.language.is_empty() {
        DEFAULT_TAG_LANGUAGE
    } else {
        &simple_tag.language
    };
    content.extend(string_element(ids::TAG_LANGUAGE, language));
    content.extend(unsigned_int_element(
        ids::TAG_DEFAULT,
        u64::from(simple_tag.default),
    ));
    match &simple_tag.value {
        SimpleTagValue::String(value) => content.extend(string_element(ids::TAG_STRING, value)),
        SimpleTagValue::Binary(data) => content.extend(binary_element(ids::TAG_BINARY, data)),
    }
    master_element(ids::SIMPLE_TAG, &content)
}

/// Simple tags with the same targets share a `Tag` element.
fn encode_tags(simple_tags: &[SimpleTag]) -> Vec<u8> {
    let mut groups: Vec<((u64, u64), Vec<u8>)> = Vec::new();
    for simple_tag in simple_tags {
        let targets = (simple_tag.target_type_value, simple_tag.track_uid);
        let encoded = encode_simple_tag(simple_tag);
        match groups.iter_mut().find(|(existing, _)| *existing == targets) {
            Some((_, content)) => content.extend(encoded),
            None => groups.push((targets, encoded)),
        }
    }
    let mut tags = Vec::new();
    for ((target_type_value, track_uid), simple_tags) in groups {
        let mut targets = Vec::new();
        if target_type_value > 0 {
            targets.extend(unsigned_int_element(
                ids::TARGET_TYPE_VALUE,
                target_type_value,
            ));
        }
        if track_uid > 0 {
            targets.extend(unsigned_int_element(ids::TAG_TRACK_UID, track_uid));
        }
        let mut content = master_element(ids::TARGETS, &targets);
        content.extend(simple_tags);
        tags.extend(master_element(ids::TAG, &content));
    }
    master_element(ids::TAGS, &tags)
}

fn encode_attachments(attachments: &[AttachedFile]) -> Vec<u8> {
    let mut content = Vec::new();
    for attachment in attachments {
        let mut attached_file = Vec::new();
        if !attachment.description.is_empty() {
            attached_file.extend(string_element(
                ids::FILE_DESCRIPTION,
                &attachment.description,
            ));
        }
        attached_file.extend(string_element(ids::FILE_NAME, &attachment.file_name));
        attached_file.extend(string_element(ids::FILE_MIME_TYPE, &attachment.mime_type));
        attached_file.extend(binary_element(ids::FILE_DATA, &attachment.data));
        attached_file.extend(unsigned_int_element(ids::FILE_UID, attachment.uid));
        content.extend(master_element(ids::ATTACHED_FILE, &attached_file));
    }
    master_element(ids::ATTACHMENTS, &content)
}

fn encode_chapter_atom(chapter: &ChapterAtom) -> Vec<u8> {
    let mut content = unsigned_int_element(ids::CHAPTER_UID, chapter.uid);
    content.extend(unsigned_int_element(
        ids::CHAPTER_TIME_START,
        chapter.time_start_ns,
    ));
    if chapter.time_end_ns > chapter.time_start_ns {
        content.extend(unsigned_int_element(ids::CHAPTER_TIME_END, chapter.time_end_ns));
    }
    if chapter.hidden {
        content.extend(unsigned_int_element(ids::CHAPTER_FLAG_HIDDEN, 1));
    }
    for display in &chapter.displays {
        let mut chapter_display = string_element(ids::CHAP_STRING, &display.string);
        chapter_display.extend(string_element(ids::CHAP_LANGUAGE, &display.language));
        content.extend(master_element(ids::CHAPTER_DISPLAY, &chapter_display));
    }
    master_element(ids::CHAPTER_ATOM, &content)
}

fn encode_chapters(editions: &[ChapterEdition]) -> Vec<u8> {
    let mut content = Vec::new();
    for edition in editions {
        let mut edition_entry = Vec::new();
        if edition.uid > 0 {
            edition_entry.extend(unsigned_int_element(ids::EDITION_UID, edition.uid));
        }
        edition_entry.extend(unsigned_int_element(
            ids::EDITION_FLAG_HIDDEN,
            u64::from(edition.hidden),
        ));
        edition_entry.extend(unsigned_int_element(
            ids::EDITION_FLAG_DEFAULT,
            u64::from(edition.default),
        ));
        edition_entry.extend(unsigned_int_element(
            ids::EDITION_FLAG_ORDERED,
            u64::from(edition.ordered),
        ));
        for chapter in &edition.chapters {
            edition_entry.extend(encode_chapter_atom(chapter));
        }
        content.extend(master_element(ids::EDITION_ENTRY, &edition_entry));
    }
    master_element(ids::CHAPTERS, &content)
}

/// Level 1 elements of a tag in the order of [`REWRITTEN_IDS`].
fn encode_tag(tag: &MatroskaTag) -> Vec<(u32, Vec<u8>)> {
    let mut elements = Vec::with_capacity(REWRITTEN_IDS.len());
    if !tag.editions.is_empty() {
        elements.push((ids::CHAPTERS, encode_chapters(&tag.editions)));
    }
    if !tag.attachments.is_empty() {
        elements.push((ids::ATTACHMENTS, encode_attachments(&tag.attachments)));
    }
    if !tag.simple_tags.is_empty() {
        elements.push((ids::TAGS, encode_tags(&tag.simple_tags)));
    }
    elements
}

fn write_at(file: &mut File, offset: u64, bytes: &[u8]) -> Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(bytes)?;
    Ok(())
}

fn void_element(file: &mut File, header: &ElementHeader) -> Result<()> {
    let total_size = header.total_size().ok_or(EbmlError::UnknownSize {
        id: header.id,
        offset: header.offset,
    })?;
    write_at(file, header.offset, &ebml::void_header(total_size)?)
}

fn encode_seek_position(position: u64, length: u64) -> Option<Vec<u8>> {
    let length = usize::try_from(length).ok().filter(|length| (1..=8).contains(length))?;
    let bytes = position.to_be_bytes();
    let (leading, encoded) = bytes.split_at(bytes.len() - length);
    leading
        .iter()
        .all(|byte| *byte == 0)
        .then(|| encoded.to_vec())
}

/// Point the seek entries of rewritten elements to their new positions.
///
/// Entries that cannot be updated in place are voided.
fn update_seek_entries(
    file: &mut File,
    seek_entries: &[SeekEntry],
    mut new_positions: Vec<(u32, u64)>,
) -> Result<()> {
    for entry in seek_entries
        .iter()
        .filter(|entry| REWRITTEN_IDS.contains(&entry.id))
    {
        let new_position = new_positions
            .iter()
            .position(|(id, _)| *id == entry.id)
            .map(|index| new_positions.remove(index).1);
        let encoded = new_position.and_then(|position| {
            encode_seek_position(position, entry.position.size.unwrap_or_default())
        });
        if let Some(encoded) = encoded {
            write_at(file, entry.position.data_offset(), &encoded)?;
        } else {
            if let Some(position) = new_position {
                log::warn!(
                    "Position {position} of element {:#X} does not fit into seek entry",
                    entry.id
                );
            }
            void_element(file, &entry.seek)?;
        }
    }
    for (id, _) in new_positions {
        log::debug!("No seek entry for element {id:#X}");
    }
    Ok(())
}

/// Replace tags, attachments and chapters of a file.
///
/// An empty tag removes all of them.
pub(crate) fn write_tag(path: &Path, tag: &MatroskaTag) -> Result<()> {
    log::debug!("Writing Matroska tags into file {}", path.display());
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let layout = read_layout(&mut file)?;
    let file_size = file.seek(SeekFrom::End(0))?;
    let segment_data_offset = layout.segment.data_offset();
    let append_offset = layout.append_offset();

    let mut appended = Vec::new();
    let mut new_positions = Vec::with_capacity(REWRITTEN_IDS.len());
    for (id, element) in encode_tag(tag) {
        new_positions.push((id, append_offset + appended.len() as u64 - segment_data_offset));
        appended.extend(element);
    }

    // Validate the new segment size before modifying the file
    let new_segment_size = append_offset + appended.len() as u64 - segment_data_offset;
    let encoded_segment_size = layout
        .segment
        .size
        .map(|_| ebml::encode_vint_with_length(new_segment_size, layout.segment.size_length))
        .transpose()?;

    let mut tail = Vec::new();
    file.seek(SeekFrom::Start(layout.segment_end))?;
    (&mut file).take(file_size - layout.segment_end).read_to_end(&mut tail)?;

    for header in layout
        .elements
        .iter()
        .filter(|header| REWRITTEN_IDS.contains(&header.id) && header.offset < append_offset)
    {
        void_element(&mut file, header)?;
    }
    write_at(&mut file, append_offset, &appended)?;
    file.write_all(&tail)?;
    file.set_len(append_offset + appended.len() as u64 + tail.len() as u64)?;
    if let Some(encoded_segment_size) = encoded_segment_size {
        write_at(&mut file, layout.segment.size_offset(), &encoded_segment_size)?;
    }
    update_seek_entries(&mut file, &layout.seek_entries, new_positions)?;
    file.sync_all()?;
    Ok(())
}

/// Remove tags, attachments and chapters from a file.
///
/// Returns `false` if the file contains none of them.
pub(crate) fn strip_tag(path: &Path) -> Result<bool> {
    let layout = read_layout(&mut File::open(path)?)?;
    if !layout
        .elements
        .iter()
        .any(|header| REWRITTEN_IDS.contains(&header.id))
    {
        log::debug!("Nothing to strip from Matroska file {}", path.display());
        return Ok(false);
    }
    write_tag(path, &MatroskaTag::default())?;
    Ok(true)
}
