// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Minimal EBML reader and writer.
//!
//! Element ids keep their length marker bits, e.g. `0x1A45_DFA3`.
//! Sizes are stored without the marker and the all-ones value of
//! every length denotes an unknown size.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use thiserror::Error;

pub mod ids {
    pub const EBML: u32 = 0x1A45_DFA3;
    pub const DOC_TYPE: u32 = 0x4282;
    pub const DOC_TYPE_VERSION: u32 = 0x4287;

    pub const SEGMENT: u32 = 0x1853_8067;

    pub const SEEK_HEAD: u32 = 0x114D_9B74;
    pub const SEEK: u32 = 0x4DBB;
    pub const SEEK_ID: u32 = 0x53AB;
    pub const SEEK_POSITION: u32 = 0x53AC;

    pub const INFO: u32 = 0x1549_A966;

    pub const TRACKS: u32 = 0x1654_AE6B;
    pub const TRACK_ENTRY: u32 = 0xAE;
    pub const TRACK_TYPE: u32 = 0x83;
    pub const CODEC_ID: u32 = 0x86;

    pub const CLUSTER: u32 = 0x1F43_B675;
    pub const CUES: u32 = 0x1C53_BB6B;

    pub const ATTACHMENTS: u32 = 0x1941_A469;
    pub const ATTACHED_FILE: u32 = 0x61A7;
    pub const FILE_DESCRIPTION: u32 = 0x467E;
    pub const FILE_NAME: u32 = 0x466E;
    pub const FILE_MIME_TYPE: u32 = 0x4660;
    pub const FILE_DATA: u32 = 0x465C;
    pub const FILE_UID: u32 = 0x46AE;

    pub const CHAPTERS: u32 = 0x1043_A770;
    pub const EDITION_ENTRY: u32 = 0x45B9;
    pub const EDITION_UID: u32 = 0x45BC;
    pub const EDITION_FLAG_HIDDEN: u32 = 0x45BD;
    pub const EDITION_FLAG_DEFAULT: u32 = 0x45DB;
    pub const EDITION_FLAG_ORDERED: u32 = 0x45DD;
    pub const CHAPTER_ATOM: u32 = 0xB6;
    pub const CHAPTER_UID: u32 = 0x73C4;
    pub const CHAPTER_TIME_START: u32 = 0x91;
    pub const CHAPTER_TIME_END: u32 = 0x92;
    pub const CHAPTER_FLAG_HIDDEN: u32 = 0x98;
    pub const CHAPTER_DISPLAY: u32 = 0x80;
    pub const CHAP_STRING: u32 = 0x85;
    pub const CHAP_LANGUAGE: u32 = 0x437C;

    pub const TAGS: u32 = 0x1254_C367;
    pub const TAG: u32 = 0x7373;
    pub const TARGETS: u32 = 0x63C0;
    pub const TARGET_TYPE_VALUE: u32 = 0x68CA;
    pub const TAG_TRACK_UID: u32 = 0x63C5;
    pub const SIMPLE_TAG: u32 = 0x67C8;
    pub const TAG_NAME: u32 = 0x45A3;
    pub const TAG_LANGUAGE: u32 = 0x447A;
    pub const TAG_DEFAULT: u32 = 0x4484;
    pub const TAG_STRING: u32 = 0x4487;
    pub const TAG_BINARY: u32 = 0x4485;

    pub const VOID: u32 = 0xEC;
    pub const CRC32: u32 = 0xBF;
}

pub const MAX_VINT_LENGTH: usize = 8;

const MAX_ID_LENGTH: usize = 4;

/// Upper bound for the data of elements that are loaded into memory.
pub const MAX_ELEMENT_DATA_SIZE: u64 = 1 << 30;

#[derive(Debug, Error)]
pub enum EbmlError {
    #[error("invalid variable-length integer at offset {offset}")]
    InvalidVint { offset: u64 },

    #[error("invalid element id at offset {offset}")]
    InvalidElementId { offset: u64 },

    #[error("element {id:#X} at offset {offset} exceeds its parent")]
    Overflow { id: u32, offset: u64 },

    #[error("element {id:#X} at offset {offset} is too large")]
    TooLarge { id: u32, offset: u64 },

    #[error("element {id:#X} at offset {offset} has an unknown size")]
    UnknownSize { id: u32, offset: u64 },

    #[error("value {value} does not fit into {length} bytes")]
    ValueTooLarge { value: u64, length: usize },

    #[error("not an EBML document")]
    NotEbml,

    #[error("missing segment")]
    MissingSegment,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EbmlError>;

/// The all-ones data value that marks an unknown size.
#[must_use]
const fn unknown_size_marker(length: usize) -> u64 {
    (1 << (7 * length)) - 1
}

fn vint_length_of_first_byte(first_byte: u8, max_length: usize) -> Option<usize> {
    if first_byte == 0 {
        return None;
    }
    let length = first_byte.leading_zeros() as usize + 1;
    (length <= max_length).then_some(length)
}

/// Read a variable-length integer without its length marker.
///
/// Returns the value and the number of bytes read.
pub fn read_vint<R: Read + Seek>(reader: &mut R) -> Result<(u64, usize)> {
    let offset = reader.stream_position()?;
    let mut first_byte = [0u8; 1];
    reader.read_exact(&mut first_byte)?;
    let length = vint_length_of_first_byte(first_byte[0], MAX_VINT_LENGTH)
        .ok_or(EbmlError::InvalidVint { offset })?;
    // The marker bit of an 8 byte vint is the whole first byte
    let mask = (0xFF_u16 >> length) as u8;
    let mut value = u64::from(first_byte[0] & mask);
    let mut remaining = [0u8; MAX_VINT_LENGTH - 1];
    reader.read_exact(&mut remaining[..length - 1])?;
    for byte in &remaining[..length - 1] {
        value = (value << 8) | u64::from(*byte);
    }
    Ok((value, length))
}

/// Read an element id including its length marker.
pub fn read_element_id<R: Read + Seek>(reader: &mut R) -> Result<(u32, usize)> {
    let offset = reader.stream_position()?;
    let mut first_byte = [0u8; 1];
    reader.read_exact(&mut first_byte)?;
    let length = vint_length_of_first_byte(first_byte[0], MAX_ID_LENGTH)
        .ok_or(EbmlError::InvalidElementId { offset })?;
    let mut id = u32::from(first_byte[0]);
    let mut remaining = [0u8; MAX_ID_LENGTH - 1];
    reader.read_exact(&mut remaining[..length - 1])?;
    for byte in &remaining[..length - 1] {
        id = (id << 8) | u32::from(*byte);
    }
    Ok((id, length))
}

/// Read an element size, `None` if unknown.
pub fn read_element_size<R: Read + Seek>(reader: &mut R) -> Result<(Option<u64>, usize)> {
    let (value, length) = read_vint(reader)?;
    if value == unknown_size_marker(length) {
        Ok((None, length))
    } else {
        Ok((Some(value), length))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    pub id: u32,

    /// Absolute offset of the first byte of the id.
    pub offset: u64,

    pub id_length: usize,
    pub size_length: usize,

    /// `None` if unknown.
    pub size: Option<u64>,
}

impl ElementHeader {
    /// Read the header at the current position.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let offset = reader.stream_position()?;
        let (id, id_length) = read_element_id(reader)?;
        let (size, size_length) = read_element_size(reader)?;
        Ok(Self {
            id,
            offset,
            id_length,
            size_length,
            size,
        })
    }

    /// Read the header at an absolute offset.
    pub fn read_at<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<Self> {
        reader.seek(SeekFrom::Start(offset))?;
        Self::read(reader)
    }

    #[must_use]
    pub const fn header_size(&self) -> u64 {
        (self.id_length + self.size_length) as u64
    }

    #[must_use]
    pub const fn size_offset(&self) -> u64 {
        self.offset + self.id_length as u64
    }

    #[must_use]
    pub const fn data_offset(&self) -> u64 {
        self.offset + self.header_size()
    }

    /// Offset of the first byte after the element.
    #[must_use]
    pub fn end_offset(&self) -> Option<u64> {
        self.size.map(|size| self.data_offset() + size)
    }

    /// Total size including the header.
    #[must_use]
    pub fn total_size(&self) -> Option<u64> {
        self.size.map(|size| self.header_size() + size)
    }

    /// Load the data of the element into memory.
    pub fn read_data<R: Read + Seek>(&self, reader: &mut R) -> Result<Vec<u8>> {
        let size = self.size.ok_or(EbmlError::UnknownSize {
            id: self.id,
            offset: self.offset,
        })?;
        if size > MAX_ELEMENT_DATA_SIZE {
            return Err(EbmlError::TooLarge {
                id: self.id,
                offset: self.offset,
            });
        }
        reader.seek(SeekFrom::Start(self.data_offset()))?;
        let mut data = vec![0; size as usize];
        reader.read_exact(&mut data)?;
        Ok(data)
    }
}

/// Read the headers of all children of a master element.
pub fn read_child_headers<R: Read + Seek>(
    reader: &mut R,
    parent: &ElementHeader,
) -> Result<Vec<ElementHeader>> {
    let end = parent.end_offset().ok_or(EbmlError::UnknownSize {
        id: parent.id,
        offset: parent.offset,
    })?;
    let mut headers = Vec::new();
    let mut offset = parent.data_offset();
    while offset < end {
        let header = ElementHeader::read_at(reader, offset)?;
        let Some(child_end) = header.end_offset().filter(|child_end| *child_end <= end) else {
            return Err(EbmlError::Overflow {
                id: header.id,
                offset: header.offset,
            });
        };
        headers.push(header);
        offset = child_end;
    }
    Ok(headers)
}

/// Split the data of a master element into its children.
///
/// Returns the id and the data of each child.
pub fn parse_children(data: &[u8]) -> Result<Vec<(u32, &[u8])>> {
    let mut cursor = Cursor::new(data);
    let mut children = Vec::new();
    while cursor.position() < data.len() as u64 {
        let header = ElementHeader::read(&mut cursor)?;
        let start = header.data_offset();
        let Some(end) = header
            .end_offset()
            .filter(|end| *end <= data.len() as u64)
        else {
            return Err(EbmlError::Overflow {
                id: header.id,
                offset: header.offset,
            });
        };
        children.push((header.id, &data[start as usize..end as usize]));
        cursor.set_position(end);
    }
    Ok(children)
}

/// Decode a big-endian unsigned integer of up to 8 bytes.
#[must_use]
pub fn read_unsigned_int(data: &[u8]) -> u64 {
    data.iter()
        .fold(0u64, |value, byte| (value << 8) | u64::from(*byte))
}

/// Decode a string and drop trailing zero padding.
#[must_use]
pub fn read_string(data: &[u8]) -> String {
    let end = data
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Minimum number of bytes needed to encode a size.
#[must_use]
pub fn vint_length(value: u64) -> usize {
    (1..MAX_VINT_LENGTH)
        .find(|length| value < unknown_size_marker(*length))
        .unwrap_or(MAX_VINT_LENGTH)
}

/// Encode a size with a fixed number of bytes.
pub fn encode_vint_with_length(value: u64, length: usize) -> Result<Vec<u8>> {
    if !(1..=MAX_VINT_LENGTH).contains(&length) || value >= unknown_size_marker(length) {
        return Err(EbmlError::ValueTooLarge { value, length });
    }
    let mut bytes = value.to_be_bytes()[MAX_VINT_LENGTH - length..].to_vec();
    bytes[0] |= 0x80 >> (length - 1);
    Ok(bytes)
}

fn push_size(out: &mut Vec<u8>, size: u64) {
    let length = vint_length(size);
    let mut bytes = size.to_be_bytes();
    let encoded = &mut bytes[MAX_VINT_LENGTH - length..];
    encoded[0] |= 0x80 >> (length - 1);
    out.extend_from_slice(encoded);
}

fn push_id(out: &mut Vec<u8>, id: u32) {
    let bytes = id.to_be_bytes();
    let start = bytes.iter().position(|byte| *byte != 0).unwrap_or(3);
    out.extend_from_slice(&bytes[start..]);
}

/// Encode an element with the given data.
#[must_use]
pub fn binary_element(id: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    push_id(&mut out, id);
    push_size(&mut out, data.len() as u64);
    out.extend_from_slice(data);
    out
}

#[must_use]
pub fn master_element(id: u32, children: &[u8]) -> Vec<u8> {
    binary_element(id, children)
}

#[must_use]
pub fn string_element(id: u32, value: &str) -> Vec<u8> {
    binary_element(id, value.as_bytes())
}

#[must_use]
pub fn unsigned_int_element(id: u32, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(bytes.len() - 1);
    binary_element(id, &bytes[start..])
}

/// Header of a `Void` element that covers `total_size` bytes.
///
/// The bytes following the header are left as they are.
pub fn void_header(total_size: u64) -> Result<Vec<u8>> {
    if total_size < 2 {
        return Err(EbmlError::ValueTooLarge {
            value: total_size,
            length: 1,
        });
    }
    let size_length = (total_size - 1).min(MAX_VINT_LENGTH as u64) as usize;
    let data_size = total_size - 1 - size_length as u64;
    let mut out = Vec::with_capacity(1 + size_length);
    push_id(&mut out, ids::VOID);
    out.extend(encode_vint_with_length(data_size, size_length)?);
    Ok(out)
}

#[cfg(test)]
mod tests;
