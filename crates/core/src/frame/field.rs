// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::borrow::Cow;

use strum::FromRepr;

use crate::picture::ImageProperties;

/// Identifies a field within a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum FieldId {
    TextEnc = 1,
    Text,
    Url,
    Data,
    Description,
    Owner,
    Email,
    Rating,
    Filename,
    Language,
    PictureType,
    ImageFormat,
    MimeType,
    Counter,
    Id,
    VolumeAdj,
    NumBits,
    VolChgRight,
    VolChgLeft,
    PeakVolRight,
    PeakVolLeft,
    TimestampFormat,
    ContentType,
    Price,
    Date,
    Seller,
    ImageProperties,
    TargetType,
    Default,
}

impl FieldId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextEnc => "Text Encoding",
            Self::Text => "Text",
            Self::Url => "URL",
            Self::Data => "Data",
            Self::Description => "Description",
            Self::Owner => "Owner",
            Self::Email => "Email",
            Self::Rating => "Rating",
            Self::Filename => "Filename",
            Self::Language => "Language",
            Self::PictureType => "Picture Type",
            Self::ImageFormat => "Image format",
            Self::MimeType => "Mimetype",
            Self::Counter => "Counter",
            Self::Id => "Identifier",
            Self::VolumeAdj => "Volume Adjustment",
            Self::NumBits => "Number of Bits",
            Self::VolChgRight => "Volume Change Right",
            Self::VolChgLeft => "Volume Change Left",
            Self::PeakVolRight => "Peak Volume Right",
            Self::PeakVolLeft => "Peak Volume Left",
            Self::TimestampFormat => "Timestamp Format",
            Self::ContentType => "Content Type",
            Self::Price => "Price",
            Self::Date => "Date",
            Self::Seller => "Seller",
            Self::ImageProperties => "Image Properties",
            Self::TargetType => "Target Type",
            Self::Default => "Default",
        }
    }
}

/// Text encoding of string fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum TextEncoding {
    #[default]
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16Be = 2,
    Utf8 = 3,
}

impl TextEncoding {
    #[must_use]
    pub fn from_field_value(value: &FieldValue) -> Self {
        value
            .to_int()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(Self::from_repr)
            .unwrap_or_default()
    }
}

impl From<TextEncoding> for FieldValue {
    fn from(from: TextEncoding) -> Self {
        Self::Int(from as i64)
    }
}

/// Typed value of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
    ImageProperties(ImageProperties),
}

impl FieldValue {
    /// Lenient integer conversion, parsing text if needed.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Int(value) => Cow::Owned(value.to_string()),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
            Self::List(_) | Self::ImageProperties(_) => Cow::Borrowed(""),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(from: &str) -> Self {
        Self::Text(from.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(from: String) -> Self {
        Self::Text(from)
    }
}

impl From<i64> for FieldValue {
    fn from(from: i64) -> Self {
        Self::Int(from)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(from: Vec<u8>) -> Self {
        Self::Bytes(from)
    }
}

impl From<bool> for FieldValue {
    fn from(from: bool) -> Self {
        Self::Int(i64::from(from))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub value: FieldValue,
}

impl Field {
    #[must_use]
    pub fn new(id: FieldId, value: impl Into<FieldValue>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

pub type FieldList = Vec<Field>;
