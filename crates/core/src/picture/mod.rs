// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Container-independent representation of embedded pictures
//! and file attachments.

use std::fmt;

use image::GenericImageView as _;

use crate::frame::{
    Field, FieldId, FieldList, FieldValue, Frame, FrameIndex, FrameType, TextEncoding,
};

/// The `APIC` picture type code as defined by `ID3v2`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::FromRepr, strum::EnumIter,
)]
#[repr(u8)]
pub enum PictureType {
    Other = 0x00,
    PngIcon = 0x01,
    Icon = 0x02,
    #[default]
    CoverFront = 0x03,
    CoverBack = 0x04,
    Leaflet = 0x05,
    Media = 0x06,
    LeadArtist = 0x07,
    Artist = 0x08,
    Conductor = 0x09,
    Band = 0x0A,
    Composer = 0x0B,
    Lyricist = 0x0C,
    RecordingLocation = 0x0D,
    DuringRecording = 0x0E,
    DuringPerformance = 0x0F,
    VideoCapture = 0x10,
    Fish = 0x11,
    Illustration = 0x12,
    BandLogo = 0x13,
    PublisherLogo = 0x14,
}

impl PictureType {
    /// Short name used in native keys, e.g. `COVER ART (FRONT)`.
    #[must_use]
    pub const fn as_key_str(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::PngIcon => "Png Icon",
            Self::Icon => "Icon",
            Self::CoverFront => "Front",
            Self::CoverBack => "Back",
            Self::Leaflet => "Leaflet",
            Self::Media => "Media",
            Self::LeadArtist => "Lead Artist",
            Self::Artist => "Artist",
            Self::Conductor => "Conductor",
            Self::Band => "Band",
            Self::Composer => "Composer",
            Self::Lyricist => "Lyricist",
            Self::RecordingLocation => "Recording Location",
            Self::DuringRecording => "During Recording",
            Self::DuringPerformance => "During Performance",
            Self::VideoCapture => "Video Capture",
            Self::Fish => "Fish",
            Self::Illustration => "Illustration",
            Self::BandLogo => "Band Logotype",
            Self::PublisherLogo => "Publisher Logotype",
        }
    }

    /// Case-insensitive inverse of [`PictureType::as_key_str()`].
    ///
    /// Unrecognized names result in [`PictureType::Other`].
    #[must_use]
    pub fn from_key_str(key_str: &str) -> Self {
        use strum::IntoEnumIterator as _;
        Self::iter()
            .find(|picture_type| picture_type.as_key_str().eq_ignore_ascii_case(key_str))
            .unwrap_or(Self::Other)
    }

    #[must_use]
    pub fn from_code(code: i64) -> Self {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or(Self::Other)
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PictureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key_str())
    }
}

pub type ImageDigest = [u8; 32];

/// Properties of an image as stored in a FLAC picture block.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageProperties {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_colors: u32,
    digest: Option<ImageDigest>,
}

impl ImageProperties {
    /// Declared properties for the given image data.
    #[must_use]
    pub fn new(width: u32, height: u32, depth: u32, num_colors: u32, data: &[u8]) -> Self {
        Self {
            width,
            height,
            depth,
            num_colors,
            digest: Some(digest_image_data(data)),
        }
    }

    /// Decode the image to determine its properties.
    ///
    /// Returns null properties if the data could not be decoded.
    #[must_use]
    pub fn from_image_data(data: &[u8]) -> Self {
        match image::load_from_memory(data) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let depth = u32::from(image.color().bits_per_pixel());
                Self::new(width, height, depth, 0, data)
            }
            Err(err) => {
                log::debug!("Failed to determine image properties: {err}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.width == 0
            && self.height == 0
            && self.depth == 0
            && self.num_colors == 0
            && self.digest.is_none()
    }

    /// Check if these properties still describe the given data.
    #[must_use]
    pub fn is_valid_for_image(&self, data: &[u8]) -> bool {
        !self.is_null() && self.digest == Some(digest_image_data(data))
    }
}

fn digest_image_data(data: &[u8]) -> ImageDigest {
    blake3::hash(data).into()
}

pub const DEFAULT_IMAGE_FORMAT: &str = "JPG";

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// All properties of a picture frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PictureFields {
    pub text_encoding: TextEncoding,
    pub image_format: String,
    pub mime_type: String,
    pub picture_type: PictureType,
    pub description: String,
    pub data: Vec<u8>,
    pub image_properties: Option<ImageProperties>,
}

impl Default for PictureFields {
    fn default() -> Self {
        Self {
            text_encoding: TextEncoding::default(),
            image_format: DEFAULT_IMAGE_FORMAT.to_owned(),
            mime_type: DEFAULT_MIME_TYPE.to_owned(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: Vec::new(),
            image_properties: None,
        }
    }
}

impl PictureFields {
    /// Collect the picture fields of a frame, using defaults for
    /// missing fields.
    #[must_use]
    pub fn from_frame(frame: &Frame) -> Self {
        let mut fields = Self::default();
        for Field { id, value } in frame.field_list() {
            match id {
                FieldId::TextEnc => fields.text_encoding = TextEncoding::from_field_value(value),
                FieldId::ImageFormat => fields.image_format = value.to_text().into_owned(),
                FieldId::MimeType => fields.mime_type = value.to_text().into_owned(),
                FieldId::PictureType => {
                    fields.picture_type = value.to_int().map_or(PictureType::Other, PictureType::from_code);
                }
                FieldId::Description => fields.description = value.to_text().into_owned(),
                FieldId::Data => fields.data = value.as_bytes().map(<[u8]>::to_vec).unwrap_or_default(),
                FieldId::ImageProperties => {
                    if let FieldValue::ImageProperties(image_properties) = value {
                        fields.image_properties = Some(*image_properties);
                    }
                }
                _ => {
                    log::debug!("Ignoring unexpected picture field {id:?}");
                }
            }
        }
        fields
    }

    /// Fields in canonical order.
    #[must_use]
    pub fn to_field_list(&self) -> FieldList {
        let mut field_list = vec![
            Field::new(FieldId::TextEnc, self.text_encoding),
            Field::new(FieldId::ImageFormat, self.image_format.as_str()),
            Field::new(FieldId::MimeType, self.mime_type.as_str()),
            Field::new(FieldId::PictureType, i64::from(self.picture_type.code())),
            Field::new(FieldId::Description, self.description.as_str()),
            Field::new(FieldId::Data, self.data.clone()),
        ];
        if let Some(image_properties) = self.image_properties.filter(|props| !props.is_null()) {
            field_list.push(Field::new(
                FieldId::ImageProperties,
                FieldValue::ImageProperties(image_properties),
            ));
        }
        field_list
    }

    /// Replace the field list of a frame.
    pub fn apply_to(&self, frame: &mut Frame) {
        frame.set_field_list(self.to_field_list());
    }

    /// Create a new picture frame.
    ///
    /// The description is used as value.
    #[must_use]
    pub fn into_frame(self, internal_name: impl Into<String>, index: FrameIndex) -> Frame {
        let mut frame = Frame::new(
            FrameType::Picture,
            self.description.clone(),
            internal_name,
            index,
        );
        self.apply_to(&mut frame);
        frame
    }

    /// Image properties that are valid for the current data,
    /// recomputed only if needed.
    #[must_use]
    pub fn valid_image_properties(&self) -> ImageProperties {
        match self.image_properties {
            Some(image_properties) if image_properties.is_valid_for_image(&self.data) => {
                image_properties
            }
            _ => ImageProperties::from_image_data(&self.data),
        }
    }

    /// Compare all fields except the image properties.
    #[must_use]
    pub fn eq_ignoring_image_properties(&self, other: &Self) -> bool {
        self.data == other.data
            && self.description == other.description
            && self.mime_type == other.mime_type
            && self.picture_type == other.picture_type
            && self.image_format == other.image_format
            && self.text_encoding == other.text_encoding
    }
}

/// Check if the picture fields of two frames are equal.
#[must_use]
pub fn are_picture_fields_equal(lhs: &Frame, rhs: &Frame) -> bool {
    PictureFields::from_frame(lhs).eq_ignoring_image_properties(&PictureFields::from_frame(rhs))
}

/// Fields of a general encapsulated object, i.e. a file attachment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectFields {
    pub text_encoding: TextEncoding,
    pub mime_type: String,
    pub filename: String,
    pub description: String,
    pub data: Vec<u8>,
}

impl ObjectFields {
    #[must_use]
    pub fn from_frame(frame: &Frame) -> Self {
        let mut fields = Self::default();
        for Field { id, value } in frame.field_list() {
            match id {
                FieldId::TextEnc => fields.text_encoding = TextEncoding::from_field_value(value),
                FieldId::MimeType => fields.mime_type = value.to_text().into_owned(),
                FieldId::Filename => fields.filename = value.to_text().into_owned(),
                FieldId::Description => fields.description = value.to_text().into_owned(),
                FieldId::Data => fields.data = value.as_bytes().map(<[u8]>::to_vec).unwrap_or_default(),
                _ => (),
            }
        }
        fields
    }

    #[must_use]
    pub fn to_field_list(&self) -> FieldList {
        vec![
            Field::new(FieldId::TextEnc, self.text_encoding),
            Field::new(FieldId::MimeType, self.mime_type.as_str()),
            Field::new(FieldId::Filename, self.filename.as_str()),
            Field::new(FieldId::Description, self.description.as_str()),
            Field::new(FieldId::Data, self.data.clone()),
        ]
    }
}
