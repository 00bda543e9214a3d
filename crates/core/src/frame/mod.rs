// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Container-independent representation of tag entries.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

mod custom;
pub use self::custom::{CustomFrameNames, NUM_CUSTOM_FRAMES};

mod field;
pub use self::field::{Field, FieldId, FieldList, FieldValue, TextEncoding};

mod filter;
pub use self::filter::FrameFilter;

/// Semantic type of a frame.
///
/// The standard types are followed by a small range of user-defined
/// custom types. Everything else is mapped to [`FrameType::Other`]
/// and identified by its internal name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameType {
    Title,
    Artist,
    Album,
    Comment,
    Date,
    Track,
    Genre,
    AlbumArtist,
    Arranger,
    Author,
    Bpm,
    CatalogNumber,
    Compilation,
    Composer,
    Conductor,
    Copyright,
    Disc,
    EncodedBy,
    EncoderSettings,
    EncodingTime,
    Grouping,
    InitialKey,
    Isrc,
    Language,
    Lyricist,
    Lyrics,
    Media,
    Mood,
    OriginalAlbum,
    OriginalArtist,
    OriginalDate,
    Description,
    Performer,
    Picture,
    Publisher,
    ReleaseCountry,
    Remixer,
    SortAlbum,
    SortAlbumArtist,
    SortArtist,
    SortComposer,
    SortName,
    Subtitle,
    Website,
    WwwAudioFile,
    WwwAudioSource,
    ReleaseDate,
    Rating,
    Work,
    /// User-defined custom type, `0..NUM_CUSTOM_FRAMES`
    Custom(u8),
    Other,
    #[default]
    Unknown,
}

pub const NUM_STANDARD_FRAMES: usize = 49;

impl FrameType {
    pub const STANDARD: [Self; NUM_STANDARD_FRAMES] = [
        Self::Title,
        Self::Artist,
        Self::Album,
        Self::Comment,
        Self::Date,
        Self::Track,
        Self::Genre,
        Self::AlbumArtist,
        Self::Arranger,
        Self::Author,
        Self::Bpm,
        Self::CatalogNumber,
        Self::Compilation,
        Self::Composer,
        Self::Conductor,
        Self::Copyright,
        Self::Disc,
        Self::EncodedBy,
        Self::EncoderSettings,
        Self::EncodingTime,
        Self::Grouping,
        Self::InitialKey,
        Self::Isrc,
        Self::Language,
        Self::Lyricist,
        Self::Lyrics,
        Self::Media,
        Self::Mood,
        Self::OriginalAlbum,
        Self::OriginalArtist,
        Self::OriginalDate,
        Self::Description,
        Self::Performer,
        Self::Picture,
        Self::Publisher,
        Self::ReleaseCountry,
        Self::Remixer,
        Self::SortAlbum,
        Self::SortAlbumArtist,
        Self::SortArtist,
        Self::SortComposer,
        Self::SortName,
        Self::Subtitle,
        Self::Website,
        Self::WwwAudioFile,
        Self::WwwAudioSource,
        Self::ReleaseDate,
        Self::Rating,
        Self::Work,
    ];

    /// The last type that is supported by `ID3v1`.
    pub const LAST_V1: Self = Self::Genre;

    /// Position in the enumeration.
    ///
    /// Standard types come first, followed by the custom range,
    /// [`FrameType::Other`] and [`FrameType::Unknown`].
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Self::Custom(index) => NUM_STANDARD_FRAMES + usize::from(index),
            Self::Other => NUM_STANDARD_FRAMES + NUM_CUSTOM_FRAMES,
            Self::Unknown => NUM_STANDARD_FRAMES + NUM_CUSTOM_FRAMES + 1,
            standard => Self::STANDARD
                .iter()
                .position(|frame_type| *frame_type == standard)
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if let Some(standard) = Self::STANDARD.get(ordinal) {
            return Some(*standard);
        }
        match ordinal - NUM_STANDARD_FRAMES {
            custom if custom < NUM_CUSTOM_FRAMES => Some(Self::Custom(custom as u8)),
            NUM_CUSTOM_FRAMES => Some(Self::Other),
            _ if ordinal == NUM_STANDARD_FRAMES + NUM_CUSTOM_FRAMES + 1 => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }

    #[must_use]
    pub const fn is_standard(self) -> bool {
        !matches!(self, Self::Custom(_) | Self::Other | Self::Unknown)
    }

    /// All custom types in ascending order.
    pub fn custom_types() -> impl Iterator<Item = Self> {
        (0..NUM_CUSTOM_FRAMES as u8).map(Self::Custom)
    }

    /// English display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::Comment => "Comment",
            Self::Date => "Date",
            Self::Track => "Track Number",
            Self::Genre => "Genre",
            Self::AlbumArtist => "Album Artist",
            Self::Arranger => "Arranger",
            Self::Author => "Author",
            Self::Bpm => "BPM",
            Self::CatalogNumber => "Catalog Number",
            Self::Compilation => "Compilation",
            Self::Composer => "Composer",
            Self::Conductor => "Conductor",
            Self::Copyright => "Copyright",
            Self::Disc => "Disc Number",
            Self::EncodedBy => "Encoded-by",
            Self::EncoderSettings => "Encoder Settings",
            Self::EncodingTime => "Encoding Time",
            Self::Grouping => "Grouping",
            Self::InitialKey => "Initial Key",
            Self::Isrc => "ISRC",
            Self::Language => "Language",
            Self::Lyricist => "Lyricist",
            Self::Lyrics => "Lyrics",
            Self::Media => "Media",
            Self::Mood => "Mood",
            Self::OriginalAlbum => "Original Album",
            Self::OriginalArtist => "Original Artist",
            Self::OriginalDate => "Original Date",
            Self::Description => "Description",
            Self::Performer => "Performer",
            Self::Picture => "Picture",
            Self::Publisher => "Publisher",
            Self::ReleaseCountry => "Release Country",
            Self::Remixer => "Remixer",
            Self::SortAlbum => "Sort Album",
            Self::SortAlbumArtist => "Sort Album Artist",
            Self::SortArtist => "Sort Artist",
            Self::SortComposer => "Sort Composer",
            Self::SortName => "Sort Name",
            Self::Subtitle => "Subtitle",
            Self::Website => "Website",
            Self::WwwAudioFile => "WWW Audio File",
            Self::WwwAudioSource => "WWW Audio Source",
            Self::ReleaseDate => "Release Date",
            Self::Rating => "Rating",
            Self::Work => "Work",
            Self::Custom(_) => "Custom",
            Self::Other | Self::Unknown => "Unknown",
        }
    }

    /// Look up a standard type by its display name, ignoring case.
    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::STANDARD
            .iter()
            .copied()
            .find(|frame_type| frame_type.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(index) => write!(f, "Custom {}", index + 1),
            _ => f.write_str(self.display_name()),
        }
    }
}

/// The identity of a frame: semantic type and internal name.
///
/// Equality only takes the internal name into account for
/// [`FrameType::Other`]. All frames of the same standard or
/// custom type are considered equal regardless of how the
/// container spells them.
#[derive(Clone, Debug, Default)]
pub struct ExtendedType {
    frame_type: FrameType,
    internal_name: String,
}

impl ExtendedType {
    #[must_use]
    pub fn new(frame_type: FrameType, internal_name: impl Into<String>) -> Self {
        Self {
            frame_type,
            internal_name: internal_name.into(),
        }
    }

    #[must_use]
    pub const fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    #[must_use]
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// Display name: the internal name for unrecognized frames.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.frame_type {
            FrameType::Other | FrameType::Unknown => &self.internal_name,
            frame_type => frame_type.display_name(),
        }
    }

    fn compares_names(&self) -> bool {
        matches!(self.frame_type, FrameType::Other)
    }
}

impl PartialEq for ExtendedType {
    fn eq(&self, other: &Self) -> bool {
        self.frame_type == other.frame_type
            && (!self.compares_names() || self.internal_name == other.internal_name)
    }
}

impl Eq for ExtendedType {}

impl Hash for ExtendedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.frame_type.hash(state);
        if self.compares_names() {
            self.internal_name.hash(state);
        }
    }
}

impl PartialOrd for ExtendedType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtendedType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frame_type.cmp(&other.frame_type).then_with(|| {
            if self.compares_names() {
                self.internal_name.cmp(&other.internal_name)
            } else {
                Ordering::Equal
            }
        })
    }
}

/// Position of a frame within the tag it has been read from.
///
/// An index is only a correlation id for a single snapshot of
/// frames. It must be considered stale after any frame has been
/// added to or deleted from the tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrameIndex {
    /// Not (yet) stored in the tag
    #[default]
    Unpositioned,

    /// Position of an item in the native key/value collection
    Native(usize),

    /// Position in the cache of extra frames (pictures, attachments, chapters)
    Extra(usize),
}

impl FrameIndex {
    pub const UNPOSITIONED_RAW: i32 = -1;

    /// Signed encoding, `-1` for unpositioned and `-2 - i` for
    /// extra frames.
    #[must_use]
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Unpositioned => Self::UNPOSITIONED_RAW,
            Self::Native(index) => i32::try_from(index).unwrap_or(i32::MAX),
            Self::Extra(index) => -2 - i32::try_from(index).unwrap_or(i32::MAX - 2),
        }
    }

    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::UNPOSITIONED_RAW => Self::Unpositioned,
            native @ 0.. => Self::Native(native as usize),
            extra => Self::Extra((-2 - extra) as usize),
        }
    }

    #[must_use]
    pub const fn native(self) -> Option<usize> {
        match self {
            Self::Native(index) => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extra(self) -> Option<usize> {
        match self {
            Self::Extra(index) => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Unpositioned)
    }
}

/// A single tag entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    extended_type: ExtendedType,
    value: String,
    field_list: FieldList,
    index: FrameIndex,
    value_changed: bool,
}

impl Frame {
    #[must_use]
    pub fn new(
        frame_type: FrameType,
        value: impl Into<String>,
        internal_name: impl Into<String>,
        index: FrameIndex,
    ) -> Self {
        Self::with_extended_type(ExtendedType::new(frame_type, internal_name), value, index)
    }

    #[must_use]
    pub fn with_extended_type(
        extended_type: ExtendedType,
        value: impl Into<String>,
        index: FrameIndex,
    ) -> Self {
        Self {
            extended_type,
            value: value.into(),
            field_list: Vec::new(),
            index,
            value_changed: false,
        }
    }

    #[must_use]
    pub const fn frame_type(&self) -> FrameType {
        self.extended_type.frame_type
    }

    pub fn set_frame_type(&mut self, frame_type: FrameType) {
        self.extended_type.frame_type = frame_type;
    }

    #[must_use]
    pub const fn extended_type(&self) -> &ExtendedType {
        &self.extended_type
    }

    pub fn set_extended_type(&mut self, extended_type: ExtendedType) {
        self.extended_type = extended_type;
    }

    #[must_use]
    pub fn internal_name(&self) -> &str {
        &self.extended_type.internal_name
    }

    pub fn set_internal_name(&mut self, internal_name: impl Into<String>) {
        self.extended_type.internal_name = internal_name.into();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.extended_type.name()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Replace the value and mark the frame as changed, but only if
    /// the value actually differs.
    pub fn set_value_if_changed(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_owned();
            self.value_changed = true;
        }
    }

    #[must_use]
    pub const fn is_value_changed(&self) -> bool {
        self.value_changed
    }

    pub fn set_value_changed(&mut self, value_changed: bool) {
        self.value_changed = value_changed;
    }

    #[must_use]
    pub const fn index(&self) -> FrameIndex {
        self.index
    }

    pub fn set_index(&mut self, index: FrameIndex) {
        self.index = index;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    #[must_use]
    pub fn field_list(&self) -> &[Field] {
        &self.field_list
    }

    pub fn field_list_mut(&mut self) -> &mut FieldList {
        &mut self.field_list
    }

    pub fn set_field_list(&mut self, field_list: FieldList) {
        self.field_list = field_list;
    }

    #[must_use]
    pub fn field_value(&self, id: FieldId) -> Option<&FieldValue> {
        self.field_list
            .iter()
            .find(|field| field.id == id)
            .map(|field| &field.value)
    }

    /// Replace the value of the first field with `id`.
    ///
    /// Setting the description also updates the display value.
    /// Returns `false` if the frame has no such field.
    pub fn set_field(&mut self, id: FieldId, value: FieldValue) -> bool {
        let Some(field) = self.field_list.iter_mut().find(|field| field.id == id) else {
            return false;
        };
        if id == FieldId::Description {
            self.value = value.to_text().into_owned();
        }
        field.value = value;
        true
    }

    /// Set the display value from the text, description or URL field.
    ///
    /// The text field takes precedence.
    pub fn set_value_from_field_list(&mut self) {
        for field in &self.field_list {
            if matches!(
                field.id,
                FieldId::Text | FieldId::Description | FieldId::Url
            ) {
                self.value = field.value.to_text().into_owned();
                if field.id == FieldId::Text {
                    break;
                }
            }
        }
    }

    /// Copy the display value into the text, description or URL field.
    pub fn set_field_list_from_value(&mut self) {
        let mut target = None;
        for (pos, field) in self.field_list.iter_mut().enumerate() {
            match field.id {
                FieldId::Text => {
                    target = Some(pos);
                    break;
                }
                FieldId::Description | FieldId::Url => {
                    target = Some(pos);
                }
                FieldId::Rating => {
                    if let Ok(rating) = self.value.trim().parse::<i64>() {
                        field.value = FieldValue::Int(rating);
                        break;
                    }
                }
                _ => (),
            }
        }
        if let Some(pos) = target {
            self.field_list[pos].value = FieldValue::Text(self.value.clone());
        }
    }

    /// Compare type, value and all fields in order.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        self.frame_type() == other.frame_type()
            && self.value == other.value
            && self.field_list == other.field_list
    }
}

/// Frames of a tag in the order of the native container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameCollection {
    frames: Vec<Frame>,
}

impl FrameCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// First frame with a matching extended type.
    #[must_use]
    pub fn find(&self, extended_type: &ExtendedType) -> Option<&Frame> {
        self.frames
            .iter()
            .find(|frame| frame.extended_type() == extended_type)
    }

    #[must_use]
    pub fn find_by_type(&self, frame_type: FrameType) -> Option<&Frame> {
        self.frames
            .iter()
            .find(|frame| frame.frame_type() == frame_type)
    }

    #[must_use]
    pub fn find_by_name(&self, internal_name: &str) -> Option<&Frame> {
        self.frames
            .iter()
            .find(|frame| frame.internal_name() == internal_name)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Frame> {
        self.frames
    }
}

impl From<Vec<Frame>> for FrameCollection {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl IntoIterator for FrameCollection {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameCollection {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl Extend<Frame> for FrameCollection {
    fn extend<T: IntoIterator<Item = Frame>>(&mut self, iter: T) {
        self.frames.extend(iter);
    }
}
