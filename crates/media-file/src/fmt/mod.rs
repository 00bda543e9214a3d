// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tag format adapters.
//!
//! Each adapter translates between [`Frame`]s and one kind of native
//! tag. File level operations are dispatched by [`FormatSupport`],
//! frame level operations by the variant of the bound [`NativeTag`].

use tagweave_core::{
    frame::{CustomFrameNames, FieldId, FieldValue, Frame, FrameCollection, FrameFilter, FrameIndex, FrameType},
    picture::are_picture_fields_equal,
};

use crate::{
    config::TagConfig,
    native::{AudioProperties, NativeFile, NativeTag, NativeTagKind},
};

pub use crate::native::ContainerKind;

pub mod ape;
pub mod generic;
pub mod matroska;
pub mod mp4;
pub mod riff;
pub mod vorbis;

/// One of up to three tags that a file may carry at the same time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagSlot {
    /// e.g. `ID3v1`
    Legacy,
    Primary,
    /// e.g. the RIFF INFO chunk of a WAV file
    Secondary,
}

impl TagSlot {
    pub const ALL: [Self; 3] = [Self::Legacy, Self::Primary, Self::Secondary];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Legacy => 0,
            Self::Primary => 1,
            Self::Secondary => 2,
        }
    }
}

/// Settings shared by all adapter operations on a file.
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    pub config: &'a TagConfig,
    pub custom_frames: &'a CustomFrameNames,

    /// Total number of tracks of the album, if known.
    pub total_number_of_tracks: Option<u32>,
}

/// Result of a single frame operation on a native tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mutation {
    /// The operation is not supported or the frame was not found.
    Rejected,
    Unchanged,
    Modified,
}

impl Mutation {
    pub(crate) const fn from_modified(modified: bool) -> Self {
        if modified {
            Self::Modified
        } else {
            Self::Unchanged
        }
    }

    pub(crate) fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Modified, _) | (_, Self::Modified) => Self::Modified,
            (Self::Unchanged, _) | (_, Self::Unchanged) => Self::Unchanged,
            (Self::Rejected, Self::Rejected) => Self::Rejected,
        }
    }
}

/// Frames that are not stored as key/value items of the native tag,
/// e.g. pictures, attachments and chapters.
///
/// Populated only once per open file. Frames are addressed by
/// [`FrameIndex::Extra`] and their indices are kept contiguous.
#[derive(Clone, Debug, Default)]
pub struct ExtraFrames {
    frames: Vec<Frame>,
    read: bool,
}

impl ExtraFrames {
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
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

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Populate the cache, unless it has already been read.
    pub(crate) fn populate(&mut self, frames: impl IntoIterator<Item = Frame>) -> bool {
        if self.read {
            return false;
        }
        self.frames = frames.into_iter().collect();
        self.renumber(0);
        self.read = true;
        true
    }

    /// Discard all frames and allow populating the cache again.
    pub(crate) fn reset(&mut self) {
        self.frames.clear();
        self.read = false;
    }

    /// Replace an existing frame, skipping unchanged fields.
    pub(crate) fn set(&mut self, frame: &mut Frame) -> Mutation {
        let Some(index) = frame.index().extra() else {
            return Mutation::Rejected;
        };
        let Some(existing) = self.frames.get_mut(index) else {
            return Mutation::Rejected;
        };
        sync_description_from_value(frame);
        let unchanged = if frame.frame_type() == FrameType::Picture {
            existing.frame_type() == FrameType::Picture
                && existing.value() == frame.value()
                && are_picture_fields_equal(existing, frame)
        } else {
            existing.is_equal(frame)
        };
        if unchanged {
            return Mutation::Unchanged;
        }
        *existing = frame.clone();
        existing.set_value_changed(false);
        Mutation::Modified
    }

    /// Append a frame and assign its index.
    pub(crate) fn push(&mut self, frame: &mut Frame) -> FrameIndex {
        sync_description_from_value(frame);
        let index = FrameIndex::Extra(self.frames.len());
        frame.set_index(index);
        let mut cached = frame.clone();
        cached.set_value_changed(false);
        self.frames.push(cached);
        index
    }

    /// Remove a frame, renumbering all subsequent frames.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Frame> {
        if index >= self.frames.len() {
            return None;
        }
        let removed = self.frames.remove(index);
        self.renumber(index);
        Some(removed)
    }

    /// Remove all frames that are selected by the filter.
    pub(crate) fn remove_filtered(&mut self, filter: &FrameFilter) -> bool {
        let len_before = self.frames.len();
        self.frames
            .retain(|frame| !filter.is_enabled(frame.frame_type(), frame.internal_name()));
        if self.frames.len() == len_before {
            return false;
        }
        self.renumber(0);
        true
    }

    pub(crate) fn clear(&mut self) -> bool {
        let modified = !self.frames.is_empty();
        self.frames.clear();
        modified
    }

    fn renumber(&mut self, start: usize) {
        for (index, frame) in self.frames.iter_mut().enumerate().skip(start) {
            frame.set_index(FrameIndex::Extra(index));
        }
    }
}

/// Picture descriptions are edited through the frame value.
fn sync_description_from_value(frame: &mut Frame) {
    if frame.is_value_changed() {
        let value = frame.value().to_owned();
        frame.set_field(FieldId::Description, FieldValue::Text(value));
    }
}

/// State of one slot of an open file.
#[derive(Clone, Debug, Default)]
pub struct SlotState {
    binding: Option<NativeTagKind>,
    extra_frames: ExtraFrames,
    changed: bool,
}

impl SlotState {
    #[must_use]
    pub const fn binding(&self) -> Option<NativeTagKind> {
        self.binding
    }

    #[must_use]
    pub const fn extra_frames(&self) -> &ExtraFrames {
        &self.extra_frames
    }

    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }
}

/// Bindings of all slots of an open file.
#[derive(Clone, Debug, Default)]
pub struct TagState {
    slots: [SlotState; 3],
}

impl TagState {
    #[must_use]
    pub fn slot(&self, slot: TagSlot) -> &SlotState {
        &self.slots[slot.index()]
    }

    #[must_use]
    pub fn is_bound(&self, slot: TagSlot) -> bool {
        self.slot(slot).binding.is_some()
    }

    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.slots.iter().any(|slot| slot.changed)
    }

    pub fn mark_changed(&mut self, slot: TagSlot) {
        self.slots[slot.index()].changed = true;
    }

    /// All changes have been written.
    pub fn clear_changed(&mut self) {
        for slot in &mut self.slots {
            slot.changed = false;
        }
    }

    pub(crate) fn extra_frames_mut(&mut self, slot: TagSlot) -> &mut ExtraFrames {
        &mut self.slots[slot.index()].extra_frames
    }

    /// Unbind all slots and discard all cached frames.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn bind(&mut self, slot: TagSlot, tag_kind: NativeTagKind) -> bool {
        let state = &mut self.slots[slot.index()];
        if state.binding.is_some() {
            return false;
        }
        log::debug!("Binding {tag_kind:?} tag to {slot:?} slot");
        state.binding = Some(tag_kind);
        true
    }
}

/// Tags that have to be written or removed from a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WritePlan {
    pub save: Vec<NativeTagKind>,
    pub strip: Vec<NativeTagKind>,
}

impl WritePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.save.is_empty() && self.strip.is_empty()
    }
}

/// Outcome of writing a file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The contents of the file have been rewritten.
    pub file_changed: bool,
}

/// The closed set of adapters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatSupport {
    Ape,
    Mp4,
    Matroska,
    Riff,
    Vorbis,
    Generic,
}

impl FormatSupport {
    /// The adapters are tried in this order.
    pub const DISPATCH_ORDER: [Self; 6] = [
        Self::Ape,
        Self::Mp4,
        Self::Matroska,
        Self::Riff,
        Self::Vorbis,
        Self::Generic,
    ];

    /// Upper-case file extensions owned by this adapter.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Ape => ape::EXTENSIONS,
            Self::Mp4 => mp4::EXTENSIONS,
            Self::Matroska => matroska::EXTENSIONS,
            Self::Riff => riff::EXTENSIONS,
            Self::Vorbis => vorbis::EXTENSIONS,
            Self::Generic => generic::EXTENSIONS,
        }
    }

    #[must_use]
    pub fn container_kind_from_extension(self, extension: &str) -> Option<ContainerKind> {
        let extension = extension.trim_start_matches('.').to_uppercase();
        match self {
            Self::Ape => ape::container_kind_from_extension(&extension),
            Self::Mp4 => mp4::container_kind_from_extension(&extension),
            Self::Matroska => matroska::container_kind_from_extension(&extension),
            Self::Riff => riff::container_kind_from_extension(&extension),
            Self::Vorbis => vorbis::container_kind_from_extension(&extension),
            Self::Generic => generic::container_kind_from_extension(&extension),
        }
    }

    /// Construct, but do not yet read, the native file for an extension.
    ///
    /// The first adapter in [`FormatSupport::DISPATCH_ORDER`] that
    /// recognizes the extension wins.
    #[must_use]
    pub fn create_from_extension(extension: &str) -> Option<(Self, NativeFile)> {
        Self::DISPATCH_ORDER.into_iter().find_map(|format_support| {
            let container_kind = format_support.container_kind_from_extension(extension)?;
            log::debug!(
                "Selected {format_support:?} adapter for {container_kind:?} file with extension \
                 \"{extension}\""
            );
            Some((format_support, NativeFile::new(container_kind)))
        })
    }

    /// The adapter that owns a container kind.
    #[must_use]
    pub const fn of_container(container_kind: ContainerKind) -> Self {
        match container_kind {
            ContainerKind::Ape | ContainerKind::Mpc | ContainerKind::WavPack => Self::Ape,
            ContainerKind::Mp4 => Self::Mp4,
            ContainerKind::Matroska => Self::Matroska,
            ContainerKind::Wav | ContainerKind::Aiff => Self::Riff,
            ContainerKind::OggVorbis
            | ContainerKind::Flac
            | ContainerKind::Opus
            | ContainerKind::Speex => Self::Vorbis,
            ContainerKind::Mpeg | ContainerKind::Aac | ContainerKind::TrueAudio => Self::Generic,
        }
    }

    fn slot_tag_kind(self, container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
        match self {
            Self::Ape => ape::slot_tag_kind(container_kind, slot),
            Self::Mp4 => mp4::slot_tag_kind(container_kind, slot),
            Self::Matroska => matroska::slot_tag_kind(container_kind, slot),
            Self::Riff => riff::slot_tag_kind(container_kind, slot),
            Self::Vorbis => vorbis::slot_tag_kind(container_kind, slot),
            Self::Generic => generic::slot_tag_kind(container_kind, slot),
        }
    }

    /// Bind the native tags of a file to their slots.
    ///
    /// Slots that are already bound are left untouched. The extra
    /// frames of each slot are only read once.
    pub fn read_file(self, state: &mut TagState, native: &NativeFile) -> bool {
        let mut bound_any = false;
        for slot in TagSlot::ALL {
            let Some(tag_kind) = self.slot_tag_kind(native.kind(), slot) else {
                continue;
            };
            let Some(tag) = native.tag(tag_kind) else {
                continue;
            };
            state.bind(slot, tag_kind);
            bound_any = true;
            let extra_frames = state.extra_frames_mut(slot);
            if !extra_frames.is_read() {
                extra_frames.populate(read_extra_frames(tag));
            }
        }
        bound_any
    }

    /// Create an empty native tag for a slot that is not yet bound.
    pub fn make_tag_settable(
        self,
        state: &mut TagState,
        native: &mut NativeFile,
        slot: TagSlot,
    ) -> bool {
        let Some(tag_kind) = self.slot_tag_kind(native.kind(), slot) else {
            return false;
        };
        native.ensure_tag(tag_kind);
        state.bind(slot, tag_kind);
        let extra_frames = state.extra_frames_mut(slot);
        if !extra_frames.is_read() {
            // An existing tag has not been read yet
            let frames = native
                .tag(tag_kind)
                .map(read_extra_frames)
                .unwrap_or_default();
            extra_frames.populate(frames);
        }
        true
    }

    /// Decide which tags have to be saved or stripped.
    ///
    /// Only changed slots are considered unless `force` is set. Empty
    /// tags are never written but stripped from the file.
    pub fn write_file(
        self,
        state: &TagState,
        native: &mut NativeFile,
        force: bool,
        context: &TagContext<'_>,
    ) -> WritePlan {
        let mut plan = WritePlan::default();
        for slot in TagSlot::ALL {
            let slot_state = state.slot(slot);
            let Some(tag_kind) = slot_state.binding else {
                continue;
            };
            if !(force || slot_state.changed) {
                continue;
            }
            let Some(tag) = native.tag_mut(tag_kind) else {
                continue;
            };
            prepare_for_write(tag, context);
            if tag.is_empty() {
                log::debug!("Stripping empty {tag_kind:?} tag from {slot:?} slot");
                plan.strip.push(tag_kind);
            } else {
                log::debug!("Saving {tag_kind:?} tag of {slot:?} slot");
                plan.save.push(tag_kind);
            }
        }
        plan
    }
}

/// Human-readable summary of the audio properties.
///
/// The adapters are asked in dispatch order.
#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    FormatSupport::DISPATCH_ORDER
        .into_iter()
        .find_map(|format_support| match format_support {
            FormatSupport::Ape => ape::read_audio_properties(audio_properties),
            FormatSupport::Mp4 => mp4::read_audio_properties(audio_properties),
            FormatSupport::Matroska => matroska::read_audio_properties(audio_properties),
            FormatSupport::Riff => riff::read_audio_properties(audio_properties),
            FormatSupport::Vorbis => vorbis::read_audio_properties(audio_properties),
            FormatSupport::Generic => generic::read_audio_properties(audio_properties),
        })
}

/// Display name of a tag format.
#[must_use]
pub fn tag_format(tag: &NativeTag) -> &'static str {
    match tag {
        NativeTag::Ape(_) => ape::TAG_FORMAT,
        NativeTag::Mp4(_) => mp4::TAG_FORMAT,
        NativeTag::Matroska(_) => matroska::TAG_FORMAT,
        NativeTag::RiffInfo(_) => riff::TAG_FORMAT,
        NativeTag::Xiph(_) => vorbis::TAG_FORMAT,
        NativeTag::Generic(tag) => tag.format(),
    }
}

pub(crate) fn read_extra_frames(tag: &NativeTag) -> Vec<Frame> {
    match tag {
        NativeTag::Ape(tag) => ape::read_extra_frames(tag),
        NativeTag::Mp4(tag) => mp4::read_extra_frames(tag),
        NativeTag::Matroska(tag) => matroska::read_extra_frames(tag),
        NativeTag::RiffInfo(_) => Vec::new(),
        NativeTag::Xiph(tag) => vorbis::read_extra_frames(tag),
        NativeTag::Generic(tag) => generic::read_extra_frames(tag),
    }
}

fn sync_extra_frames(tag: &mut NativeTag, extra_frames: &ExtraFrames) {
    match tag {
        NativeTag::Ape(tag) => ape::sync_extra_frames(tag, extra_frames),
        NativeTag::Mp4(tag) => mp4::sync_extra_frames(tag, extra_frames),
        NativeTag::Matroska(tag) => matroska::sync_extra_frames(tag, extra_frames),
        NativeTag::RiffInfo(_) => (),
        NativeTag::Xiph(tag) => vorbis::sync_extra_frames(tag, extra_frames),
        NativeTag::Generic(tag) => generic::sync_extra_frames(tag, extra_frames),
    }
}

fn prepare_for_write(tag: &mut NativeTag, context: &TagContext<'_>) {
    if !context.config.total_num_tracks {
        return;
    }
    let Some(total) = context.total_number_of_tracks.filter(|total| *total > 0) else {
        return;
    };
    match tag {
        NativeTag::Mp4(tag) => mp4::add_total_number_of_tracks(tag, total),
        NativeTag::Xiph(tag) => vorbis::add_total_number_of_tracks(tag, total),
        _ => (),
    }
}

/// Frames of the basic types are replaced instead of added when
/// they have not been read from the tag.
pub(crate) fn is_replaced_without_index(frame: &Frame) -> bool {
    frame.frame_type() <= FrameType::LAST_V1
}

#[must_use]
pub(crate) fn get_all_frames(
    tag: &NativeTag,
    extra_frames: &ExtraFrames,
    context: &TagContext<'_>,
) -> FrameCollection {
    let mut frames = match tag {
        NativeTag::Ape(tag) => ape::get_all_frames(tag, context),
        NativeTag::Mp4(tag) => mp4::get_all_frames(tag, context),
        NativeTag::Matroska(tag) => matroska::get_all_frames(tag, context),
        NativeTag::RiffInfo(tag) => riff::get_all_frames(tag, context),
        NativeTag::Xiph(tag) => vorbis::get_all_frames(tag, context),
        NativeTag::Generic(tag) => generic::get_all_frames(tag, context),
    };
    frames.extend(extra_frames.iter().cloned());
    frames
}

pub(crate) fn set_frame(
    tag: &mut NativeTag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    match frame.index() {
        FrameIndex::Extra(_) => {
            let mutation = extra_frames.set(frame);
            if mutation == Mutation::Modified {
                sync_extra_frames(tag, extra_frames);
            }
            mutation
        }
        FrameIndex::Native(index) => match tag {
            NativeTag::Ape(tag) => ape::set_frame(tag, index, frame, context),
            NativeTag::Mp4(tag) => mp4::set_frame(tag, index, frame, context),
            NativeTag::Matroska(tag) => matroska::set_frame(tag, index, frame, context),
            NativeTag::RiffInfo(tag) => riff::set_frame(tag, index, frame, context),
            NativeTag::Xiph(tag) => vorbis::set_frame(tag, index, frame, context),
            NativeTag::Generic(tag) => generic::set_frame(tag, index, frame, context),
        },
        FrameIndex::Unpositioned => {
            if !is_replaced_without_index(frame) {
                return add_frame(tag, extra_frames, frame, context);
            }
            match tag {
                NativeTag::Ape(tag) => ape::set_frame_without_index(tag, frame, context),
                NativeTag::Mp4(tag) => mp4::set_frame_without_index(tag, frame, context),
                NativeTag::Matroska(tag) => {
                    matroska::set_frame_without_index(tag, frame, context)
                }
                NativeTag::RiffInfo(tag) => riff::set_frame_without_index(tag, frame, context),
                NativeTag::Xiph(tag) => vorbis::set_frame_without_index(tag, frame, context),
                NativeTag::Generic(tag) => generic::set_frame_without_index(tag, frame, context),
            }
        }
    }
}

pub(crate) fn add_frame(
    tag: &mut NativeTag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let mutation = match tag {
        NativeTag::Ape(tag) => ape::add_frame(tag, extra_frames, frame, context),
        NativeTag::Mp4(tag) => mp4::add_frame(tag, extra_frames, frame, context),
        NativeTag::Matroska(tag) => matroska::add_frame(tag, extra_frames, frame, context),
        NativeTag::RiffInfo(tag) => riff::add_frame(tag, frame, context),
        NativeTag::Xiph(tag) => vorbis::add_frame(tag, extra_frames, frame, context),
        NativeTag::Generic(tag) => generic::add_frame(tag, extra_frames, frame, context),
    };
    if mutation == Mutation::Modified && frame.index().extra().is_some() {
        sync_extra_frames(tag, extra_frames);
    }
    mutation
}

pub(crate) fn delete_frame(
    tag: &mut NativeTag,
    extra_frames: &mut ExtraFrames,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if let FrameIndex::Extra(index) = frame.index() {
        if extra_frames.remove(index).is_none() {
            return Mutation::Rejected;
        }
        sync_extra_frames(tag, extra_frames);
        return Mutation::Modified;
    }
    match tag {
        NativeTag::Ape(tag) => ape::delete_frame(tag, frame, context),
        NativeTag::Mp4(tag) => mp4::delete_frame(tag, frame, context),
        NativeTag::Matroska(tag) => matroska::delete_frame(tag, frame, context),
        NativeTag::RiffInfo(tag) => riff::delete_frame(tag, frame, context),
        NativeTag::Xiph(tag) => vorbis::delete_frame(tag, frame, context),
        NativeTag::Generic(tag) => generic::delete_frame(tag, frame, context),
    }
}

pub(crate) fn delete_frames(
    tag: &mut NativeTag,
    extra_frames: &mut ExtraFrames,
    filter: &FrameFilter,
    context: &TagContext<'_>,
) -> Mutation {
    let extra_modified = if filter.are_all_enabled() {
        extra_frames.clear()
    } else {
        extra_frames.remove_filtered(filter)
    };
    if extra_modified {
        sync_extra_frames(tag, extra_frames);
    }
    let native_modified = match tag {
        NativeTag::Ape(tag) => ape::delete_frames(tag, filter, context),
        NativeTag::Mp4(tag) => mp4::delete_frames(tag, filter, context),
        NativeTag::Matroska(tag) => matroska::delete_frames(tag, filter, context),
        NativeTag::RiffInfo(tag) => riff::delete_frames(tag, filter, context),
        NativeTag::Xiph(tag) => vorbis::delete_frames(tag, filter, context),
        NativeTag::Generic(tag) => generic::delete_frames(tag, filter, context),
    };
    Mutation::from_modified(extra_modified || native_modified)
}

/// Names of frames that can be added to a tag.
#[must_use]
pub fn frame_ids(tag: &NativeTag, context: &TagContext<'_>) -> Vec<String> {
    let mut frame_ids = match tag {
        NativeTag::Ape(_) => ape::frame_ids(),
        NativeTag::Mp4(_) => mp4::frame_ids(),
        NativeTag::Matroska(_) => matroska::frame_ids(),
        NativeTag::RiffInfo(_) => riff::frame_ids(),
        NativeTag::Xiph(_) => vorbis::frame_ids(context),
        NativeTag::Generic(tag) => generic::frame_ids(tag),
    };
    frame_ids.extend(context.custom_frames.names().map(ToOwned::to_owned));
    frame_ids
}

/// Display names of all standard types that pass the predicate.
fn standard_frame_ids(mut predicate: impl FnMut(FrameType) -> bool) -> Vec<String> {
    FrameType::STANDARD
        .into_iter()
        .filter(|frame_type| predicate(*frame_type))
        .map(|frame_type| frame_type.display_name().to_owned())
        .collect()
}

/// Well-known field names of plain key/value tags without a frame type.
const GENERIC_FIELD_NAMES: &[&str] = &[
    "CONTACT",
    "DISCTOTAL",
    "EAN/UPN",
    "ENCODING",
    "ENGINEER",
    "ENSEMBLE",
    "GUESTARTIST",
    "LABEL",
    "LABELNO",
    "LICENSE",
    "LOCATION",
    "OPUS",
    "ORGANIZATION",
    "PARTNUMBER",
    "PRODUCER",
    "PRODUCTNUMBER",
    "RECORDINGDATE",
    "TRACKTOTAL",
    "VERSION",
    "VOLUME",
];

/// Frame ids of tags that accept arbitrary keys.
fn default_frame_ids(pictures_supported: bool) -> Vec<String> {
    let mut frame_ids =
        standard_frame_ids(|frame_type| pictures_supported || frame_type != FrameType::Picture);
    frame_ids.extend(GENERIC_FIELD_NAMES.iter().map(|name| (*name).to_owned()));
    frame_ids
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum KeyCharset {
    /// Printable ASCII
    Ape,
    /// Printable ASCII up to `}` without `=`
    Vorbis,
}

/// Remove all characters that are not allowed in a native key.
fn fix_up_key(name: &str, charset: KeyCharset) -> String {
    name.chars()
        .filter(|c| match charset {
            KeyCharset::Ape => (' '..='~').contains(c),
            KeyCharset::Vorbis => (' '..='}').contains(c) && *c != '=',
        })
        .collect()
}

/// Type of a name that is not found in the table of an adapter.
fn custom_or_other_type(name: &str, context: &TagContext<'_>) -> FrameType {
    context.custom_frames.type_of(name)
}

/// Empty values are not supported by some containers.
fn non_empty_value(value: &str) -> &str {
    if value.is_empty() { " " } else { value }
}
