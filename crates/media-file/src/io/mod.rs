// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Open files and their tags.

use std::path::{Path, PathBuf};

use tagweave_core::frame::{CustomFrameNames, Frame, FrameCollection, FrameFilter};

use crate::{
    Error, Result,
    config::TagConfig,
    fmt::{
        self, ContainerKind, ExtraFrames, FormatSupport, Mutation, TagContext, TagSlot, TagState,
        WriteOutcome,
    },
    native::{NativeFile, NativeTag, NativeTagKind},
    util::file_extension_upper,
};

mod bridge;
pub mod ebml;
mod matroska;

fn read_native_file(path: &Path, container_kind: ContainerKind) -> Result<NativeFile> {
    match container_kind {
        ContainerKind::Matroska => matroska::read_file(path),
        _ => bridge::read_file(path, container_kind),
    }
}

fn save_native_tag(
    path: &Path,
    tag_kind: NativeTagKind,
    tag: &NativeTag,
    config: &TagConfig,
) -> Result<()> {
    match tag {
        NativeTag::Matroska(tag) => matroska::write_tag(path, tag),
        _ => bridge::save_tag(path, tag_kind, tag, config),
    }
}

/// Returns `false` if the file did not contain the tag.
fn strip_native_tag(path: &Path, tag_kind: NativeTagKind) -> Result<bool> {
    match tag_kind {
        NativeTagKind::Matroska => matroska::strip_tag(path),
        _ => bridge::strip_tag(path, tag_kind),
    }
}

/// An audio file with its native tags.
///
/// The native tags are only kept in memory while the file is open.
/// All frames obtained before [`TagFile::close()`] become stale.
#[derive(Debug)]
pub struct TagFile {
    path: PathBuf,
    format_support: FormatSupport,
    container_kind: ContainerKind,
    config: TagConfig,
    custom_frames: CustomFrameNames,
    native: Option<NativeFile>,
    state: TagState,
    total_number_of_tracks: Option<u32>,
}

impl TagFile {
    /// Open a file and read its tags.
    ///
    /// The adapter is selected by the file extension.
    pub fn open(path: impl AsRef<Path>, config: &TagConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let extension = file_extension_upper(&path).unwrap_or_default();
        let Some((format_support, native)) = FormatSupport::create_from_extension(&extension)
        else {
            return Err(Error::UnsupportedExtension(extension));
        };
        let mut tag_file = Self {
            path,
            format_support,
            container_kind: native.kind(),
            config: config.clone(),
            custom_frames: config.custom_frames(),
            native: None,
            state: TagState::default(),
            total_number_of_tracks: None,
        };
        tag_file.reopen()?;
        Ok(tag_file)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn format_support(&self) -> FormatSupport {
        self.format_support
    }

    #[must_use]
    pub const fn container_kind(&self) -> ContainerKind {
        self.container_kind
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.native.is_some()
    }

    /// Release the native tags and all cached frames.
    ///
    /// Unsaved changes are discarded.
    pub fn close(&mut self) {
        if self.native.take().is_some() {
            log::debug!("Closing file {}", self.path.display());
        }
        self.state.reset();
    }

    /// Read the file again after it has been closed.
    pub fn reopen(&mut self) -> Result<()> {
        if self.native.is_some() {
            return Ok(());
        }
        let native = read_native_file(&self.path, self.container_kind)?;
        self.format_support.read_file(&mut self.state, &native);
        self.native = Some(native);
        Ok(())
    }

    /// Any slot has unsaved changes.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.state.is_changed()
    }

    #[must_use]
    pub fn has_tag(&self, slot: TagSlot) -> bool {
        self.state.is_bound(slot)
    }

    /// Total number of tracks of the album, written together with
    /// track numbers if enabled in the configuration.
    pub fn set_total_number_of_tracks(&mut self, total_number_of_tracks: Option<u32>) {
        self.total_number_of_tracks = total_number_of_tracks;
    }

    fn native_mut(&mut self) -> Result<&mut NativeFile> {
        self.reopen()?;
        self.native
            .as_mut()
            .ok_or_else(|| Error::Other(anyhow::anyhow!("file is not open")))
    }

    fn bound_tag(&self, slot: TagSlot) -> Option<&NativeTag> {
        let tag_kind = self.state.slot(slot).binding()?;
        self.native.as_ref()?.tag(tag_kind)
    }

    /// Display name of the tag format of a slot, e.g. `APE`.
    #[must_use]
    pub fn tag_format(&self, slot: TagSlot) -> Option<&'static str> {
        self.bound_tag(slot).map(fmt::tag_format)
    }

    /// Human-readable summary of the audio properties, e.g.
    /// `FLAC 16 bit`.
    #[must_use]
    pub fn audio_properties(&self) -> Option<String> {
        self.native
            .as_ref()?
            .audio_properties()
            .and_then(fmt::read_audio_properties)
    }

    /// Create an empty tag for a slot that does not exist yet.
    pub fn make_tag_settable(&mut self, slot: TagSlot) -> Result<()> {
        self.reopen()?;
        let Self {
            format_support,
            native,
            state,
            ..
        } = self;
        let Some(native) = native.as_mut() else {
            return Err(Error::UnsupportedSlot(slot));
        };
        if format_support.make_tag_settable(state, native, slot) {
            Ok(())
        } else {
            Err(Error::UnsupportedSlot(slot))
        }
    }

    fn with_bound_tag<T>(
        &mut self,
        slot: TagSlot,
        f: impl FnOnce(&mut NativeTag, &mut ExtraFrames, &TagContext<'_>) -> T,
    ) -> Result<Option<T>> {
        self.reopen()?;
        let Self {
            config,
            custom_frames,
            native,
            state,
            total_number_of_tracks,
            ..
        } = self;
        let Some(tag_kind) = state.slot(slot).binding() else {
            return Ok(None);
        };
        let Some(tag) = native.as_mut().and_then(|native| native.tag_mut(tag_kind)) else {
            return Ok(None);
        };
        let context = TagContext {
            config,
            custom_frames,
            total_number_of_tracks: *total_number_of_tracks,
        };
        Ok(Some(f(tag, state.extra_frames_mut(slot), &context)))
    }

    fn apply_mutation(&mut self, slot: TagSlot, mutation: Option<Mutation>) -> bool {
        match mutation {
            None | Some(Mutation::Rejected) => false,
            Some(Mutation::Unchanged) => true,
            Some(Mutation::Modified) => {
                self.state.mark_changed(slot);
                true
            }
        }
    }

    /// All frames of a slot, `None` if the slot is not bound.
    pub fn get_all_frames(&mut self, slot: TagSlot) -> Result<Option<FrameCollection>> {
        self.with_bound_tag(slot, |tag, extra_frames, context| {
            fmt::get_all_frames(tag, extra_frames, context)
        })
    }

    /// Replace the frame at the index of `frame` or add it if it is
    /// not positioned.
    ///
    /// Returns `false` if the slot is not bound or the index is stale.
    pub fn set_frame(&mut self, slot: TagSlot, frame: &mut Frame) -> Result<bool> {
        let mutation = self.with_bound_tag(slot, |tag, extra_frames, context| {
            fmt::set_frame(tag, extra_frames, frame, context)
        })?;
        if mutation == Some(Mutation::Unchanged) {
            frame.set_value_changed(false);
        }
        Ok(self.apply_mutation(slot, mutation))
    }

    /// Add a frame and assign its new index.
    pub fn add_frame(&mut self, slot: TagSlot, frame: &mut Frame) -> Result<bool> {
        let mutation = self.with_bound_tag(slot, |tag, extra_frames, context| {
            fmt::add_frame(tag, extra_frames, frame, context)
        })?;
        Ok(self.apply_mutation(slot, mutation))
    }

    pub fn delete_frame(&mut self, slot: TagSlot, frame: &Frame) -> Result<bool> {
        let mutation = self.with_bound_tag(slot, |tag, extra_frames, context| {
            fmt::delete_frame(tag, extra_frames, frame, context)
        })?;
        Ok(self.apply_mutation(slot, mutation))
    }

    /// Delete all frames that pass the filter.
    pub fn delete_frames(&mut self, slot: TagSlot, filter: &FrameFilter) -> Result<bool> {
        let mutation = self.with_bound_tag(slot, |tag, extra_frames, context| {
            fmt::delete_frames(tag, extra_frames, filter, context)
        })?;
        Ok(self.apply_mutation(slot, mutation))
    }

    /// Names of frames that can be added to a slot.
    pub fn frame_ids(&mut self, slot: TagSlot) -> Result<Vec<String>> {
        let frame_ids = self.with_bound_tag(slot, |tag, _, context| fmt::frame_ids(tag, context))?;
        Ok(frame_ids.unwrap_or_default())
    }

    /// Write all changed tags into the file.
    ///
    /// With `force` all bound tags are written, even if unchanged.
    pub fn save(&mut self, force: bool) -> Result<WriteOutcome> {
        self.reopen()?;
        let Self {
            path,
            format_support,
            config,
            custom_frames,
            native,
            state,
            total_number_of_tracks,
            ..
        } = self;
        let Some(native) = native.as_mut() else {
            return Ok(WriteOutcome::default());
        };
        let context = TagContext {
            config,
            custom_frames,
            total_number_of_tracks: *total_number_of_tracks,
        };
        let plan = format_support.write_file(state, native, force, &context);
        let mut outcome = WriteOutcome::default();
        for tag_kind in plan.strip {
            if strip_native_tag(path, tag_kind)? {
                outcome.file_changed = true;
            }
        }
        for tag_kind in plan.save {
            let Some(tag) = native.tag(tag_kind) else {
                continue;
            };
            save_native_tag(path, tag_kind, tag, config)?;
            outcome.file_changed = true;
        }
        if outcome.file_changed {
            log::info!("Wrote tags into file {}", path.display());
        }
        state.clear_changed();
        Ok(outcome)
    }
}
