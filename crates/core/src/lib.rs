// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Container-independent metadata model: frames, fields,
//! filters and pictures.

pub mod frame;
pub mod picture;
pub mod util;

pub use self::frame::{
    ExtendedType, Field, FieldId, FieldList, FieldValue, Frame, FrameCollection, FrameFilter,
    FrameIndex, FrameType, TextEncoding,
};

pub mod prelude {
    pub use crate::{
        frame::*,
        picture::{ImageProperties, PictureFields, PictureType},
        util::string::{join_string_list, split_string_list},
    };
}
