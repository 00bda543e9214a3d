// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Adapters between the container-independent frame model and the
//! native tag containers of audio files.

pub mod config;
pub mod fmt;
pub mod io;
pub mod native;
pub mod util;

use std::{io::Error as IoError, result::Result as StdResult};

use image::ImageError;
use lofty::error::LoftyError;
use thiserror::Error;

use self::{
    fmt::TagSlot,
    io::ebml::EbmlError,
    native::{ContainerKind, NativeTagKind},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported file extension \"{0}\"")]
    UnsupportedExtension(String),

    #[error("unsupported tag slot {0:?}")]
    UnsupportedSlot(TagSlot),

    #[error("unsupported container {0:?}")]
    UnsupportedContainer(ContainerKind),

    #[error("unsupported tag {0:?}")]
    UnsupportedTag(NativeTagKind),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Metadata(anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = StdResult<T, Error>;

impl From<LoftyError> for Error {
    fn from(err: LoftyError) -> Self {
        Self::Metadata(err.into())
    }
}

impl From<EbmlError> for Error {
    fn from(err: EbmlError) -> Self {
        match err {
            EbmlError::Io(err) => Self::Io(err),
            _ => Self::Metadata(err.into()),
        }
    }
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(err) => Self::Io(err),
            _ => Self::Metadata(err.into()),
        }
    }
}

pub mod prelude {
    pub use super::{
        Error, Result,
        config::{PictureName, TagConfig},
        fmt::{ContainerKind, FormatSupport, TagSlot},
        io::TagFile,
    };
    pub use tagweave_core::prelude::*;
}
