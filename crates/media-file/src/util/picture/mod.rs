// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Binary and textual encodings of pictures.

use anyhow::{Context as _, bail};
use data_encoding::BASE64;
use image::{ImageFormat, guess_format};
use mime::{IMAGE_BMP, IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, Mime};

use tagweave_core::picture::{DEFAULT_IMAGE_FORMAT, PictureType};

use crate::native::{Mp4ImageFormat, NativePicture};

/// Short image format name for a MIME type, e.g. `PNG`.
#[must_use]
pub fn image_format_from_mime_type(mime_type: &str) -> &'static str {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => "PNG",
        "image/gif" => "GIF",
        "image/bmp" => "BMP",
        "image/webp" => "WEBP",
        "image/tiff" => "TIFF",
        _ => DEFAULT_IMAGE_FORMAT,
    }
}

/// MIME type derived from the magic bytes of the image data.
#[must_use]
pub fn guess_mime_type(data: &[u8]) -> Option<Mime> {
    let mime_type = match guess_format(data).ok()? {
        ImageFormat::Jpeg => IMAGE_JPEG,
        ImageFormat::Png => IMAGE_PNG,
        ImageFormat::Gif => IMAGE_GIF,
        ImageFormat::Bmp => IMAGE_BMP,
        ImageFormat::WebP => "image/webp".parse().ok()?,
        ImageFormat::Tiff => "image/tiff".parse().ok()?,
        _ => {
            return None;
        }
    };
    Some(mime_type)
}

#[must_use]
pub fn mp4_image_format_from_mime_type(mime_type: &str) -> Mp4ImageFormat {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Mp4ImageFormat::Jpeg,
        "image/png" => Mp4ImageFormat::Png,
        "image/bmp" => Mp4ImageFormat::Bmp,
        "image/gif" => Mp4ImageFormat::Gif,
        _ => Mp4ImageFormat::Unknown,
    }
}

/// MIME type of a cover art format, sniffed from the data if unknown.
#[must_use]
pub fn mime_type_from_mp4_image_format(format: Mp4ImageFormat, data: &[u8]) -> Mime {
    match format {
        Mp4ImageFormat::Jpeg => IMAGE_JPEG,
        Mp4ImageFormat::Png => IMAGE_PNG,
        Mp4ImageFormat::Bmp => IMAGE_BMP,
        Mp4ImageFormat::Gif => IMAGE_GIF,
        Mp4ImageFormat::Unknown => guess_mime_type(data).unwrap_or(IMAGE_JPEG),
    }
}

fn read_u32(data: &[u8], pos: &mut usize) -> anyhow::Result<u32> {
    let bytes = data
        .get(*pos..*pos + 4)
        .context("unexpected end of picture block")?;
    *pos += 4;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_bytes<'a>(data: &'a [u8], pos: &mut usize) -> anyhow::Result<&'a [u8]> {
    let len = read_u32(data, pos)? as usize;
    let bytes = data
        .get(*pos..*pos + len)
        .context("unexpected end of picture block")?;
    *pos += len;
    Ok(bytes)
}

/// Decode the contents of a FLAC `METADATA_BLOCK_PICTURE`.
pub fn decode_picture_block(data: &[u8]) -> anyhow::Result<NativePicture> {
    let mut pos = 0;
    let picture_type = PictureType::from_code(read_u32(data, &mut pos)?.into());
    let mime_type = String::from_utf8_lossy(read_bytes(data, &mut pos)?).into_owned();
    let description = String::from_utf8_lossy(read_bytes(data, &mut pos)?).into_owned();
    let width = read_u32(data, &mut pos)?;
    let height = read_u32(data, &mut pos)?;
    let depth = read_u32(data, &mut pos)?;
    let num_colors = read_u32(data, &mut pos)?;
    let data = read_bytes(data, &mut pos)?.to_vec();
    Ok(NativePicture {
        picture_type,
        mime_type,
        description,
        data,
        width,
        height,
        depth,
        num_colors,
    })
}

fn write_bytes(block: &mut Vec<u8>, bytes: &[u8]) -> anyhow::Result<()> {
    let Ok(len) = u32::try_from(bytes.len()) else {
        bail!("picture block entry too large: {len} bytes", len = bytes.len());
    };
    block.extend_from_slice(&len.to_be_bytes());
    block.extend_from_slice(bytes);
    Ok(())
}

/// Encode the contents of a FLAC `METADATA_BLOCK_PICTURE`.
pub fn encode_picture_block(picture: &NativePicture) -> anyhow::Result<Vec<u8>> {
    let mut block = Vec::with_capacity(32 + picture.data.len());
    block.extend_from_slice(&u32::from(picture.picture_type.code()).to_be_bytes());
    write_bytes(&mut block, picture.mime_type.as_bytes())?;
    write_bytes(&mut block, picture.description.as_bytes())?;
    for value in [
        picture.width,
        picture.height,
        picture.depth,
        picture.num_colors,
    ] {
        block.extend_from_slice(&value.to_be_bytes());
    }
    write_bytes(&mut block, &picture.data)?;
    Ok(block)
}

pub fn encode_base64_picture_block(picture: &NativePicture) -> anyhow::Result<String> {
    encode_picture_block(picture).map(|block| BASE64.encode(&block))
}

pub fn decode_base64_picture_block(encoded: &str) -> anyhow::Result<NativePicture> {
    let block = decode_base64(encoded)?;
    decode_picture_block(&block)
}

/// Lenient base64 decoding that ignores surrounding whitespace.
pub fn decode_base64(encoded: &str) -> anyhow::Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim().as_bytes())
        .context("invalid base64 encoding")
}

#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

#[cfg(test)]
mod tests;
