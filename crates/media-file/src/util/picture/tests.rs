// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn sample_picture() -> NativePicture {
    NativePicture {
        picture_type: PictureType::CoverBack,
        mime_type: "image/png".to_owned(),
        description: "Back cover".to_owned(),
        data: vec![0xAB; 17],
        width: 300,
        height: 200,
        depth: 24,
        num_colors: 0,
    }
}

#[test]
fn picture_block_layout() {
    let block = encode_picture_block(&sample_picture()).unwrap();
    // Picture type
    assert_eq!(&[0, 0, 0, 4], &block[..4]);
    // MIME type with length prefix
    assert_eq!(&[0, 0, 0, 9], &block[4..8]);
    assert_eq!(b"image/png", &block[8..17]);
    assert_eq!(4 + 4 + 9 + 4 + 10 + 16 + 4 + 17, block.len());
    assert_eq!(sample_picture(), decode_picture_block(&block).unwrap());
}

#[test]
fn truncated_picture_block() {
    let block = encode_picture_block(&sample_picture()).unwrap();
    assert!(decode_picture_block(&block[..block.len() - 1]).is_err());
    assert!(decode_picture_block(&[]).is_err());
}

#[test]
fn base64_picture_block() {
    let encoded = encode_base64_picture_block(&sample_picture()).unwrap();
    assert!(encoded.is_ascii());
    let decoded = decode_base64_picture_block(&format!("{encoded}\n")).unwrap();
    assert_eq!(sample_picture(), decoded);
    assert!(decode_base64_picture_block("not base64!").is_err());
}

#[test]
fn image_formats_of_mime_types() {
    assert_eq!("PNG", image_format_from_mime_type("image/png"));
    assert_eq!("JPG", image_format_from_mime_type("image/jpeg"));
    assert_eq!("GIF", image_format_from_mime_type("IMAGE/GIF"));
    assert_eq!("JPG", image_format_from_mime_type(""));
}

#[test]
fn guess_mime_type_from_magic_bytes() {
    let mut data = PNG_MAGIC.to_vec();
    data.extend_from_slice(&[0; 16]);
    assert_eq!(Some(IMAGE_PNG), guess_mime_type(&data));
    assert_eq!(None, guess_mime_type(b"plain text"));
}

#[test]
fn mp4_cover_art_formats() {
    assert_eq!(
        Mp4ImageFormat::Png,
        mp4_image_format_from_mime_type("image/png")
    );
    assert_eq!(
        Mp4ImageFormat::Unknown,
        mp4_image_format_from_mime_type("image/webp")
    );
    assert_eq!(
        IMAGE_JPEG,
        mime_type_from_mp4_image_format(Mp4ImageFormat::Unknown, b"garbage")
    );
    assert_eq!(
        IMAGE_GIF,
        mime_type_from_mp4_image_format(Mp4ImageFormat::Gif, b"")
    );
}
