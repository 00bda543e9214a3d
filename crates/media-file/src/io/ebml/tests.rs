// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn read_vint_lengths() {
    let mut cursor = Cursor::new(vec![0x81, 0x40, 0x02, 0x30, 0x00, 0x00]);
    assert_eq!((1, 1), read_vint(&mut cursor).unwrap());
    assert_eq!((2, 2), read_vint(&mut cursor).unwrap());
    assert_eq!((0x10_0000, 3), read_vint(&mut cursor).unwrap());
}

#[test]
fn read_eight_byte_vint() {
    let mut data = vec![0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03];
    data.extend(encode_vint_with_length(4711, 8).unwrap());
    let mut cursor = Cursor::new(data);
    assert_eq!((0x01_0203, 8), read_vint(&mut cursor).unwrap());
    assert_eq!((Some(4711), 8), read_element_size(&mut cursor).unwrap());
}

#[test]
fn zero_byte_is_invalid_vint() {
    let mut cursor = Cursor::new(vec![0x00, 0x01]);
    assert!(matches!(
        read_vint(&mut cursor),
        Err(EbmlError::InvalidVint { offset: 0 })
    ));
}

#[test]
fn element_ids_keep_marker_bits() {
    let mut cursor = Cursor::new(vec![0x1A, 0x45, 0xDF, 0xA3, 0xEC]);
    assert_eq!((ids::EBML, 4), read_element_id(&mut cursor).unwrap());
    assert_eq!((ids::VOID, 1), read_element_id(&mut cursor).unwrap());
}

#[test]
fn unknown_size() {
    let mut cursor = Cursor::new(vec![0xFF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!((None, 1), read_element_size(&mut cursor).unwrap());
    assert_eq!((None, 8), read_element_size(&mut cursor).unwrap());
}

#[test]
fn sizes_avoid_unknown_marker() {
    assert_eq!(1, vint_length(0));
    assert_eq!(1, vint_length(126));
    assert_eq!(2, vint_length(127));
    assert_eq!(2, vint_length(0x3FFE));
    assert_eq!(3, vint_length(0x3FFF));
}

#[test]
fn encode_vint_with_fixed_length() {
    assert_eq!(vec![0x10, 0x00, 0x00, 0x05], encode_vint_with_length(5, 4).unwrap());
    assert_eq!(vec![0x85], encode_vint_with_length(5, 1).unwrap());
    assert!(encode_vint_with_length(127, 1).is_err());
    assert!(encode_vint_with_length(1, 9).is_err());
}

#[test]
fn encode_elements() {
    assert_eq!(
        vec![0x42, 0x82, 0x84, b'w', b'e', b'b', b'm'],
        string_element(ids::DOC_TYPE, "webm")
    );
    assert_eq!(vec![0x83, 0x81, 0x02], unsigned_int_element(ids::TRACK_TYPE, 2));
    assert_eq!(vec![0x83, 0x81, 0x00], unsigned_int_element(ids::TRACK_TYPE, 0));
    assert_eq!(
        vec![0x73, 0xC4, 0x82, 0x01, 0x00],
        unsigned_int_element(ids::CHAPTER_UID, 256)
    );
}

#[test]
fn parse_nested_children() {
    let mut children = string_element(ids::TAG_NAME, "TITLE");
    children.extend(string_element(ids::TAG_STRING, "Song"));
    let simple_tag = master_element(ids::SIMPLE_TAG, &children);

    let parsed = parse_children(&simple_tag).unwrap();
    assert_eq!(1, parsed.len());
    assert_eq!(ids::SIMPLE_TAG, parsed[0].0);

    let parsed = parse_children(parsed[0].1).unwrap();
    assert_eq!(
        vec![
            (ids::TAG_NAME, b"TITLE".as_slice()),
            (ids::TAG_STRING, b"Song".as_slice())
        ],
        parsed
    );
}

#[test]
fn child_exceeding_parent() {
    let data = [0x85, 0x84, b'a', b'b'];
    assert!(matches!(
        parse_children(&data),
        Err(EbmlError::Overflow { id: 0x85, .. })
    ));
}

#[test]
fn decode_values() {
    assert_eq!(0, read_unsigned_int(&[]));
    assert_eq!(0x0102, read_unsigned_int(&[0x01, 0x02]));
    assert_eq!("eng", read_string(b"eng\0\0"));
    assert_eq!("", read_string(b"\0"));
}

#[test]
fn void_covers_exact_size() {
    for total_size in [2, 5, 9, 10, 1000] {
        let header = void_header(total_size).unwrap();
        let mut data = header.clone();
        data.resize(total_size as usize, 0xAA);
        let element = ElementHeader::read(&mut Cursor::new(&data)).unwrap();
        assert_eq!(ids::VOID, element.id);
        assert_eq!(Some(total_size), element.total_size());
    }
    assert!(void_header(1).is_err());
}

#[test]
fn header_offsets() {
    let mut data = vec![0u8; 3];
    data.extend(string_element(ids::CODEC_ID, "A_FLAC"));
    let header = ElementHeader::read_at(&mut Cursor::new(&data), 3).unwrap();
    assert_eq!(ids::CODEC_ID, header.id);
    assert_eq!(4, header.size_offset());
    assert_eq!(5, header.data_offset());
    assert_eq!(Some(11), header.end_offset());
    assert_eq!(
        b"A_FLAC".to_vec(),
        header.read_data(&mut Cursor::new(&data)).unwrap()
    );
}

#[test]
fn child_headers_of_master() {
    let mut children = unsigned_int_element(ids::SEEK_ID, u64::from(ids::TAGS));
    children.extend(unsigned_int_element(ids::SEEK_POSITION, 4711));
    let mut data = vec![0u8; 2];
    data.extend(master_element(ids::SEEK, &children));
    let mut cursor = Cursor::new(&data);
    let seek = ElementHeader::read_at(&mut cursor, 2).unwrap();
    let headers = read_child_headers(&mut cursor, &seek).unwrap();
    assert_eq!(2, headers.len());
    assert_eq!(ids::SEEK_ID, headers[0].id);
    assert_eq!(ids::SEEK_POSITION, headers[1].id);
    assert_eq!(Some(2), headers[1].size);
    assert_eq!(
        4711,
        read_unsigned_int(&headers[1].read_data(&mut cursor).unwrap())
    );
}
