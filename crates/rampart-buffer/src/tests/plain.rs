// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::{as_bytes, as_bytes_mut};

#[test]
fn test_as_bytes_covers_every_byte() {
    let values = [0x0102_0304u32, 0x0506_0708];
    let bytes = as_bytes(&values);

    assert_eq!(bytes.len(), 8);
    assert_eq!(&bytes[..4], &0x0102_0304u32.to_ne_bytes());
}

#[test]
fn test_as_bytes_mut_writes_through() {
    let mut values = [0u16; 2];
    as_bytes_mut(&mut values)[2..].copy_from_slice(&0xBEEFu16.to_ne_bytes());

    assert_eq!(values, [0, 0xBEEF]);
}

#[test]
fn test_arrays_are_plain() {
    let values = [[1u8, 2], [3, 4]];
    assert_eq!(as_bytes(&values), &[1, 2, 3, 4]);
}
