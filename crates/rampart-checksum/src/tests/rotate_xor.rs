// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::{ChecksumProtection, Checksummed, Unchecksummed, rotate_xor};

fn le_bytes_i32(values: impl Iterator<Item = i32>) -> Vec<u8> {
    values.flat_map(|v| v.to_le_bytes()).collect()
}

// =============================================================================
// rotate_xor()
// =============================================================================

#[test]
fn test_empty_is_zero() {
    assert_eq!(rotate_xor(&[]), 0);
}

#[test]
fn test_small_inputs() {
    assert_eq!(rotate_xor(&[0xFF]), 0xFF);
    // ((1 rol 1) ^ 2) rol 1 ^ 3 = (2 ^ 2) rol 1 ^ 3 = 3
    assert_eq!(rotate_xor(&[1, 2, 3]), 3);
}

#[test]
fn test_top_bit_wraps_around() {
    // 64 zero bytes after a 0x80 push the set bit through the top and back.
    let mut bytes = vec![0x80u8];
    bytes.extend(core::iter::repeat_n(0u8, 64));

    assert_eq!(rotate_xor(&bytes), 0x80);
}

#[test]
fn test_reference_values() {
    let ints = le_bytes_i32(0..10);
    assert_eq!(rotate_xor(&ints), 39_093_746_760);

    let floats: Vec<u8> = (0..15).flat_map(|i| f64::from(i).to_le_bytes()).collect();
    assert_eq!(rotate_xor(&floats), 8_647_433_863_363_066_984);

    let ints = le_bytes_i32(0..4);
    assert_eq!(rotate_xor(&ints), 2328);
}

#[test]
fn test_order_sensitive() {
    assert_ne!(rotate_xor(&[1, 2]), rotate_xor(&[2, 1]));
}

// =============================================================================
// ChecksumProtection
// =============================================================================

#[test]
fn test_checksummed_matches() {
    let bytes = le_bytes_i32(0..10);
    let stored = Checksummed::digest(&bytes);

    assert!(Checksummed::matches(&stored, &bytes));
    assert!(!Checksummed::matches(&stored, &bytes[..bytes.len() - 1]));
}

#[test]
fn test_unchecksummed_never_mismatches() {
    let bytes = le_bytes_i32(0..10);
    let stored = Unchecksummed::digest(&bytes);

    assert!(Unchecksummed::matches(&stored, &[0xAB; 7]));
    assert_eq!(core::mem::size_of::<<Unchecksummed as ChecksumProtection>::Digest>(), 0);
}
