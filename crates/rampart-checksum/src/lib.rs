// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Rolling rotate-xor checksum.
//!
//! For every byte `b` of the input, the accumulator is rotated left by one
//! bit and `b` is xored into it:
//!
//! ```text
//! value = value.rotate_left(1) ^ b
//! ```
//!
//! Changing any single byte flips at least one bit of the result: the delta
//! is xored in once and only ever rotated afterwards, and rotation never
//! clears bits. This is an integrity probe for debug builds, not a
//! cryptographic digest.
//!
//! Like `rampart-guard`, protection is chosen per container type:
//! [`Checksummed`] stores a `u64`, [`Unchecksummed`] stores `()` and never
//! touches the data.
//!
//! # Example
//!
//! ```rust
//! use rampart_checksum::{ChecksumProtection, Checksummed, rotate_xor};
//!
//! let bytes = [1u8, 2, 3];
//! assert_eq!(rotate_xor(&bytes), 3);
//! assert!(Checksummed::matches(&Checksummed::digest(&bytes), &bytes));
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
mod tests;

use core::fmt;

/// Accumulator type of [`rotate_xor`].
pub type Digest = u64;

/// Folds `bytes` into a [`Digest`], starting from zero.
#[inline]
pub fn rotate_xor(bytes: &[u8]) -> Digest {
    bytes
        .iter()
        .fold(0, |value: Digest, &b| value.rotate_left(1) ^ Digest::from(b))
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Checksummed {}
    impl Sealed for super::Unchecksummed {}
}

/// Checksum strategy, fixed per container type.
pub trait ChecksumProtection: sealed::Sealed + fmt::Debug + 'static {
    /// Whether a digest is maintained and compared.
    const ENABLED: bool;

    /// Stored digest type.
    type Digest: Copy + Eq + Default + fmt::Debug;

    /// Computes the digest of the live bytes.
    fn digest(bytes: &[u8]) -> Self::Digest;

    /// Recomputes over `bytes` and compares with `stored`.
    #[inline]
    fn matches(stored: &Self::Digest, bytes: &[u8]) -> bool {
        if !Self::ENABLED {
            return true;
        }

        Self::digest(bytes) == *stored
    }
}

/// Checksum on: a `u64` rotate-xor digest over the live region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksummed;

impl ChecksumProtection for Checksummed {
    const ENABLED: bool = true;

    type Digest = Digest;

    #[inline]
    fn digest(bytes: &[u8]) -> Digest {
        rotate_xor(bytes)
    }
}

/// Checksum off: unit digest, every comparison passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unchecksummed;

impl ChecksumProtection for Unchecksummed {
    const ENABLED: bool = false;

    type Digest = ();

    #[inline(always)]
    fn digest(_bytes: &[u8]) {}
}
