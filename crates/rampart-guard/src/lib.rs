// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! rampart_guard - Boundary sentinels for guarded storage
//!
//! A guarded container carries four sentinels: two flanking its own field
//! block and two flanking the payload of its buffer. Each one holds
//! [`GUARD_VALUE`] for the whole lifetime of the container; a linear overrun
//! or underrun that crosses a boundary clobbers the sentinel and is reported
//! by the next [`GuardProtection::check`].
//!
//! Protection is selected at the type level:
//!
//! - [`Guarded`]: sentinels are `u64` values and every check compares them.
//! - [`Unguarded`]: sentinels are `()`, regions are zero bytes wide and every
//!   check compiles down to `Ok(())`.
//!
//! # Example
//!
//! ```rust
//! use rampart_guard::{GuardBreach, GuardProtection, Guarded, Unguarded, GUARD_VALUE};
//!
//! let front = Guarded::canary();
//! let back = Guarded::canary();
//!
//! assert_eq!(Guarded::check(&front, &back, GUARD_VALUE, GUARD_VALUE), Ok(()));
//! assert_eq!(
//!     Guarded::check(&front, &back, GUARD_VALUE, 0x8BADF00D),
//!     Err(GuardBreach::Back)
//! );
//!
//! // Same breach, nothing watching.
//! assert_eq!(Unguarded::check(&(), &(), (), ()), Ok(()));
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]


use core::fmt;

/// Sentinel written at every guarded boundary.
pub const GUARD_VALUE: u64 = 0x0DEA_DBEE_FBAD_F00D;

/// Width in bytes of one guarded region.
pub const GUARD_SIZE: usize = core::mem::size_of::<u64>();

/// Which side of a guarded block lost its sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardBreach {
    /// A sentinel preceding the protected data.
    Front,
    /// A sentinel following the protected data.
    Back,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Guarded {}
    impl Sealed for super::Unguarded {}
}

/// Guard strategy, fixed per container type.
///
/// The strategy decides how wide the payload guard regions are, what a
/// field-level sentinel looks like, and whether checks do anything at all.
/// It is sealed: the layout of guarded allocations depends on it.
pub trait GuardProtection: sealed::Sealed + fmt::Debug + 'static {
    /// Whether sentinels are laid out and checked.
    const ENABLED: bool;

    /// Bytes reserved before and after a guarded payload.
    const REGION_SIZE: usize;

    /// In-struct sentinel type.
    type Canary: Copy + Eq + fmt::Debug;

    /// Returns a fresh sentinel.
    fn canary() -> Self::Canary;

    /// Writes the sentinel into a payload guard region.
    ///
    /// # Safety
    ///
    /// `region` must be valid for writes of [`Self::REGION_SIZE`] bytes.
    /// No alignment is required.
    unsafe fn store(region: *mut u8);

    /// Reads back the value held by a payload guard region.
    ///
    /// # Safety
    ///
    /// `region` must be valid for reads of [`Self::REGION_SIZE`] bytes.
    /// No alignment is required.
    unsafe fn load(region: *const u8) -> Self::Canary;

    /// Checks the four sentinels of a guarded container.
    ///
    /// Order is fixed: field front, field back, payload front, payload back.
    /// The first mismatch wins; simultaneous breaks are not aggregated.
    fn check(
        field_front: &Self::Canary,
        field_back: &Self::Canary,
        payload_front: Self::Canary,
        payload_back: Self::Canary,
    ) -> Result<(), GuardBreach> {
        if !Self::ENABLED {
            return Ok(());
        }

        let expected = Self::canary();

        if *field_front != expected {
            return Err(GuardBreach::Front);
        }
        if *field_back != expected {
            return Err(GuardBreach::Back);
        }
        if payload_front != expected {
            return Err(GuardBreach::Front);
        }
        if payload_back != expected {
            return Err(GuardBreach::Back);
        }

        Ok(())
    }
}

/// Sentinels on: every boundary holds [`GUARD_VALUE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Guarded;

impl GuardProtection for Guarded {
    const ENABLED: bool = true;
    const REGION_SIZE: usize = GUARD_SIZE;

    type Canary = u64;

    #[inline(always)]
    fn canary() -> u64 {
        GUARD_VALUE
    }

    #[inline(always)]
    unsafe fn store(region: *mut u8) {
        // SAFETY (PRECONDITIONS ARE MET): caller guarantees GUARD_SIZE writable bytes
        unsafe { core::ptr::write_unaligned(region.cast::<u64>(), GUARD_VALUE) }
    }

    #[inline(always)]
    unsafe fn load(region: *const u8) -> u64 {
        // SAFETY (PRECONDITIONS ARE MET): caller guarantees GUARD_SIZE readable bytes
        unsafe { core::ptr::read_unaligned(region.cast::<u64>()) }
    }
}

/// Sentinels off: zero-width regions, unit canaries, checks always pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unguarded;

impl GuardProtection for Unguarded {
    const ENABLED: bool = false;
    const REGION_SIZE: usize = 0;

    type Canary = ();

    #[inline(always)]
    fn canary() {}

    #[inline(always)]
    unsafe fn store(_region: *mut u8) {}

    #[inline(always)]
    unsafe fn load(_region: *const u8) {}
}
