// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;

/// Element types a guarded buffer can hold.
///
/// # Safety
///
/// Implementors must:
/// - be valid for every bit pattern (in particular all zeros),
/// - contain no padding bytes (every byte is initialized and may be hashed).
///
/// Zero-sized implementors (`[T; 0]`) are accepted by the trait but refused
/// by [`GuardedBuffer::allocate`](crate::GuardedBuffer::allocate).
pub unsafe trait Plain: Copy + fmt::Debug + 'static {}

macro_rules! impl_plain {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: primitive numeric type, any bit pattern valid, no padding
            unsafe impl Plain for $ty {}
        )*
    };
}

impl_plain!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

// SAFETY: arrays of Plain are Plain (no padding between elements)
unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}

/// Views a slice of plain values as raw bytes.
#[inline(always)]
pub fn as_bytes<T: Plain>(slice: &[T]) -> &[u8] {
    // SAFETY (PRECONDITIONS ARE MET): T: Plain has no padding, so every byte is initialized
    unsafe { core::slice::from_raw_parts(slice.as_ptr().cast::<u8>(), core::mem::size_of_val(slice)) }
}

/// Views a mutable slice of plain values as raw bytes.
#[inline(always)]
pub fn as_bytes_mut<T: Plain>(slice: &mut [T]) -> &mut [u8] {
    let len = core::mem::size_of_val(slice);
    // SAFETY (PRECONDITIONS ARE MET): T: Plain has no padding; exclusive borrow held for the result
    unsafe { core::slice::from_raw_parts_mut(slice.as_mut_ptr().cast::<u8>(), len) }
}
