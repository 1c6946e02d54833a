// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Guarded heap buffers with explicit lifecycle and zeroization.
//!
//! [`GuardedBuffer<T, G>`] owns one contiguous allocation holding `capacity`
//! slots of `T`. When the guard strategy `G` is [`Guarded`](rampart_guard::Guarded),
//! the allocation additionally carries a sentinel immediately before slot 0
//! and immediately after the last slot. Those regions are never part of the
//! element range: the only element views are [`GuardedBuffer::as_slice`] and
//! [`GuardedBuffer::as_mut_slice`], which cover the payload exactly.
//!
//! # Lifecycle
//!
//! - [`GuardedBuffer::allocate`]: zero-filled storage plus guards. Refuses to
//!   run twice on the same buffer (`DoubleAllocation`).
//! - [`GuardedBuffer::reallocate`]: new storage, payload prefix carried over,
//!   old storage zeroized then freed. On failure nothing changes.
//! - [`GuardedBuffer::release`] / drop: everything zeroized, then freed.
//!
//! # Example
//!
//! ```rust
//! use rampart_buffer::{BufferError, GuardedBuffer};
//! use rampart_guard::{Guarded, GUARD_VALUE};
//!
//! fn example() -> Result<(), BufferError> {
//!     let mut buffer = GuardedBuffer::<u32, Guarded>::new();
//!     buffer.allocate(4)?;
//!
//!     buffer.as_mut_slice()[0] = 7;
//!     assert_eq!(buffer.front_guard(), Some(GUARD_VALUE));
//!
//!     buffer.reallocate(8)?;
//!     assert_eq!(buffer.as_slice()[0], 7);
//!     assert_eq!(buffer.back_guard(), Some(GUARD_VALUE));
//!
//!     assert_eq!(buffer.allocate(1), Err(BufferError::DoubleAllocation));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod error;
mod guarded_buffer;
mod plain;

#[cfg(test)]
mod tests;

pub use error::BufferError;
pub use guarded_buffer::{GuardedBuffer, MIN_CAPACITY};
pub use plain::{Plain, as_bytes, as_bytes_mut};

#[cfg(any(test, feature = "test-utils"))]
pub use guarded_buffer::GuardedBufferBehaviour;
