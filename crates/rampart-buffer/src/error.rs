// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for rampart-buffer.

use thiserror::Error;

/// Errors that can occur when managing a guarded buffer.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BufferError {
    /// The allocator refused the request, or its size is not representable.
    ///
    /// On a failed reallocation the previous storage is left untouched.
    #[error("Memory allocation error")]
    AllocationFailure,

    /// `allocate()` was called on a buffer that already owns storage.
    #[error("Trying to alloc memory by pointer which was already used for memory allocation")]
    DoubleAllocation,

    /// The buffer owns no storage (never allocated, or already released).
    #[error("Buffer owns no storage")]
    NotAllocated,
}
