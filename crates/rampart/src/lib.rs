// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Self-verifying growable stack for debug builds.
//!
//! [`Stack`] behaves like an ordinary LIFO container (push, pop, clear,
//! print) and proves to itself, around every operation, that its state has
//! not been corrupted by stray writes. Two independent detectors can be
//! switched on per type:
//!
//! - **Guards** ([`Guarded`]): sentinels in front of and behind the stack's
//!   own fields and its payload. Overruns across a boundary surface as
//!   [`StackError::FrontCanaryCorrupt`] / [`StackError::BackCanaryCorrupt`].
//! - **Checksum** ([`Checksummed`]): a rotate-xor digest of the live bytes,
//!   recomputed after every mutation. In-range corruption surfaces as
//!   [`StackError::HashMismatch`].
//!
//! Detection is all that is promised. Once a corruption error has been
//! returned, the stack must not be used further.
//!
//! # Build-time configuration
//!
//! | feature    | effect                                        |
//! |------------|-----------------------------------------------|
//! | `guard`    | [`ConfiguredGuard`] = [`Guarded`]             |
//! | `checksum` | [`ConfiguredChecksum`] = [`Checksummed`]      |
//! | `full`     | both                                          |
//!
//! [`DebugStack<T>`] follows these features; a `Stack<T, G, C>` spelled out
//! explicitly does not. Protection is part of the type, so it cannot be
//! switched on for an instance that already exists.
//!
//! # Diagnostics
//!
//! Every failure is recorded on the stack's [`LogSink`]; corruption also
//! renders a [`Snapshot`] to its [`DumpSink`]. By default both go to
//! `tracing`.
//!
//! ```rust
//! use rampart::{Guarded, MemoryDump, MemoryLog, Reporter, Stack, StackError, Unchecksummed};
//! use rampart::provenance;
//!
//! let log = MemoryLog::new();
//! let dumps = MemoryDump::new();
//!
//! let mut stack = Stack::<u64, Guarded, Unchecksummed>::with_capacity_and_reporter(
//!     4,
//!     provenance!("stk"),
//!     Reporter::new(log.clone(), dumps.clone()),
//! )
//! .unwrap();
//!
//! assert_eq!(stack.pop(), Err(StackError::EmptyPop));
//! assert_eq!(log.kinds(), vec![StackError::EmptyPop]);
//! // Not corruption: no dump.
//! assert!(dumps.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod error;
mod location;
mod report;
mod snapshot;
mod stack;

#[cfg(test)]
mod tests;

pub use error::StackError;
pub use location::{CallSite, Provenance};
pub use report::{
    DumpSink, FileDump, LogRecord, LogSink, MemoryDump, MemoryLog, Reporter, TracingDump,
    TracingLog,
};
pub use snapshot::Snapshot;
pub use stack::{DEFAULT_CAPACITY, Stack};

pub use rampart_buffer::{BufferError, Plain};
pub use rampart_checksum::{ChecksumProtection, Checksummed, Unchecksummed};
pub use rampart_guard::{GUARD_VALUE, GuardProtection, Guarded, Unguarded};

#[cfg(any(test, feature = "test-utils"))]
pub use rampart_buffer::GuardedBufferBehaviour;

/// Guard strategy selected by the `guard` feature.
#[cfg(feature = "guard")]
pub type ConfiguredGuard = Guarded;
/// Guard strategy selected by the `guard` feature.
#[cfg(not(feature = "guard"))]
pub type ConfiguredGuard = Unguarded;

/// Checksum strategy selected by the `checksum` feature.
#[cfg(feature = "checksum")]
pub type ConfiguredChecksum = Checksummed;
/// Checksum strategy selected by the `checksum` feature.
#[cfg(not(feature = "checksum"))]
pub type ConfiguredChecksum = Unchecksummed;

/// Stack protected as configured at build time.
pub type DebugStack<T> = Stack<T, ConfiguredGuard, ConfiguredChecksum>;
