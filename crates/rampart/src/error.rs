// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error taxonomy shared by every stack operation and the log sink.

use rampart_buffer::BufferError;
use rampart_guard::GuardBreach;
use thiserror::Error;

/// What went wrong, keyed to a human-readable description.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StackError {
    /// Memory could not be obtained. Recoverable; the stack is unchanged.
    #[error("Memory allocation error")]
    AllocationFailure,

    /// Storage was allocated twice for the same buffer.
    #[error("Trying to alloc memory by pointer which was already used for memory allocation")]
    DoubleAllocation,

    /// The stack owns no buffer.
    #[error("Stack contains NULL buffer, but must not")]
    NullBuffer,

    /// `size` exceeds `capacity`.
    #[error("Array overflow")]
    Overflow,

    /// `size` was driven below zero.
    ///
    /// Unrepresentable with an unsigned size: every decrement is checked
    /// and an empty stack reports [`StackError::EmptyPop`] instead. The kind
    /// stays in the taxonomy for log sinks shared with other components.
    #[error("Array underflow")]
    Underflow,

    /// A sentinel in front of the fields or the payload was overwritten.
    #[error("Structure front canary defect")]
    FrontCanaryCorrupt,

    /// A sentinel behind the fields or the payload was overwritten.
    #[error("Structure back canary defect")]
    BackCanaryCorrupt,

    /// The live region no longer matches its stored checksum.
    #[error("Hash function value defect")]
    HashMismatch,

    /// Pop on an empty stack. An ordinary outcome, not corruption.
    #[error("Pop from an empty stack")]
    EmptyPop,

    /// An output sink refused a write.
    #[error("Error while writing to output sink")]
    OutputFailure,
}

impl StackError {
    /// Whether this kind means the stack's state can no longer be trusted.
    ///
    /// Only these kinds trigger a diagnostic dump.
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::NullBuffer
                | Self::Overflow
                | Self::Underflow
                | Self::FrontCanaryCorrupt
                | Self::BackCanaryCorrupt
                | Self::HashMismatch
        )
    }
}

impl From<BufferError> for StackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::AllocationFailure => Self::AllocationFailure,
            BufferError::DoubleAllocation => Self::DoubleAllocation,
            BufferError::NotAllocated => Self::NullBuffer,
        }
    }
}

impl From<GuardBreach> for StackError {
    fn from(breach: GuardBreach) -> Self {
        match breach {
            GuardBreach::Front => Self::FrontCanaryCorrupt,
            GuardBreach::Back => Self::BackCanaryCorrupt,
        }
    }
}
