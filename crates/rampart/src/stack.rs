// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::fmt;
use std::io;

use rampart_buffer::{GuardedBuffer, Plain};
use rampart_checksum::{ChecksumProtection, Unchecksummed};
use rampart_guard::{GuardProtection, Unguarded};

use crate::error::StackError;
use crate::location::{CallSite, Provenance};
use crate::report::Reporter;
use crate::snapshot::Snapshot;

/// Capacity of a stack built with [`Stack::new`].
pub const DEFAULT_CAPACITY: usize = 1;

/// Growable LIFO container that re-verifies itself around every operation.
///
/// Each mutating or inspecting operation runs [`verify`](Self::verify)
/// first. On failure the operation has no side effects: the failure is
/// logged, corruption additionally produces a diagnostic dump, and the kind
/// is returned. After a successful mutation the stack is verified again
/// before the operation returns.
///
/// Protection is fixed by the type parameters:
///
/// - `G`: [`Guarded`](rampart_guard::Guarded) lays out sentinels around the
///   field block and around the payload; [`Unguarded`] lays out nothing.
/// - `C`: [`Checksummed`](rampart_checksum::Checksummed) keeps a rotate-xor
///   digest of the live bytes; [`Unchecksummed`] keeps nothing.
///
/// Disabled checks resolve to no-ops at compile time.
///
/// Once corruption has been reported, continued use is undefined: the stack
/// detects, it does not repair.
///
/// # Example
///
/// ```rust
/// use rampart::{Checksummed, Guarded, Stack, StackError, provenance};
///
/// fn example() -> Result<(), StackError> {
///     let mut stack = Stack::<i32, Guarded, Checksummed>::new(provenance!("stk"))?;
///
///     for i in 0..10 {
///         stack.push(i)?;
///     }
///     assert_eq!(stack.capacity(), 16);
///
///     assert_eq!(stack.pop()?, 9);
///     stack.clear()?;
///     assert_eq!(stack.pop(), Err(StackError::EmptyPop));
///     Ok(())
/// }
/// # example().unwrap();
/// ```
#[repr(C)]
pub struct Stack<T: Plain, G: GuardProtection = Unguarded, C: ChecksumProtection = Unchecksummed> {
    front_guard: G::Canary,
    len: usize,
    buffer: GuardedBuffer<T, G>,
    checksum: C::Digest,
    provenance: Provenance,
    reporter: Reporter,
    back_guard: G::Canary,
}

impl<T: Plain, G: GuardProtection, C: ChecksumProtection> fmt::Debug for Stack<T, G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("name", &self.provenance.name())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("guards", &G::ENABLED)
            .field("checksum", &C::ENABLED)
            .finish_non_exhaustive()
    }
}

impl<T: Plain, G: GuardProtection, C: ChecksumProtection> Stack<T, G, C> {
    /// Builds a stack with [`DEFAULT_CAPACITY`] slots.
    ///
    /// # Errors
    ///
    /// [`StackError::AllocationFailure`] if the buffer cannot be obtained.
    #[track_caller]
    pub fn new(provenance: Provenance) -> Result<Self, StackError> {
        Self::with_capacity_and_reporter(DEFAULT_CAPACITY, provenance, Reporter::default())
    }

    /// Builds a stack with `capacity` slots (at least one).
    #[track_caller]
    pub fn with_capacity(capacity: usize, provenance: Provenance) -> Result<Self, StackError> {
        Self::with_capacity_and_reporter(capacity, provenance, Reporter::default())
    }

    /// Builds a stack with `capacity` slots reporting to `reporter`.
    #[track_caller]
    pub fn with_capacity_and_reporter(
        capacity: usize,
        provenance: Provenance,
        reporter: Reporter,
    ) -> Result<Self, StackError> {
        let site = CallSite::caller();

        let mut buffer = GuardedBuffer::new();
        if let Err(err) = buffer.allocate(capacity) {
            let kind = StackError::from(err);
            reporter.record(kind, &site);
            return Err(kind);
        }

        let mut stack = Self {
            front_guard: G::canary(),
            len: 0,
            buffer,
            checksum: C::Digest::default(),
            provenance,
            reporter,
            back_guard: G::canary(),
        };

        // Fresh guards and an empty live region always verify.
        stack.rehash();

        Ok(stack)
    }

    /// Replaces the sinks failures and dumps are sent to.
    pub fn set_reporter(&mut self, reporter: Reporter) {
        self.reporter = reporter;
    }

    /// Live element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no element is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Name and declaration site.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Stored checksum (`()` when checksums are off).
    pub fn checksum(&self) -> C::Digest {
        self.checksum
    }

    /// Runs every integrity check, stopping at the first failure.
    ///
    /// Order: buffer present, `size <= capacity`, guards, checksum. A
    /// negative size is unrepresentable and is not checked. This only
    /// reports; nothing is logged or dumped.
    pub fn verify(&self) -> Result<(), StackError> {
        if !self.buffer.is_allocated() {
            return Err(StackError::NullBuffer);
        }

        if self.len > self.buffer.capacity() {
            return Err(StackError::Overflow);
        }

        if G::ENABLED {
            let (Some(payload_front), Some(payload_back)) =
                (self.buffer.front_guard(), self.buffer.back_guard())
            else {
                return Err(StackError::NullBuffer);
            };

            G::check(
                &self.front_guard,
                &self.back_guard,
                payload_front,
                payload_back,
            )?;
        }

        if C::ENABLED && !C::matches(&self.checksum, self.buffer.prefix_bytes(self.len)) {
            return Err(StackError::HashMismatch);
        }

        Ok(())
    }

    /// Pushes `value`, doubling the capacity first when full.
    ///
    /// # Errors
    ///
    /// Any [`verify`](Self::verify) failure, or
    /// [`StackError::AllocationFailure`] if growing fails (the stack is left
    /// as it was).
    #[track_caller]
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        let site = CallSite::caller();
        self.ensure(&site)?;

        if self.len == self.buffer.capacity() {
            let grown = self.buffer.capacity().saturating_mul(2).max(1);
            self.relocate(grown, &site)?;
        }

        self.buffer.as_mut_slice()[self.len] = value;
        self.len += 1;
        self.rehash();

        self.ensure(&site)
    }

    /// Removes and returns the top element. The vacated slot is zeroized.
    ///
    /// # Errors
    ///
    /// [`StackError::EmptyPop`] on an empty stack (nothing changes), or any
    /// [`verify`](Self::verify) failure.
    #[track_caller]
    pub fn pop(&mut self) -> Result<T, StackError> {
        let site = CallSite::caller();
        self.ensure(&site)?;

        let Some(top) = self.len.checked_sub(1) else {
            return Err(self.fail(StackError::EmptyPop, &site));
        };

        let value = self.buffer.as_slice()[top];
        self.buffer.zeroize_range(top, self.len);
        self.len = top;
        self.rehash();

        self.ensure(&site)?;

        Ok(value)
    }

    /// Returns the top element without removing it.
    #[track_caller]
    pub fn peek(&self) -> Result<Option<T>, StackError> {
        let site = CallSite::caller();
        self.ensure(&site)?;

        Ok(self.live().last().copied())
    }

    /// Zeroizes every live slot and empties the stack. Capacity is kept.
    #[track_caller]
    pub fn clear(&mut self) -> Result<(), StackError> {
        let site = CallSite::caller();
        self.ensure(&site)?;

        self.buffer.zeroize_range(0, self.len);
        self.len = 0;
        self.rehash();

        self.ensure(&site)
    }

    /// Moves the elements into storage for `new_capacity` slots (at least one).
    ///
    /// Shrinking below the current size zeroizes `[new_capacity, size)` and
    /// truncates the stack *before* reallocating; that data is gone even if
    /// the reallocation then fails. On failure the previous storage stays in
    /// use.
    #[track_caller]
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), StackError> {
        let site = CallSite::caller();
        self.ensure(&site)?;

        let new_capacity = new_capacity.max(1);

        if new_capacity < self.len {
            self.buffer.zeroize_range(new_capacity, self.len);
            self.len = new_capacity;
            self.rehash();
        }

        self.relocate(new_capacity, &site)?;

        self.ensure(&site)
    }

    /// Writes every live element as `[index] : value`, bottom first.
    #[track_caller]
    pub fn print<W>(&self, out: &mut W) -> Result<(), StackError>
    where
        W: io::Write + ?Sized,
        T: fmt::Display,
    {
        let site = CallSite::caller();
        self.ensure(&site)?;

        for (i, value) in self.live().iter().enumerate() {
            if writeln!(out, "[{i}] : {value}").is_err() {
                return Err(self.fail(StackError::OutputFailure, &site));
            }
        }

        Ok(())
    }

    /// Copies the full state, as seen from `site`.
    pub fn snapshot(&self, site: CallSite) -> Snapshot<T, G, C> {
        Snapshot {
            provenance: self.provenance.clone(),
            site,
            len: self.len,
            capacity: self.buffer.capacity(),
            field_front_guard: G::ENABLED.then_some(self.front_guard),
            payload_front_guard: self.buffer.front_guard().filter(|_| G::ENABLED),
            slots: self.buffer.as_slice().to_vec(),
            payload_back_guard: self.buffer.back_guard().filter(|_| G::ENABLED),
            field_back_guard: G::ENABLED.then_some(self.back_guard),
            checksum: C::ENABLED.then_some(self.checksum),
        }
    }

    /// Writes a diagnostic dump to the dump sink, as requested from `site`.
    ///
    /// Works on a corrupted stack too; nothing is verified.
    pub fn dump(&self, site: CallSite) -> Result<(), StackError> {
        let dump = self.snapshot(site).to_string();

        if self.reporter.dump(&dump).is_err() {
            return Err(self.fail(StackError::OutputFailure, &site));
        }

        Ok(())
    }

    fn live(&self) -> &[T] {
        &self.buffer.as_slice()[..self.len]
    }

    fn rehash(&mut self) {
        if C::ENABLED {
            self.checksum = C::digest(self.buffer.prefix_bytes(self.len));
        }
    }

    fn relocate(&mut self, new_capacity: usize, site: &CallSite) -> Result<(), StackError> {
        let old_capacity = self.buffer.capacity();

        if let Err(err) = self.buffer.reallocate(new_capacity) {
            return Err(self.fail(err.into(), site));
        }

        tracing::trace!(
            stack = self.provenance.name(),
            old_capacity,
            new_capacity = self.buffer.capacity(),
            "stack buffer reallocated"
        );

        self.rehash();

        Ok(())
    }

    fn ensure(&self, site: &CallSite) -> Result<(), StackError> {
        self.verify().map_err(|kind| self.fail(kind, site))
    }

    /// Logs `kind` and, for corruption, dumps the full state.
    fn fail(&self, kind: StackError, site: &CallSite) -> StackError {
        self.reporter.record(kind, site);

        if kind.is_corruption() {
            let dump = self.snapshot(*site).to_string();

            if self.reporter.dump(&dump).is_err() {
                self.reporter.record(StackError::OutputFailure, site);
            }
        }

        kind
    }
}

impl<T: Plain, G: GuardProtection, C: ChecksumProtection> Drop for Stack<T, G, C> {
    fn drop(&mut self) {
        let site = crate::call_site!();

        // Release happens regardless of what verification finds.
        if let Err(kind) = self.verify() {
            self.fail(kind, &site);
        }

        self.buffer.release();
        self.len = 0;
        self.checksum = C::Digest::default();
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl<T: Plain, G: GuardProtection, C: ChecksumProtection> Stack<T, G, C> {
    /// Raw bytes of the live region, bypassing every check.
    pub fn live_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len.min(self.buffer.capacity());
        rampart_buffer::as_bytes_mut(&mut self.buffer.as_mut_slice()[..len])
    }

    /// The two field-block sentinels, front then back.
    pub fn field_guards_mut(&mut self) -> (&mut G::Canary, &mut G::Canary) {
        (&mut self.front_guard, &mut self.back_guard)
    }

    /// Raw bytes of the sentinel in front of the payload.
    pub fn payload_front_guard_bytes_mut(&mut self) -> &mut [u8] {
        self.buffer.front_guard_bytes_mut()
    }

    /// Raw bytes of the sentinel behind the payload.
    pub fn payload_back_guard_bytes_mut(&mut self) -> &mut [u8] {
        self.buffer.back_guard_bytes_mut()
    }

    /// Overwrites the size without touching anything else.
    pub fn force_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Frees the buffer behind the stack's back.
    pub fn release_buffer(&mut self) {
        self.buffer.release();
    }

    /// Injects allocation failures into the underlying buffer.
    pub fn change_buffer_behaviour(&mut self, behaviour: rampart_buffer::GuardedBufferBehaviour) {
        self.buffer.change_behaviour(behaviour);
    }
}
