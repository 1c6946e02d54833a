// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::alloc::{Layout, alloc_zeroed, dealloc};
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::sync::atomic::{Ordering, compiler_fence};

use rampart_guard::GuardProtection;

use crate::error::BufferError;
use crate::plain::{Plain, as_bytes};

/// Smallest capacity a buffer is ever allocated with.
pub const MIN_CAPACITY: usize = 1;

/// Test behaviour for injecting allocation failures.
///
/// Only available with the `test-utils` feature. The behaviour is sticky:
/// once set, it remains active until changed.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuardedBufferBehaviour {
    /// Normal behaviour - no injected failures.
    #[default]
    None,
    /// `allocate()` fails with `AllocationFailure`.
    FailAtAllocate,
    /// `reallocate()` fails with `AllocationFailure`.
    FailAtReallocate,
}

/// Physical placement of payload and guards inside one allocation.
///
/// ```text
/// [ pad | front guard ][ slot 0 .. slot capacity-1 ][ back guard ]
/// ^ base              ^ base + payload_offset      ^ back_offset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    layout: Layout,
    payload_offset: usize,
    back_offset: usize,
}

impl Placement {
    fn for_capacity<T, G: GuardProtection>(capacity: usize) -> Result<Self, BufferError> {
        let payload = Layout::array::<T>(capacity).map_err(|_| BufferError::AllocationFailure)?;

        // Zero-sized elements (e.g. `[u8; 0]`) have no bytes to guard or hash.
        if payload.size() == 0 {
            return Err(BufferError::AllocationFailure);
        }

        // The front guard ends exactly where the payload starts; padding (if
        // the element alignment demands it) goes before the guard.
        let payload_offset = G::REGION_SIZE
            .checked_next_multiple_of(payload.align())
            .ok_or(BufferError::AllocationFailure)?;
        let back_offset = payload_offset
            .checked_add(payload.size())
            .ok_or(BufferError::AllocationFailure)?;
        let total = back_offset
            .checked_add(G::REGION_SIZE)
            .ok_or(BufferError::AllocationFailure)?;

        let layout = Layout::from_size_align(total, payload.align())
            .map_err(|_| BufferError::AllocationFailure)?;

        Ok(Self {
            layout,
            payload_offset,
            back_offset,
        })
    }
}

/// One live allocation and the placement it was obtained with.
#[derive(Debug, Clone, Copy)]
struct Storage {
    base: NonNull<u8>,
    placement: Placement,
}

/// Heap storage for `capacity` elements of `T`, flanked by guard regions.
///
/// The buffer only knows its capacity; which prefix is live is the owner's
/// business. Element access goes through [`as_slice`](Self::as_slice) and
/// [`as_mut_slice`](Self::as_mut_slice), which cover the payload and nothing
/// else: guard regions are never reachable by index.
///
/// Every byte of storage the buffer gives back to the allocator is zeroized
/// first (guards included), whether on reallocation, release or drop.
pub struct GuardedBuffer<T: Plain, G: GuardProtection> {
    storage: Option<Storage>,
    capacity: usize,
    #[cfg(any(test, feature = "test-utils"))]
    behaviour: GuardedBufferBehaviour,
    _marker: PhantomData<(T, G)>,
}

impl<T: Plain, G: GuardProtection> core::fmt::Debug for GuardedBuffer<T, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GuardedBuffer")
            .field("allocated", &self.is_allocated())
            .field("capacity", &self.capacity)
            .field("guards", &G::ENABLED)
            .finish_non_exhaustive()
    }
}

impl<T: Plain, G: GuardProtection> Default for GuardedBuffer<T, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Plain, G: GuardProtection> GuardedBuffer<T, G> {
    /// Creates a buffer that owns no storage yet.
    pub const fn new() -> Self {
        Self {
            storage: None,
            capacity: 0,
            #[cfg(any(test, feature = "test-utils"))]
            behaviour: GuardedBufferBehaviour::None,
            _marker: PhantomData,
        }
    }

    /// Number of element slots in the payload (0 while unallocated).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer currently owns storage.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.storage.is_some()
    }

    /// Allocates zeroed storage for `capacity` elements and writes the guards.
    ///
    /// `capacity` is raised to [`MIN_CAPACITY`].
    ///
    /// # Errors
    ///
    /// - [`BufferError::DoubleAllocation`] if the buffer already owns storage.
    ///   This is a re-initialization guard, not a reallocation path.
    /// - [`BufferError::AllocationFailure`] if memory cannot be obtained.
    pub fn allocate(&mut self, capacity: usize) -> Result<(), BufferError> {
        if self.capacity != 0 || self.storage.is_some() {
            return Err(BufferError::DoubleAllocation);
        }

        #[cfg(any(test, feature = "test-utils"))]
        if self.behaviour == GuardedBufferBehaviour::FailAtAllocate {
            return Err(BufferError::AllocationFailure);
        }

        let capacity = capacity.max(MIN_CAPACITY);
        let placement = Placement::for_capacity::<T, G>(capacity)?;
        let base = Self::obtain(placement.layout)?;

        self.storage = Some(Storage { base, placement });
        self.capacity = capacity;
        self.write_guards();

        Ok(())
    }

    /// Moves the payload into storage sized for `new_capacity` elements.
    ///
    /// The first `min(capacity, new_capacity)` slots are preserved, new slots
    /// are zero, guards are rewritten. The old storage is zeroized before it
    /// is released. `new_capacity` is raised to [`MIN_CAPACITY`].
    ///
    /// Truncating live data is the caller's decision: slots beyond
    /// `new_capacity` are simply not carried over.
    ///
    /// # Errors
    ///
    /// - [`BufferError::NotAllocated`] if there is no storage to move.
    /// - [`BufferError::AllocationFailure`] if the new storage cannot be
    ///   obtained. The current storage is left valid and unchanged.
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<(), BufferError> {
        let old = self.storage.ok_or(BufferError::NotAllocated)?;

        #[cfg(any(test, feature = "test-utils"))]
        if self.behaviour == GuardedBufferBehaviour::FailAtReallocate {
            return Err(BufferError::AllocationFailure);
        }

        let new_capacity = new_capacity.max(MIN_CAPACITY);
        let new = Placement::for_capacity::<T, G>(new_capacity)?;
        let new_base = Self::obtain(new.layout)?;

        let kept = self.capacity.min(new_capacity) * core::mem::size_of::<T>();
        // SAFETY (PRECONDITIONS ARE MET): both payloads hold at least `kept` bytes,
        // and the two allocations are distinct
        unsafe {
            core::ptr::copy_nonoverlapping(
                old.base.as_ptr().add(old.placement.payload_offset),
                new_base.as_ptr().add(new.payload_offset),
                kept,
            );
        }

        // SAFETY (PRECONDITIONS ARE MET): old.base was obtained with old.placement.layout
        unsafe { Self::wipe_and_free(old.base, old.placement.layout) };

        self.storage = Some(Storage {
            base: new_base,
            placement: new,
        });
        self.capacity = new_capacity;
        self.write_guards();

        Ok(())
    }

    /// Zeroizes all storage (guards included) and gives it back.
    ///
    /// Afterwards the buffer owns nothing and reports capacity 0; it may be
    /// allocated again. Releasing an unallocated buffer does nothing.
    pub fn release(&mut self) {
        if let Some(storage) = self.storage.take() {
            // SAFETY (PRECONDITIONS ARE MET): storage.base was obtained with storage.placement.layout
            unsafe { Self::wipe_and_free(storage.base, storage.placement.layout) };
        }

        self.capacity = 0;
    }

    /// The whole payload, `[0, capacity)`. Empty while unallocated.
    pub fn as_slice(&self) -> &[T] {
        match self.payload_ptr() {
            // SAFETY (PRECONDITIONS ARE MET): payload holds `capacity` initialized T
            Some(ptr) => unsafe { core::slice::from_raw_parts(ptr.cast::<T>(), self.capacity) },
            None => &[],
        }
    }

    /// The whole payload, mutably. Empty while unallocated.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.payload_ptr() {
            // SAFETY (PRECONDITIONS ARE MET): payload holds `capacity` initialized T,
            // exclusively borrowed through &mut self
            Some(ptr) => unsafe {
                core::slice::from_raw_parts_mut(ptr.cast::<T>(), self.capacity)
            },
            None => &mut [],
        }
    }

    /// Raw bytes of the first `len` slots (clamped to capacity).
    pub fn prefix_bytes(&self, len: usize) -> &[u8] {
        let slots = self.as_slice();
        as_bytes(&slots[..len.min(slots.len())])
    }

    /// Zeroizes slots `[from, to)` (clamped to capacity).
    pub fn zeroize_range(&mut self, from: usize, to: usize) {
        let slots = self.as_mut_slice();
        let to = to.min(slots.len());

        if from >= to {
            return;
        }

        let range = &mut slots[from..to];
        // SAFETY (PRECONDITIONS ARE MET): T: Plain accepts all-zero bytes
        unsafe {
            core::ptr::write_bytes(range.as_mut_ptr(), 0, range.len());
        }
        compiler_fence(Ordering::SeqCst);
    }

    /// Value held by the front payload guard, `None` while unallocated.
    pub fn front_guard(&self) -> Option<G::Canary> {
        let payload = self.payload_ptr()?;
        // SAFETY (PRECONDITIONS ARE MET): REGION_SIZE bytes precede the payload
        Some(unsafe { G::load(payload.sub(G::REGION_SIZE)) })
    }

    /// Value held by the back payload guard, `None` while unallocated.
    pub fn back_guard(&self) -> Option<G::Canary> {
        let payload = self.payload_ptr()?;
        let payload_len = self.capacity * core::mem::size_of::<T>();
        // SAFETY (PRECONDITIONS ARE MET): REGION_SIZE bytes follow the payload
        Some(unsafe { G::load(payload.add(payload_len)) })
    }

    fn payload_ptr(&self) -> Option<*mut u8> {
        let storage = self.storage?;
        // SAFETY (PRECONDITIONS ARE MET): payload_offset lies inside the allocation
        Some(unsafe { storage.base.as_ptr().add(storage.placement.payload_offset) })
    }

    fn write_guards(&mut self) {
        if !G::ENABLED {
            return;
        }

        let Some(Storage { base, placement }) = self.storage else {
            return;
        };

        // SAFETY (PRECONDITIONS ARE MET): both regions lie inside the allocation
        unsafe {
            G::store(base.as_ptr().add(placement.payload_offset - G::REGION_SIZE));
            G::store(base.as_ptr().add(placement.back_offset));
        }
    }

    fn obtain(layout: Layout) -> Result<NonNull<u8>, BufferError> {
        // SAFETY (PRECONDITIONS ARE MET): Placement::for_capacity rejects empty payloads,
        // so layout size is non-zero
        let ptr = unsafe { alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(BufferError::AllocationFailure)
    }

    /// # Safety
    ///
    /// `base` must have been obtained from [`Self::obtain`] with `layout` and
    /// not freed yet.
    unsafe fn wipe_and_free(base: NonNull<u8>, layout: Layout) {
        // SAFETY (PRECONDITIONS ARE MET): caller guarantees ownership of layout.size() bytes
        unsafe {
            core::ptr::write_bytes(base.as_ptr(), 0, layout.size());
            compiler_fence(Ordering::SeqCst);
            dealloc(base.as_ptr(), layout);
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl<T: Plain, G: GuardProtection> GuardedBuffer<T, G> {
    /// Changes the failure-injection behaviour.
    pub fn change_behaviour(&mut self, behaviour: GuardedBufferBehaviour) {
        self.behaviour = behaviour;
    }

    /// Raw bytes of the front guard region (empty when unguarded or unallocated).
    pub fn front_guard_bytes_mut(&mut self) -> &mut [u8] {
        match self.payload_ptr() {
            // SAFETY (PRECONDITIONS ARE MET): REGION_SIZE bytes precede the payload
            Some(payload) => unsafe {
                core::slice::from_raw_parts_mut(payload.sub(G::REGION_SIZE), G::REGION_SIZE)
            },
            None => &mut [],
        }
    }

    /// Raw bytes of the back guard region (empty when unguarded or unallocated).
    pub fn back_guard_bytes_mut(&mut self) -> &mut [u8] {
        let payload_len = self.capacity * core::mem::size_of::<T>();
        match self.payload_ptr() {
            // SAFETY (PRECONDITIONS ARE MET): REGION_SIZE bytes follow the payload
            Some(payload) => unsafe {
                core::slice::from_raw_parts_mut(payload.add(payload_len), G::REGION_SIZE)
            },
            None => &mut [],
        }
    }
}

impl<T: Plain, G: GuardProtection> Drop for GuardedBuffer<T, G> {
    fn drop(&mut self) {
        self.release();
    }
}
