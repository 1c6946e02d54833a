// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::fmt;

use rampart_buffer::Plain;
use rampart_checksum::ChecksumProtection;
use rampart_guard::GuardProtection;

use crate::location::{CallSite, Provenance};

/// Full-state copy of a stack, taken for diagnostics.
///
/// Fields are declared in the order the dump renders them. Guard and
/// checksum values are `None` when the corresponding protection is off.
#[derive(Debug, Clone)]
pub struct Snapshot<T: Plain, G: GuardProtection, C: ChecksumProtection> {
    /// Name and declaration site of the instance.
    pub provenance: Provenance,
    /// Site that asked for the snapshot.
    pub site: CallSite,
    /// Live element count.
    pub len: usize,
    /// Allocated slot count.
    pub capacity: usize,
    /// Sentinel in front of the field block.
    pub field_front_guard: Option<G::Canary>,
    /// Sentinel in front of the payload.
    pub payload_front_guard: Option<G::Canary>,
    /// Every slot `[0, capacity)`; the first `len` are live.
    pub slots: Vec<T>,
    /// Sentinel behind the payload.
    pub payload_back_guard: Option<G::Canary>,
    /// Sentinel behind the field block.
    pub field_back_guard: Option<G::Canary>,
    /// Stored checksum.
    pub checksum: Option<C::Digest>,
}

impl<T: Plain, G: GuardProtection, C: ChecksumProtection> Snapshot<T, G, C> {
    /// Live slots `[0, len)` (clamped to what was captured).
    pub fn live(&self) -> &[T] {
        &self.slots[..self.len.min(self.slots.len())]
    }

    /// Reserved slots `[len, capacity)`.
    pub fn reserved(&self) -> &[T] {
        &self.slots[self.len.min(self.slots.len())..]
    }
}

fn guard_line<V: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    label: &str,
    value: &Option<V>,
) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "{indent}{label} - {v:#X?}"),
        None => Ok(()),
    }
}

impl<T: Plain, G: GuardProtection, C: ChecksumProtection> fmt::Display for Snapshot<T, G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.provenance.name();

        writeln!(f, "Stack name : {name}")?;
        writeln!(f, "Stack variable location in the program :")?;
        write!(f, "{}", self.provenance.site())?;
        writeln!(f)?;

        writeln!(f, "Called from :")?;
        write!(f, "{}", self.site)?;
        writeln!(f)?;

        writeln!(f, "{name}")?;
        writeln!(f, "{{")?;
        writeln!(f, "  size - {}", self.len)?;
        writeln!(f, "  capacity - {}", self.capacity)?;
        guard_line(f, "  ", "front guard", &self.field_front_guard)?;
        writeln!(f, "  data")?;
        writeln!(f, "    {{")?;
        guard_line(f, "    ", "buffer front guard", &self.payload_front_guard)?;

        let live = self.live().len();
        for (i, slot) in self.slots.iter().enumerate() {
            let marker = if i < live { "*" } else { " " };
            writeln!(f, "      {marker}[{i}] = {slot:?}")?;
        }

        guard_line(f, "    ", "buffer back guard", &self.payload_back_guard)?;
        writeln!(f, "    }}")?;
        guard_line(f, "  ", "back guard", &self.field_back_guard)?;

        if let Some(checksum) = &self.checksum {
            writeln!(f, "  checksum - {checksum:?}")?;
        }

        writeln!(f, "}}")
    }
}
