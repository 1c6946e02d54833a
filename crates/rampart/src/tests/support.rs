// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use rampart_buffer::Plain;
use rampart_checksum::ChecksumProtection;
use rampart_guard::GuardProtection;

use crate::{MemoryDump, MemoryLog, Reporter, Stack, provenance};

/// A stack wired to in-memory sinks, with handles to inspect them.
pub(crate) struct Observed<T: Plain, G: GuardProtection, C: ChecksumProtection> {
    pub stack: Stack<T, G, C>,
    pub log: MemoryLog,
    pub dumps: MemoryDump,
}

pub(crate) fn observed<T: Plain, G: GuardProtection, C: ChecksumProtection>(
    capacity: usize,
) -> Observed<T, G, C> {
    let log = MemoryLog::new();
    let dumps = MemoryDump::new();

    let stack = Stack::with_capacity_and_reporter(
        capacity,
        provenance!("observed"),
        Reporter::new(log.clone(), dumps.clone()),
    )
    .expect("Failed to with_capacity_and_reporter(..)");

    Observed { stack, log, dumps }
}

pub(crate) fn push_all<T: Plain, G: GuardProtection, C: ChecksumProtection>(
    stack: &mut Stack<T, G, C>,
    values: impl IntoIterator<Item = T>,
) {
    for value in values {
        stack.push(value).expect("Failed to push(..)");
    }
}
