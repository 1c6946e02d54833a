// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Where failures and diagnostic dumps go.
//!
//! Two independent sinks:
//!
//! - [`LogSink`] receives one `(kind, site)` record per failure, corruption
//!   or not.
//! - [`DumpSink`] receives the full-state text dump, written on request or
//!   when a corruption is detected.
//!
//! The defaults ([`TracingLog`], [`TracingDump`]) forward to `tracing`.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StackError;
use crate::location::CallSite;

/// Receives failure records.
pub trait LogSink {
    /// Records that `kind` was detected at `site`.
    fn record(&self, kind: StackError, site: &CallSite);
}

/// Receives rendered diagnostic dumps.
pub trait DumpSink {
    /// Persists one dump.
    fn write_dump(&self, dump: &str) -> io::Result<()>;
}

/// Logs failures as `tracing` events.
///
/// Corruption is logged at `ERROR`, allocation and output failures at
/// `WARN`, empty pops at `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn record(&self, kind: StackError, site: &CallSite) {
        let function = site.function().unwrap_or("<unknown>");

        if kind.is_corruption() {
            tracing::error!(?kind, file = site.file(), line = site.line(), function, "{kind}");
        } else if kind == StackError::EmptyPop {
            tracing::debug!(?kind, file = site.file(), line = site.line(), function, "{kind}");
        } else {
            tracing::warn!(?kind, file = site.file(), line = site.line(), function, "{kind}");
        }
    }
}

/// Emits each dump as a single `ERROR` event on the `rampart::dump` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDump;

impl DumpSink for TracingDump {
    fn write_dump(&self, dump: &str) -> io::Result<()> {
        tracing::error!(target: "rampart::dump", "\n{dump}");
        Ok(())
    }
}

/// Writes each dump to a named file, replacing what was there.
#[derive(Debug, Clone)]
pub struct FileDump {
    path: PathBuf,
}

impl FileDump {
    /// Dumps go to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DumpSink for FileDump {
    fn write_dump(&self, dump: &str) -> io::Result<()> {
        fs::write(&self.path, dump)
    }
}

/// One record captured by [`MemoryLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// Reported kind.
    pub kind: StackError,
    /// Where it was detected.
    pub site: CallSite,
}

/// Keeps failure records in memory. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Rc<RefCell<Vec<LogRecord>>>,
}

impl MemoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records captured so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    /// Kinds captured so far, oldest first.
    pub fn kinds(&self) -> Vec<StackError> {
        self.records.borrow().iter().map(|r| r.kind).collect()
    }
}

impl LogSink for MemoryLog {
    fn record(&self, kind: StackError, site: &CallSite) {
        self.records.borrow_mut().push(LogRecord { kind, site: *site });
    }
}

/// Keeps dumps in memory. Clones share the same dumps.
#[derive(Debug, Clone, Default)]
pub struct MemoryDump {
    dumps: Rc<RefCell<Vec<String>>>,
}

impl MemoryDump {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dumps captured so far, oldest first.
    pub fn dumps(&self) -> Vec<String> {
        self.dumps.borrow().clone()
    }

    /// Number of dumps captured.
    pub fn len(&self) -> usize {
        self.dumps.borrow().len()
    }

    /// Whether nothing was dumped.
    pub fn is_empty(&self) -> bool {
        self.dumps.borrow().is_empty()
    }
}

impl DumpSink for MemoryDump {
    fn write_dump(&self, dump: &str) -> io::Result<()> {
        self.dumps.borrow_mut().push(dump.to_owned());
        Ok(())
    }
}

/// The pair of sinks attached to a stack.
pub struct Reporter {
    log: Box<dyn LogSink>,
    dump: Box<dyn DumpSink>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(TracingLog, TracingDump)
    }
}

impl Reporter {
    /// Combines a log sink and a dump sink.
    pub fn new(log: impl LogSink + 'static, dump: impl DumpSink + 'static) -> Self {
        Self {
            log: Box::new(log),
            dump: Box::new(dump),
        }
    }

    pub(crate) fn record(&self, kind: StackError, site: &CallSite) {
        self.log.record(kind, site);
    }

    pub(crate) fn dump(&self, dump: &str) -> io::Result<()> {
        self.dump.write_dump(dump)
    }
}
