// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Source locations used for diagnostics only.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// A point in the program: function (when known), file and line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    function: Option<&'static str>,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// A fully described site. Usually built through [`call_site!`](crate::call_site).
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function: Some(function),
            file,
            line,
        }
    }

    /// The site that called the current `#[track_caller]` function.
    ///
    /// The function name is not available this way.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();

        Self {
            function: None,
            file: location.file(),
            line: location.line(),
        }
    }

    /// Enclosing function, if it was captured.
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Source file.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t-function name : {}", self.function.unwrap_or("<unknown>"))?;
        writeln!(f, "\t-file name : {}", self.file)?;
        writeln!(f, "\t-file line : {}", self.line)
    }
}

/// Where a stack instance was declared and what it is called.
///
/// Immutable after construction, never consulted for correctness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    name: Cow<'static, str>,
    site: CallSite,
}

impl Provenance {
    /// Names an instance declared at `site`. See [`provenance!`](crate::provenance).
    pub fn new(name: impl Into<Cow<'static, str>>, site: CallSite) -> Self {
        Self {
            name: name.into(),
            site,
        }
    }

    /// Human-assigned name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration site.
    pub fn site(&self) -> &CallSite {
        &self.site
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Captures the current function, file and line as a [`CallSite`].
///
/// ```rust
/// let site = rampart::call_site!();
/// assert_eq!(site.file(), file!());
/// assert!(site.function().is_some());
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new($crate::__function_name!(), ::core::file!(), ::core::line!())
    };
}

/// Names a stack instance at its declaration site.
///
/// ```rust
/// let provenance = rampart::provenance!("stk1");
/// assert_eq!(provenance.name(), "stk1");
/// assert_eq!(provenance.site().file(), file!());
/// ```
#[macro_export]
macro_rules! provenance {
    ($name:expr) => {
        $crate::Provenance::new($name, $crate::call_site!())
    };
}
