// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::{CallSite, call_site, provenance};

#[test]
fn test_call_site_captures_function() {
    let site = call_site!();

    assert_eq!(
        site.function(),
        Some("rampart::tests::location::test_call_site_captures_function")
    );
    assert_eq!(site.file(), file!());
    assert_eq!(site.line(), line!() - 7);
}

#[test]
fn test_call_site_inside_closure() {
    let site = (|| call_site!())();

    assert_eq!(
        site.function(),
        Some("rampart::tests::location::test_call_site_inside_closure")
    );
}

#[test]
fn test_caller_has_no_function() {
    let site = CallSite::caller();

    assert_eq!(site.function(), None);
    assert!(site.to_string().contains("\t-function name : <unknown>\n"));
}

#[test]
fn test_call_site_display() {
    let site = CallSite::new("main", "src/main.rs", 12);

    assert_eq!(
        site.to_string(),
        "\t-function name : main\n\t-file name : src/main.rs\n\t-file line : 12\n"
    );
}

#[test]
fn test_provenance_owned_name() {
    let name = format!("stk{}", 3);
    let provenance = provenance!(name);

    assert_eq!(provenance.name(), "stk3");
    assert_eq!(provenance.site().file(), file!());
}
