//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::AdjusterId;
use domain_dispatch::{DispatchError, RosterView};
use domain_incident::IncidentError;

/// Asserts every adjuster appears in exactly one group
///
/// # Panics
///
/// Panics if the groups do not add up to `expected` or an id repeats.
pub fn assert_roster_partition(view: &RosterView, expected: usize) {
    assert_eq!(
        view.len(),
        expected,
        "Roster size mismatch: available={}, pending={}, unavailable={}",
        view.available.len(),
        view.pending.len(),
        view.unavailable.len()
    );

    let mut ids: Vec<&AdjusterId> = view
        .available
        .iter()
        .chain(&view.pending)
        .chain(&view.unavailable)
        .map(|a| &a.id)
        .collect();
    ids.sort();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total, "An adjuster appears in more than one group");
}

/// Asserts the groups hold exactly these ids, in any order
pub fn assert_groups(view: &RosterView, available: &[&str], pending: &[&str], unavailable: &[&str]) {
    fn keys(list: &[domain_dispatch::Adjuster]) -> Vec<String> {
        let mut keys: Vec<String> = list.iter().map(|a| a.id.to_string()).collect();
        keys.sort();
        keys
    }
    fn expected(ids: &[&str]) -> Vec<String> {
        let mut ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        ids.sort();
        ids
    }

    assert_eq!(keys(&view.available), expected(available), "available group");
    assert_eq!(keys(&view.pending), expected(pending), "pending group");
    assert_eq!(keys(&view.unavailable), expected(unavailable), "unavailable group");
}

/// Asserts the assigned adjuster is in the available group
pub fn assert_assigned_is_available(view: &RosterView) {
    if let Some(assigned) = &view.assigned {
        assert!(
            view.available.iter().any(|a| &a.id == assigned),
            "Assigned adjuster {} is not available",
            assigned
        );
    }
}

/// Asserts an intake failure names exactly these fields
pub fn assert_missing_fields(err: &DispatchError, expected: &[&str]) {
    match err {
        DispatchError::Incident(IncidentError::Validation { missing }) => {
            assert_eq!(missing.as_slice(), expected, "Missing field mismatch");
        }
        other => panic!("Expected an intake validation error, got {other:?}"),
    }
}
