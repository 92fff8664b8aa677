//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::distance::DistanceError;
use core_kernel::temporal::TemporalError;
use rust_decimal_macros::dec;

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("search radius must be positive");

    match error {
        CoreError::Configuration(ref msg) => assert!(msg.contains("radius")),
        _ => panic!("Expected Configuration error"),
    }
    assert!(error.to_string().starts_with("Configuration error"));
}

#[test]
fn test_core_error_from_distance_error() {
    let core_error: CoreError = DistanceError::Negative(dec!(-2)).into();
    assert!(matches!(core_error, CoreError::Distance(_)));
    assert!(core_error.to_string().contains("negative"));
}

#[test]
fn test_core_error_from_temporal_error() {
    let core_error: CoreError = TemporalError::InvalidTimezone("Mars/Base".to_string()).into();
    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("Mars/Base"));
}
