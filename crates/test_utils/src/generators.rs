//! Test Data Generators
//!
//! Provides proptest strategies that respect domain invariants, and
//! `fake`-backed helpers for realistic-looking names and numbers.

use core_kernel::{AdjusterId, Distance};
use domain_dispatch::{Adjuster, ResponseOutcome};
use domain_incident::IncidentReport;
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for an adjuster answer
pub fn outcome_strategy() -> impl Strategy<Value = ResponseOutcome> {
    prop_oneof![Just(ResponseOutcome::Available), Just(ResponseOutcome::Unavailable)]
}

/// Strategy for distances from 0.0 to 150.0 miles in tenths
pub fn distance_strategy() -> impl Strategy<Value = Distance> {
    (0u32..=1500u32).prop_map(Distance::from_tenths)
}

/// Strategy for distances from 0.00 to 150.00 miles in hundredths
///
/// Unlike `distance_strategy`, these hit ETA rounding midpoints such as
/// 2.50 miles.
pub fn precise_distance_strategy() -> impl Strategy<Value = Distance> {
    (0i64..=15_000i64)
        .prop_filter_map("non-negative miles", |hundredths| {
            Distance::miles(Decimal::new(hundredths, 2)).ok()
        })
}

/// Strategy for phone numbers like `(555) 123-4567`
pub fn phone_strategy() -> impl Strategy<Value = String> {
    (100u32..999u32, 1000u32..9999u32)
        .prop_map(|(prefix, line)| format!("(555) {}-{}", prefix, line))
}

/// Strategy for names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10} [A-Z][a-z]{2,10}".prop_map(|s| s)
}

/// Strategy for a roster of `size` adjusters with ids "1".."size"
pub fn roster_strategy(size: usize) -> impl Strategy<Value = Vec<Adjuster>> {
    proptest::collection::vec((name_strategy(), phone_strategy(), distance_strategy()), size)
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, phone, distance))| {
                    Adjuster::new((i + 1).to_string(), name, phone, distance)
                })
                .collect()
        })
}

/// Strategy for a sequence of answers against ids "1"..="roster_size"
///
/// Ids may repeat, so later answers exercise the already-resolved path.
pub fn response_sequence_strategy(
    roster_size: usize,
    len: usize,
) -> impl Strategy<Value = Vec<(AdjusterId, ResponseOutcome)>> {
    proptest::collection::vec((1..=roster_size, outcome_strategy()), 0..=len).prop_map(|steps| {
        steps
            .into_iter()
            .map(|(n, outcome)| (AdjusterId::new(n.to_string()), outcome))
            .collect()
    })
}

/// Strategy for a complete intake report; whitespace is never the whole value
pub fn report_strategy() -> impl Strategy<Value = IncidentReport> {
    (
        "[A-Za-z][A-Za-z ]{0,30}",
        phone_strategy(),
        "[A-Za-z][A-Za-z ,]{0,40}",
        "[A-Za-z][A-Za-z ,.]{0,80}",
    )
        .prop_map(|(customer, phone, location, description)| IncidentReport {
            customer_name: customer,
            caller_number: phone,
            loss_location: location,
            accident_description: description,
            ..IncidentReport::default()
        })
}

/// A plausible report with random content
pub fn fake_report() -> IncidentReport {
    IncidentReport {
        customer_name: CompanyName().fake(),
        caller_name: Name().fake(),
        caller_number: fake_phone(),
        driver_name: Name().fake(),
        driver_number: fake_phone(),
        loss_location: CityName().fake(),
        accident_description: Sentence(4..10).fake(),
    }
}

/// An adjuster with a random name and phone
pub fn fake_adjuster(id: impl Into<AdjusterId>, miles: u32) -> Adjuster {
    let name: String = Name().fake();
    Adjuster::new(id, name, fake_phone(), Distance::whole_miles(miles))
}

fn fake_phone() -> String {
    let prefix: u32 = (100..999).fake();
    let line: u32 = (1000..9999).fake();
    format!("(555) {}-{}", prefix, line)
}
