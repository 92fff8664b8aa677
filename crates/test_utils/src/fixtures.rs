//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for intake and dispatch.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{AdjusterId, Distance, ManualClock, Timezone};
use domain_dispatch::Adjuster;
use domain_incident::IncidentReport;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Incident reported at 10:00 Pacific (Mar 12, 2024)
    pub fn reported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 12, 17, 0, 0).unwrap()
    }

    /// Late evening in Los Angeles, already the next day in UTC
    pub fn late_evening_pacific() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 6, 30, 0).unwrap()
    }

    /// The local date of `reported_at` in Los Angeles
    pub fn reported_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    }

    /// `reported_at` plus `minutes`
    pub fn minutes_later(minutes: i64) -> DateTime<Utc> {
        Self::reported_at() + Duration::minutes(minutes)
    }

    /// A manual clock parked at `reported_at`
    pub fn clock() -> ManualClock {
        ManualClock::new(Self::reported_at())
    }

    pub fn pacific() -> Timezone {
        Timezone::new(chrono_tz::America::Los_Angeles)
    }
}

/// Fixture for adjusters
pub struct AdjusterFixtures;

impl AdjusterFixtures {
    /// Five adjusters within 35 miles, all pending
    pub fn roster() -> Vec<Adjuster> {
        vec![
            Adjuster::new("1", "John Smith", "(555) 123-4567", Distance::whole_miles(15)),
            Adjuster::new("2", "Sarah Johnson", "(555) 234-5678", Distance::whole_miles(8)),
            Adjuster::new("3", "Michael Davis", "(555) 345-6789", Distance::whole_miles(22)),
            Adjuster::new("4", "Jessica Williams", "(555) 456-7890", Distance::whole_miles(35)),
            Adjuster::new("5", "Robert Brown", "(555) 567-8901", Distance::whole_miles(12)),
        ]
    }

    /// An adjuster beyond the default search radius
    pub fn distant() -> Adjuster {
        Adjuster::new("9", "Linda Far", "(555) 999-0000", Distance::whole_miles(140))
    }

    pub fn id(key: &str) -> AdjusterId {
        AdjusterId::from(key)
    }
}

/// Fixture for intake reports
pub struct ReportFixtures;

impl ReportFixtures {
    /// A report with every required field filled
    pub fn complete() -> IncidentReport {
        IncidentReport {
            customer_name: "Acme Corp".to_string(),
            caller_name: "Jane Doe".to_string(),
            caller_number: "(555) 987-6543".to_string(),
            driver_name: "Bob Driver".to_string(),
            driver_number: "(555) 555-0101".to_string(),
            loss_location: "Downtown LA, CA".to_string(),
            accident_description: "Rear-end collision at a stop light".to_string(),
        }
    }

    /// A report with nothing but the customer name
    pub fn customer_only() -> IncidentReport {
        IncidentReport {
            customer_name: "Acme Corp".to_string(),
            ..IncidentReport::default()
        }
    }
}
