//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, Utc};
use core_kernel::{AdjusterId, Distance};
use domain_dispatch::Adjuster;
use domain_incident::{Incident, IncidentError, IncidentReport};

use crate::fixtures::{ReportFixtures, TemporalFixtures};

/// Builder for intake reports
pub struct IncidentReportBuilder {
    report: IncidentReport,
}

impl Default for IncidentReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentReportBuilder {
    /// Starts from a complete report
    pub fn new() -> Self {
        Self {
            report: ReportFixtures::complete(),
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.report.customer_name = name.into();
        self
    }

    pub fn with_caller(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.report.caller_name = name.into();
        self.report.caller_number = number.into();
        self
    }

    pub fn with_driver(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.report.driver_name = name.into();
        self.report.driver_number = number.into();
        self
    }

    /// Leaves out the optional driver details
    pub fn without_driver(self) -> Self {
        self.with_driver("", "")
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.report.loss_location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.report.accident_description = description.into();
        self
    }

    /// Blanks a required field by its form name
    ///
    /// # Panics
    ///
    /// Panics on a name that is not a required intake field.
    pub fn missing(mut self, field: &str) -> Self {
        let slot = match field {
            "customer_name" => &mut self.report.customer_name,
            "caller_number" => &mut self.report.caller_number,
            "loss_location" => &mut self.report.loss_location,
            "accident_description" => &mut self.report.accident_description,
            other => panic!("{other} is not a required intake field"),
        };
        slot.clear();
        self
    }

    pub fn build(self) -> IncidentReport {
        self.report
    }

    /// Validates the report into an incident reported at the fixture time
    pub fn into_incident(self) -> Result<Incident, IncidentError> {
        self.into_incident_at(TemporalFixtures::reported_at())
    }

    pub fn into_incident_at(self, at: DateTime<Utc>) -> Result<Incident, IncidentError> {
        self.report.into_incident(at)
    }
}

/// Builder for roster candidates
pub struct AdjusterBuilder {
    id: AdjusterId,
    name: String,
    phone: String,
    distance: Distance,
}

impl AdjusterBuilder {
    pub fn new(id: impl Into<AdjusterId>) -> Self {
        Self {
            id: id.into(),
            name: "Test Adjuster".to_string(),
            phone: "(555) 000-0000".to_string(),
            distance: Distance::whole_miles(10),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn at_miles(mut self, miles: u32) -> Self {
        self.distance = Distance::whole_miles(miles);
        self
    }

    pub fn at_tenths(mut self, tenths: u32) -> Self {
        self.distance = Distance::from_tenths(tenths);
        self
    }

    pub fn build(self) -> Adjuster {
        Adjuster::new(self.id, self.name, self.phone, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_becomes_incident() {
        let incident = IncidentReportBuilder::new().into_incident().unwrap();
        assert_eq!(incident.customer_name, "Acme Corp");
        assert_eq!(incident.created_at, TemporalFixtures::reported_at());
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = IncidentReportBuilder::new()
            .missing("caller_number")
            .missing("loss_location")
            .into_incident()
            .unwrap_err();
        assert_eq!(err.missing_fields(), &["caller_number", "loss_location"]);
    }

    #[test]
    fn test_adjuster_builder_eta() {
        let adjuster = AdjusterBuilder::new("7").at_tenths(32).build();
        assert_eq!(adjuster.distance.eta_minutes(), 10);
        assert!(adjuster.state().is_pending());
    }
}
