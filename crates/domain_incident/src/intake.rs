//! Incident intake
//!
//! The intake form carries seven fields. Four of them are required:
//! customer name, caller number, loss location and the accident description.
//! A field holding only whitespace counts as missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IncidentError;
use crate::incident::Incident;

/// Raw incident details as submitted from the intake form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub customer_name: String,
    #[serde(default)]
    pub caller_name: String,
    pub caller_number: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub driver_number: String,
    pub loss_location: String,
    pub accident_description: String,
}

impl IncidentReport {
    /// Key identifying "the same submission" for duplicate-submit protection
    pub fn fingerprint(&self) -> String {
        [
            &self.customer_name,
            &self.caller_number,
            &self.loss_location,
            &self.accident_description,
        ]
        .iter()
        .map(|field| field.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
    }

    /// Non-fatal observations about an otherwise acceptable report
    pub fn warnings(&self) -> Vec<String> {
        IntakeValidator::validate(self).warnings
    }

    /// Validates the report and produces an active incident
    pub fn into_incident(self, reported_at: DateTime<Utc>) -> Result<Incident, IncidentError> {
        let result = IntakeValidator::validate(&self);
        if !result.is_valid {
            return Err(IncidentError::Validation { missing: result.missing });
        }
        Ok(Incident::from_report(self, reported_at))
    }
}

/// Result of intake validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the report may become an incident
    pub is_valid: bool,
    /// Required fields that were empty, in form order
    pub missing: Vec<&'static str>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            missing: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_missing(&mut self, field: &'static str) {
        self.missing.push(field);
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for the intake form
pub struct IntakeValidator;

impl IntakeValidator {
    /// Checks required-field presence
    ///
    /// Every missing field is reported, not only the first.
    pub fn validate(report: &IncidentReport) -> ValidationResult {
        let mut result = ValidationResult::ok();

        let required: [(&'static str, &str); 4] = [
            ("customer_name", &report.customer_name),
            ("caller_number", &report.caller_number),
            ("loss_location", &report.loss_location),
            ("accident_description", &report.accident_description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                result.add_missing(field);
            }
        }

        if !report.driver_name.trim().is_empty() && report.driver_number.trim().is_empty() {
            result.add_warning("Driver name given without a driver number");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_report() -> IncidentReport {
        IncidentReport {
            customer_name: "Acme Corp".to_string(),
            caller_name: "Officer Pete Wilson".to_string(),
            caller_number: "415-555-0142".to_string(),
            driver_name: "Sarah Chen".to_string(),
            driver_number: "415-555-0178".to_string(),
            loss_location: "Highway 101, San Francisco, CA".to_string(),
            accident_description: "Two-car collision, northbound".to_string(),
        }
    }

    #[test]
    fn test_complete_report_is_valid() {
        let result = IntakeValidator::validate(&complete_report());
        assert!(result.is_valid);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let report = IncidentReport {
            loss_location: "   ".to_string(),
            ..complete_report()
        };
        let result = IntakeValidator::validate(&report);
        assert!(!result.is_valid);
        assert_eq!(result.missing, vec!["loss_location"]);
    }

    #[test]
    fn test_optional_fields_not_required() {
        let report = IncidentReport {
            caller_name: String::new(),
            driver_name: String::new(),
            driver_number: String::new(),
            ..complete_report()
        };
        assert!(IntakeValidator::validate(&report).is_valid);
    }

    #[test]
    fn test_driver_name_without_number_warns() {
        let report = IncidentReport {
            driver_number: " ".to_string(),
            ..complete_report()
        };
        assert!(IntakeValidator::validate(&report).is_valid);
        assert_eq!(report.warnings(), vec!["Driver name given without a driver number"]);
        assert!(complete_report().warnings().is_empty());
    }

    #[test]
    fn test_fingerprint_ignores_case_and_padding() {
        let a = complete_report();
        let b = IncidentReport {
            customer_name: "  ACME corp ".to_string(),
            ..complete_report()
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
