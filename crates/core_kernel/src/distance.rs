//! Distance types with precise decimal arithmetic
//!
//! Distances from an adjuster to a loss location are supplied by the roster
//! source in miles (e.g. `3.2`). They use rust_decimal so that ETA rounding is
//! exact and reproducible across platforms.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Minutes of travel assumed per mile when deriving an ETA
pub const ETA_MINUTES_PER_MILE: Decimal = dec!(3);

/// Errors that can occur when constructing distances
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistanceError {
    #[error("Distance cannot be negative: {0}")]
    Negative(Decimal),

    #[error("Invalid distance: {0}")]
    Invalid(String),
}

/// A non-negative distance in miles
///
/// Stored with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Distance(Decimal);

impl Distance {
    /// Creates a distance from a decimal number of miles
    pub fn miles(value: Decimal) -> Result<Self, DistanceError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DistanceError::Negative(value));
        }
        Ok(Self(value.round_dp(2)))
    }

    /// Creates a distance from whole miles
    pub fn whole_miles(value: u32) -> Self {
        Self(Decimal::from(value))
    }

    /// Creates a distance from tenths of a mile (32 -> 3.2 miles)
    pub fn from_tenths(tenths: u32) -> Self {
        Self(Decimal::new(tenths as i64, 1))
    }

    /// A zero distance
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the distance in miles
    pub fn as_miles(&self) -> Decimal {
        self.0
    }

    /// Returns true if this distance is within the given radius (inclusive)
    pub fn within(&self, radius: Distance) -> bool {
        self.0 <= radius.0
    }

    /// Estimated minutes to arrive, `round(miles * 3)` with midpoints rounded away from zero
    pub fn eta_minutes(&self) -> u32 {
        (self.0 * ETA_MINUTES_PER_MILE)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(u32::MAX)
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} miles", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Distance {
    type Error = DistanceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::miles(value)
    }
}

impl TryFrom<f64> for Distance {
    type Error = DistanceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let decimal = Decimal::try_from(value)
            .map_err(|e| DistanceError::Invalid(e.to_string()))?;
        Self::miles(decimal)
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Distance::miles(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eta_whole_miles() {
        assert_eq!(Distance::whole_miles(22).eta_minutes(), 66);
        assert_eq!(Distance::whole_miles(0).eta_minutes(), 0);
    }

    #[test]
    fn test_eta_fractional_miles() {
        // 3.2 * 3 = 9.6
        assert_eq!(Distance::from_tenths(32).eta_minutes(), 10);
        // 2.5 * 3 = 7.5 rounds away from zero
        assert_eq!(Distance::from_tenths(25).eta_minutes(), 8);
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Distance::miles(dec!(-1.5)),
            Err(DistanceError::Negative(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Distance::from_tenths(32).to_string(), "3.2 miles");
        assert_eq!(Distance::whole_miles(15).to_string(), "15 miles");
    }
}
