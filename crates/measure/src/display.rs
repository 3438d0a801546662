//! Display formatting and form-input parsing.

use stoneyard_core::{DomainError, DomainResult};

/// Format with exactly two fractional digits, or `""` when `value` is NaN or
/// infinite.
pub fn fixed2(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    // Avoid rendering "-0.00".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

/// Parse a numeric form field, rejecting non-numeric and negative input.
pub fn parse_measure(raw: &str) -> DomainResult<f64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::malformed(format!("'{trimmed}' is not a number")))?;
    if !value.is_finite() {
        return Err(DomainError::malformed(format!("'{trimmed}' is not a number")));
    }
    if value < 0.0 {
        return Err(DomainError::malformed(format!("'{trimmed}' cannot be negative")));
    }
    Ok(value)
}

/// A derived number that may be unavailable.
///
/// Renders as the plain number, or as an empty string when it could not be
/// computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure(Option<f64>);

impl Figure {
    pub const NOT_AVAILABLE: Figure = Figure(None);

    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self::NOT_AVAILABLE
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_available(&self) -> bool {
        self.0.is_some()
    }
}

impl core::fmt::Display for Figure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => Ok(()),
        }
    }
}
