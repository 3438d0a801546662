//! `{value, units}` quantities as captured by the intake and finishing forms.

use serde::{Deserialize, Serialize};

use stoneyard_core::{DomainError, DomainResult, ValueObject};

pub const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    Inch,
}

/// Weight units offered by the forms. Both are recorded as metric tonnes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    T,
    Tons,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub units: LengthUnit,
}

impl ValueObject for Length {}

impl Length {
    pub fn cm(value: f64) -> Self {
        Self {
            value,
            units: LengthUnit::Cm,
        }
    }

    pub fn inch(value: f64) -> Self {
        Self {
            value,
            units: LengthUnit::Inch,
        }
    }

    pub fn to_cm(&self) -> f64 {
        match self.units {
            LengthUnit::Cm => self.value,
            LengthUnit::Inch => self.value * CM_PER_INCH,
        }
    }

    pub fn to_inches(&self) -> f64 {
        match self.units {
            LengthUnit::Cm => self.value / CM_PER_INCH,
            LengthUnit::Inch => self.value,
        }
    }

    /// `field` names the offending input in the error message.
    pub fn validate(&self, field: &str) -> DomainResult<()> {
        check_non_negative(self.value, field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub value: f64,
    pub units: MassUnit,
}

impl ValueObject for Mass {}

impl Mass {
    pub fn tonnes(value: f64) -> Self {
        Self {
            value,
            units: MassUnit::T,
        }
    }

    pub fn to_tonnes(&self) -> f64 {
        match self.units {
            MassUnit::T | MassUnit::Tons => self.value,
        }
    }

    pub fn validate(&self, field: &str) -> DomainResult<()> {
        check_non_negative(self.value, field)
    }
}

pub(crate) fn check_non_negative(value: f64, field: &str) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::malformed(format!("{field} is not a number")));
    }
    if value < 0.0 {
        return Err(DomainError::malformed(format!("{field} cannot be negative")));
    }
    Ok(())
}
