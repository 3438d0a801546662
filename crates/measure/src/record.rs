//! Measurement sub-records attached to blocks and slabs.

use serde::{Deserialize, Serialize};

use stoneyard_core::{DomainError, DomainResult, ValueObject};

use crate::formula::{volume, weight_tonnes};
use crate::units::{Length, Mass};

/// Block measurement: gross, net, dressed or split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub length: Length,
    pub breadth: Length,
    pub height: Length,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Mass>,
    /// Storage URL returned by the upload service. Opaque to this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl ValueObject for Dimensions {}

impl Dimensions {
    pub fn new(length: Length, breadth: Length, height: Length) -> Self {
        Self {
            length,
            breadth,
            height,
            weight: None,
            photo: None,
        }
    }

    pub fn with_weight(mut self, weight: Mass) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo = Some(url.into());
        self
    }

    /// Volume in m³, normalizing every side to centimeters first.
    pub fn volume(&self) -> f64 {
        volume(
            self.length.to_cm(),
            self.breadth.to_cm(),
            self.height.to_cm(),
        )
    }

    /// Recorded weight if present, otherwise volume × `density`.
    pub fn weight_tonnes(&self, density: f64) -> f64 {
        match self.weight {
            Some(w) => w.to_tonnes(),
            None => weight_tonnes(self.volume(), density),
        }
    }

    /// Fill in `weight` from the volume when the form left it blank.
    pub fn with_derived_weight(mut self, density: f64) -> Self {
        if self.weight.is_none() {
            self.weight = Some(Mass::tonnes(weight_tonnes(self.volume(), density)));
        }
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.length.validate("length")?;
        self.breadth.validate("breadth")?;
        self.height.validate("height")?;
        if let Some(w) = &self.weight {
            w.validate("weight")?;
        }
        Ok(())
    }

    /// Processing only removes material: `self` (net) may not exceed `gross`
    /// in volume or, when both are recorded, in weight.
    pub fn ensure_within(&self, gross: &Dimensions) -> DomainResult<()> {
        if self.volume() > gross.volume() {
            return Err(DomainError::invariant(
                "net volume cannot exceed gross volume",
            ));
        }
        if let (Some(net), Some(gross)) = (self.weight, gross.weight) {
            if net.to_tonnes() > gross.to_tonnes() {
                return Err(DomainError::invariant(
                    "net weight cannot exceed gross weight",
                ));
            }
        }
        Ok(())
    }
}

/// Raw cut measurement of a slab (inch-based at finishing stages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabDimensions {
    pub length: Length,
    pub height: Length,
    pub thickness: Length,
    pub breadth: Length,
}

impl ValueObject for SlabDimensions {}

impl SlabDimensions {
    pub fn validate(&self) -> DomainResult<()> {
        self.length.validate("length")?;
        self.height.validate("height")?;
        self.thickness.validate("thickness")?;
        self.breadth.validate("breadth")
    }
}

/// Material removed for edge finishing during polishing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trim {
    pub length: Length,
    pub height: Length,
}

impl ValueObject for Trim {}

impl Trim {
    pub fn validate(&self) -> DomainResult<()> {
        self.length.validate("trim length")?;
        self.height.validate("trim height")
    }
}

/// Final measurement after polishing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolishedValues {
    pub length: Length,
    pub height: Length,
}

impl ValueObject for PolishedValues {}

impl PolishedValues {
    pub fn validate(&self) -> DomainResult<()> {
        self.length.validate("polished length")?;
        self.height.validate("polished height")
    }
}
