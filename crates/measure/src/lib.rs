//! Measurement & costing engine for stone blocks and slabs.
//!
//! Everything in this crate is a pure function of its inputs: unit
//! normalization, volume/weight derivation, the polishing allowance formula,
//! square-footage and payment amounts, and footer totals.
//!
//! Display-oriented functions return 2-decimal strings and degrade to an empty
//! string when an input cannot be computed, so a render pass shows a blank
//! cell instead of failing. Input validation that must fail loudly goes through
//! [`parse_measure`] and the record `validate()` methods instead.

pub mod costing;
pub mod display;
pub mod formula;
pub mod record;
pub mod totals;
pub mod units;

pub use costing::{polishing_costing, PolishingCosting};
pub use display::{fixed2, parse_measure, Figure};
pub use formula::{
    adjusted_dimension, polishing_amount, square_feet, to_centimeters, volume, weight,
    weight_tonnes, AdjustedDimensions, DEFAULT_DENSITY,
};
pub use record::{Dimensions, PolishedValues, SlabDimensions, Trim};
pub use totals::{aggregate, aggregate_display};
pub use units::{Length, LengthUnit, Mass, MassUnit};
