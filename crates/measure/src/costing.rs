//! Workers' polishing pay for a single slab.

use crate::display::{fixed2, Figure};
use crate::formula::{adjusted_dimension, polishing_amount, square_feet, AdjustedDimensions};
use crate::record::{SlabDimensions, Trim};

/// One row of the polishing pay sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PolishingCosting {
    pub adjusted: AdjustedDimensions,
    pub square_feet: String,
    pub amount: String,
    pub rate: String,
}

/// Adjusted dimensions, area and amount for one slab at `rate_per_sq_ft`.
///
/// The amount is computed from the displayed (2-decimal) area so the sheet
/// multiplies out exactly as printed.
pub fn polishing_costing(dims: &SlabDimensions, trim: &Trim, rate_per_sq_ft: f64) -> PolishingCosting {
    let adjusted = adjusted_dimension(
        dims.length.to_inches(),
        dims.height.to_inches(),
        trim.length.to_inches(),
        trim.height.to_inches(),
    );

    let area = match (adjusted.length.value(), adjusted.height.value()) {
        (Some(l), Some(h)) => square_feet(l, h),
        _ => String::new(),
    };
    let amount = match area.parse::<f64>() {
        Ok(sqft) => polishing_amount(sqft, rate_per_sq_ft),
        Err(_) => String::new(),
    };

    PolishingCosting {
        adjusted,
        square_feet: area,
        amount,
        rate: fixed2(rate_per_sq_ft),
    }
}

impl PolishingCosting {
    pub fn is_complete(&self) -> bool {
        self.adjusted.length != Figure::NOT_AVAILABLE && !self.amount.is_empty()
    }
}
