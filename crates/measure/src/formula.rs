//! Volume, weight, allowance and area formulas.

use crate::display::{fixed2, Figure};
use crate::units::CM_PER_INCH;

const CM3_PER_M3: f64 = 1_000_000.0;
const SQ_IN_PER_SQ_FT: f64 = 144.0;

/// Stone density used for weight estimates, in t/m³.
///
/// A single approximation for every material; it is not derived per stone type.
pub const DEFAULT_DENSITY: f64 = 3.5;

/// Edge allowance added to the trimmed length before polishing, in inches.
pub const LENGTH_ALLOWANCE_ADDED: f64 = 6.0;
/// Allowance removed again from the length for the costed figure, in inches.
pub const LENGTH_ALLOWANCE_REMOVED: f64 = 4.0;
/// Edge allowance added to the trimmed height before polishing, in inches.
pub const HEIGHT_ALLOWANCE_ADDED: f64 = 2.0;
/// Allowance removed again from the height for the costed figure, in inches.
pub const HEIGHT_ALLOWANCE_REMOVED: f64 = 2.0;

/// Volume in m³ from centimeter dimensions.
pub fn volume(length_cm: f64, breadth_cm: f64, height_cm: f64) -> f64 {
    (length_cm * breadth_cm * height_cm) / CM3_PER_M3
}

/// Unrounded weight in tonnes.
pub fn weight_tonnes(volume_m3: f64, density: f64) -> f64 {
    volume_m3 * density
}

/// Weight in tonnes, formatted for display.
pub fn weight(volume_m3: f64, density: f64) -> String {
    fixed2(weight_tonnes(volume_m3, density))
}

/// Polishing dimensions after trim and edge allowance, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedDimensions {
    pub length_with_allowance: Figure,
    pub height_with_allowance: Figure,
    pub length: Figure,
    pub height: Figure,
}

impl AdjustedDimensions {
    const NOT_AVAILABLE: AdjustedDimensions = AdjustedDimensions {
        length_with_allowance: Figure::NOT_AVAILABLE,
        height_with_allowance: Figure::NOT_AVAILABLE,
        length: Figure::NOT_AVAILABLE,
        height: Figure::NOT_AVAILABLE,
    };
}

/// Apply trim and the fixed edge allowance to raw slab dimensions (inches).
///
/// Every output is unavailable when any input is not a number, or when the
/// trim leaves a negative length or height.
pub fn adjusted_dimension(
    raw_length: f64,
    raw_height: f64,
    trim_length: f64,
    trim_height: f64,
) -> AdjustedDimensions {
    if [raw_length, raw_height, trim_length, trim_height]
        .iter()
        .any(|v| !v.is_finite())
    {
        return AdjustedDimensions::NOT_AVAILABLE;
    }

    let length_with_allowance = raw_length - trim_length + LENGTH_ALLOWANCE_ADDED;
    let height_with_allowance = raw_height - trim_height + HEIGHT_ALLOWANCE_ADDED;
    let length = length_with_allowance - LENGTH_ALLOWANCE_REMOVED;
    let height = height_with_allowance - HEIGHT_ALLOWANCE_REMOVED;
    if length < 0.0 || height < 0.0 {
        return AdjustedDimensions::NOT_AVAILABLE;
    }

    AdjustedDimensions {
        length_with_allowance: Figure::new(length_with_allowance),
        height_with_allowance: Figure::new(height_with_allowance),
        length: Figure::new(length),
        height: Figure::new(height),
    }
}

pub fn to_centimeters(inches: f64) -> String {
    fixed2(inches * CM_PER_INCH)
}

pub fn square_feet(length_in: f64, height_in: f64) -> String {
    fixed2((length_in * height_in) / SQ_IN_PER_SQ_FT)
}

pub fn polishing_amount(square_feet: f64, rate_per_sq_ft: f64) -> String {
    fixed2(square_feet * rate_per_sq_ft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn block_example_volume_and_weight() {
        let v = volume(100.0, 60.0, 20.0);
        assert!((v - 0.12).abs() < 1e-12);
        assert_eq!(weight(v, DEFAULT_DENSITY), "0.42");
    }

    #[test]
    fn slab_example_adjusted_area_and_amount() {
        let adjusted = adjusted_dimension(120.0, 60.0, 4.0, 2.0);
        assert_eq!(adjusted.length_with_allowance.value(), Some(122.0));
        assert_eq!(adjusted.height_with_allowance.value(), Some(60.0));
        assert_eq!(adjusted.length.value(), Some(118.0));
        assert_eq!(adjusted.height.value(), Some(58.0));

        assert_eq!(square_feet(118.0, 58.0), "47.53");
        assert_eq!(polishing_amount(47.53, 50.0), "2376.50");
    }

    #[test]
    fn zero_trim_applies_only_the_allowance() {
        let adjusted = adjusted_dimension(96.0, 48.0, 0.0, 0.0);
        assert_eq!(adjusted.length.value(), Some(98.0));
        assert_eq!(adjusted.height.value(), Some(48.0));
    }

    #[test]
    fn nan_raw_length_blanks_both_outputs() {
        let adjusted = adjusted_dimension(f64::NAN, 60.0, 4.0, 2.0);
        assert_eq!(adjusted.length.to_string(), "");
        assert_eq!(adjusted.height.to_string(), "");
    }

    #[test]
    fn trim_beyond_raw_size_blanks_outputs() {
        let adjusted = adjusted_dimension(10.0, 60.0, 20.0, 2.0);
        assert_eq!(adjusted, AdjustedDimensions::NOT_AVAILABLE);
        assert_eq!(adjusted.length.to_string(), "");

        let adjusted = adjusted_dimension(120.0, 1.0, 4.0, 3.0);
        assert_eq!(adjusted.height.to_string(), "");
    }

    #[test]
    fn centimeters_from_inches() {
        assert_eq!(to_centimeters(10.0), "25.40");
        assert_eq!(to_centimeters(f64::NAN), "");
    }

    proptest! {
        #[test]
        fn volume_scales_linearly(
            l in 0.1f64..1000.0,
            b in 0.1f64..1000.0,
            h in 0.1f64..1000.0,
        ) {
            let base = volume(l, b, h);
            let doubled = volume(2.0 * l, b, h);
            prop_assert!((doubled - 2.0 * base).abs() <= 1e-9 * doubled.max(1.0));
        }

        #[test]
        fn volume_ignores_argument_order(
            l in 0.1f64..1000.0,
            b in 0.1f64..1000.0,
            h in 0.1f64..1000.0,
        ) {
            let a = volume(l, b, h);
            let c = volume(h, l, b);
            prop_assert!((a - c).abs() <= 1e-9 * a.max(1.0));
        }

        #[test]
        fn weight_is_product_and_has_two_decimals(
            v in 0.001f64..100.0,
            d in 0.1f64..10.0,
        ) {
            prop_assert_eq!(weight_tonnes(v, d), v * d);
            let shown = weight(v, d);
            let (_, frac) = shown.split_once('.').expect("decimal point");
            prop_assert_eq!(frac.len(), 2);
        }

        #[test]
        fn zero_trim_round_trip(l in 0.0f64..500.0, h in 0.0f64..500.0) {
            let adjusted = adjusted_dimension(l, h, 0.0, 0.0);
            prop_assert_eq!(adjusted.length.value(), Some(l + 6.0 - 4.0));
            prop_assert_eq!(adjusted.height.value(), Some(h + 2.0 - 2.0));
        }
    }
}
