//! Footer totals ("Total SQF", "Total Amount").

use crate::display::fixed2;

/// Sum a displayed field across rows. Blank or unparseable cells count as 0,
/// so a single bad row never turns the footer into NaN.
pub fn aggregate<T, F, S>(rows: impl IntoIterator<Item = T>, mut field: F) -> f64
where
    F: FnMut(T) -> S,
    S: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            field(row)
                .as_ref()
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        })
        .sum()
}

/// [`aggregate`], formatted for the footer row.
pub fn aggregate_display<T, F, S>(rows: impl IntoIterator<Item = T>, field: F) -> String
where
    F: FnMut(T) -> S,
    S: AsRef<str>,
{
    fixed2(aggregate(rows, field))
}
