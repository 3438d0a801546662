//! Value objects: measurement records and unit quantities are compared by
//! their values, never by identity.

/// Marker trait for value objects.
///
/// A `Length { value: 100.0, units: Cm }` equals any other 100 cm length.
/// To "change" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
