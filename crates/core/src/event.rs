use chrono::{DateTime, Utc};

/// A workflow fact (block dressed, slab polished, ...).
///
/// Events are immutable and carry a stable dotted name so downstream
/// consumers (audit log, persistence patch builders) can route on it.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "blocks.block.dressed").
    fn event_type(&self) -> &'static str;

    /// When the action was taken (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
