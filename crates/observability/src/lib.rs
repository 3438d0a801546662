//! Process-wide logging setup for binaries and test harnesses that embed the
//! workflow crates.

/// Install the tracing subscriber.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filter, output format).
pub mod tracing;
