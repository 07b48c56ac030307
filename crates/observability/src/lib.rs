//! Logging setup shared by every storefront binary and test.

/// Initialize process-wide logging with the default settings.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogConfig::default());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
