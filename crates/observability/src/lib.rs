//! Tracing/logging setup shared by the kiosk binaries.

/// Initialize process-wide tracing/logging with the format taken from
/// `KIOSK_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
