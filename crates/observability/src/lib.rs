//! Tracing and logging setup shared by the API server and tools.

/// Initialize process-wide tracing/logging.
///
/// Output format comes from `LOG_FORMAT` (`json` by default, `pretty` for
/// human-readable local output); the filter comes from `RUST_LOG`.
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use tracing::LogFormat;
