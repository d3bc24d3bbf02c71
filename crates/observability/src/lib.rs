//! Tracing and logging setup shared by the WebPOS binaries.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
///
/// An unknown `WEBPOS_LOG_FORMAT` falls back to JSON and is reported once the
/// subscriber is up.
pub fn init() {
    match LogFormat::from_env() {
        Ok(format) => tracing::init(format),
        Err(rejected) => {
            tracing::init(LogFormat::default());
            ::tracing::warn!(
                env = tracing::LOG_FORMAT_ENV,
                value = %rejected,
                "unknown log format, using json"
            );
        }
    }
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;
