//! Port recording the highest snapshot number ever issued per series.
//!
//! Pruning deletes numbered files, so the files alone cannot prove a number
//! was never used. The sequence keeps a high-water mark that only grows.

use super::define_port_error;

define_port_error! {
    /// Errors raised by snapshot sequence adapters.
    pub enum SnapshotSequenceError {
        /// The stored mark could not be read or written.
        Io {
            /// Series whose mark was touched.
            series: String,
            /// Underlying error text.
            message: String,
        } => "snapshot sequence for {series} failed: {message}",
        /// The stored mark is not a number.
        Corrupt {
            /// Series whose mark is unreadable.
            series: String,
            /// Stored content.
            content: String,
        } => "snapshot sequence for {series} holds '{content}'",
    }
}

/// Monotonic per-series counter.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotSequence: Send + Sync {
    /// Highest number issued for `series`, zero when none was recorded.
    fn last_issued(&self, series: &str) -> Result<u32, SnapshotSequenceError>;

    /// Raises the mark to `number`. Lower values leave the mark unchanged.
    fn record_issued(&self, series: &str, number: u32) -> Result<(), SnapshotSequenceError>;
}
