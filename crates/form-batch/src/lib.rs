//! Form Batch - orchestration around the form filler
//!
//! Reads agreement rows from a record source, fills one form per row,
//! writes each document to an object store under a unique key and sends a
//! single notification when the batch completes.
//!
//! # Example
//!
//! ```ignore
//! use form_batch::{load_config, run_batch};
//!
//! let config = load_config("batch.json")?;
//! let report = run_batch(&config, chrono::Local::now().naive_local())?;
//! println!("{}", report.summary());
//! ```

pub mod args;
pub mod config;
pub mod notify;
pub mod runner;
pub mod source;
pub mod store;

pub use args::{parse_key_values, run_fill, FillArgs, REQUIRED_ARGS};
pub use config::{load_config, parse_config, BatchConfig, NotificationConfig};
pub use notify::{LogNotifier, Notifier, WebhookNotifier};
pub use runner::{
    output_key, run_batch, BatchRecord, BatchReport, BatchRunner, BatchSettings, FailurePolicy,
    RecordFailure,
};
pub use source::{AgreementRow, CsvRecordSource, RecordSource, RowDefaults};
pub use store::{FsObjectStore, MemoryStore, ObjectStore};

use form_filler::FillError;
use thiserror::Error;

/// Errors raised while orchestrating form filling
#[derive(Debug, Error)]
pub enum BatchError {
    /// Missing or malformed invocation arguments
    #[error("{0}")]
    ArgumentError(String),

    #[error("Failed to read records: {0}")]
    SourceReadError(String),

    #[error("Failed to write {key}: {message}")]
    StoreWriteError { key: String, message: String },

    #[error("Failed to read {key}: {message}")]
    StoreReadError { key: String, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Notification failed: {0}")]
    NotifyError(String),

    #[error(transparent)]
    Fill(#[from] FillError),
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;
