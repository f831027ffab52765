//! Batch execution

use crate::config::BatchConfig;
use crate::notify::Notifier;
use crate::source::{CsvRecordSource, RecordSource};
use crate::store::{FsObjectStore, ObjectStore};
use crate::Result;
use chrono::NaiveDateTime;
use form_filler::{FormFiller, FormRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Timestamp embedded in output keys, e.g. `07Sep2025_20-30-45`
const TIMESTAMP_FORMAT: &str = "%d%b%Y_%H-%M-%S";

/// What to do when a single record fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure; no notification is sent
    #[default]
    Abort,
    /// Record the failure and carry on with the next record
    Continue,
}

/// A form record plus the identifiers naming its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub agreement_id: String,
    pub client_id: String,
    pub record: FormRecord,
}

/// A record that could not be filled or stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub agreement_id: String,
    pub client_id: String,
    pub error: String,
}

/// Outcome of a completed batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Keys written, in record order
    pub written: Vec<String>,
    pub failed: Vec<RecordFailure>,
}

impl BatchReport {
    /// Plain-text notification body
    pub fn summary(&self) -> String {
        let mut message = format!(
            "Filled {} form(s), {} failed.",
            self.written.len(),
            self.failed.len()
        );
        for key in &self.written {
            message.push_str(&format!("\nwritten: {key}"));
        }
        for failure in &self.failed {
            message.push_str(&format!(
                "\nfailed: {} / {}: {}",
                failure.agreement_id, failure.client_id, failure.error
            ));
        }
        message
    }
}

/// Output key for a record, before collision handling
pub fn output_key(prefix: &str, record: &BatchRecord, started_at: NaiveDateTime) -> String {
    format!(
        "{prefix}{}_{}_{}.pdf",
        record.agreement_id,
        record.client_id,
        started_at.format(TIMESTAMP_FORMAT)
    )
}

/// Per-batch settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub template_key: String,
    pub output_prefix: String,
    pub failure_policy: FailurePolicy,
    pub subject: String,
}

/// Fills every record of a batch and stores the results
pub struct BatchRunner<S, N> {
    filler: FormFiller,
    store: S,
    notifier: N,
    settings: BatchSettings,
}

impl<S: ObjectStore, N: Notifier> BatchRunner<S, N> {
    pub fn new(filler: FormFiller, store: S, notifier: N, settings: BatchSettings) -> Self {
        Self {
            filler,
            store,
            notifier,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run the batch
    ///
    /// The template is read once. `started_at` supplies both the generation
    /// date and the output key timestamp. A notification is sent only when
    /// the batch runs to completion.
    pub fn run(&mut self, records: &[BatchRecord], started_at: NaiveDateTime) -> Result<BatchReport> {
        let template = self.store.get(&self.settings.template_key)?;
        let mut used = HashSet::new();
        let mut report = BatchReport::default();

        tracing::info!(
            records = records.len(),
            template = %self.settings.template_key,
            "starting batch"
        );

        for item in records {
            match self.process(&template, item, started_at, &mut used) {
                Ok(key) => {
                    tracing::info!(key = %key, "wrote filled form");
                    report.written.push(key);
                }
                Err(err) => match self.settings.failure_policy {
                    FailurePolicy::Abort => {
                        tracing::error!(
                            agreement_id = %item.agreement_id,
                            client_id = %item.client_id,
                            "record failed, aborting batch: {err}"
                        );
                        return Err(err);
                    }
                    FailurePolicy::Continue => {
                        tracing::warn!(
                            agreement_id = %item.agreement_id,
                            client_id = %item.client_id,
                            "skipping record: {err}"
                        );
                        report.failed.push(RecordFailure {
                            agreement_id: item.agreement_id.clone(),
                            client_id: item.client_id.clone(),
                            error: err.to_string(),
                        });
                    }
                },
            }
        }

        self.notifier
            .notify(&self.settings.subject, &report.summary())?;
        Ok(report)
    }

    fn process(
        &mut self,
        template: &[u8],
        item: &BatchRecord,
        started_at: NaiveDateTime,
        used: &mut HashSet<String>,
    ) -> Result<String> {
        let filled = self
            .filler
            .fill(template, &item.record, started_at.date())?;

        let key = self.unique_key(output_key(&self.settings.output_prefix, item, started_at), used)?;
        self.store.put(&key, filled.as_bytes())?;
        used.insert(key.clone());
        Ok(key)
    }

    /// Append `_{n}` until the key is new to both the batch and the store
    fn unique_key(&self, key: String, used: &HashSet<String>) -> Result<String> {
        let taken = |candidate: &str| -> Result<bool> {
            Ok(used.contains(candidate) || self.store.contains(candidate)?)
        };

        if !taken(&key)? {
            return Ok(key);
        }

        let stem = key.strip_suffix(".pdf").unwrap_or(&key);
        let mut n = 1;
        loop {
            let candidate = format!("{stem}_{n}.pdf");
            if !taken(&candidate)? {
                tracing::debug!(key = %candidate, "output key already taken, using suffix");
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

/// Run a batch described by a configuration file
///
/// Records come from the configured source object in the store; filled
/// documents are written back to the same store.
pub fn run_batch(config: &BatchConfig, started_at: NaiveDateTime) -> Result<BatchReport> {
    let filler = config.filler()?;
    let store = FsObjectStore::new(&config.store_root);

    let source = CsvRecordSource::from_bytes(store.get(&config.source_key)?);
    let defaults = config.row_defaults();
    let records: Vec<BatchRecord> = source
        .rows()?
        .iter()
        .map(|row| row.to_batch_record(&defaults))
        .collect();

    let notifier = config.notification.notifier();
    let mut runner = BatchRunner::new(filler, store, notifier, config.settings());
    runner.run(&records, started_at)
}
