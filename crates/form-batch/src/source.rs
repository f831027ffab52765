//! Agreement record sources

use crate::runner::BatchRecord;
use crate::{BatchError, Result};
use form_filler::FormRecord;
use serde::Deserialize;

/// One row of the credit agreement table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgreementRow {
    pub agreement_id: String,
    pub client_id: String,
    pub client_name: String,
    /// Pre-formatted amount, written as the margin
    pub loan_amount: String,
    /// Written as the business day
    pub generation_date: String,
    #[serde(default)]
    pub authorized_signatory: Option<String>,
    /// Selector value for the interest-rate marker
    #[serde(default)]
    pub interest_rate: Option<String>,
}

/// Values used when a row leaves a column empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDefaults {
    pub authorized_signatory: Option<String>,
    pub selector: Option<i64>,
}

impl AgreementRow {
    /// Form record for this row
    pub fn to_record(&self, defaults: &RowDefaults) -> FormRecord {
        let mut record = FormRecord::new()
            .borrower_name(self.client_name.as_str())
            .business_day(self.generation_date.as_str())
            .margin_amount(self.loan_amount.as_str());

        record.authorized_signatory = self
            .authorized_signatory
            .clone()
            .or_else(|| defaults.authorized_signatory.clone());

        record.selector_value = match &self.interest_rate {
            Some(value) => Some(value.clone()),
            None => defaults.selector.map(|value| value.to_string()),
        };

        record
    }

    /// Batch record for this row
    pub fn to_batch_record(&self, defaults: &RowDefaults) -> BatchRecord {
        BatchRecord {
            agreement_id: self.agreement_id.clone(),
            client_id: self.client_id.clone(),
            record: self.to_record(defaults),
        }
    }
}

/// Supplies agreement rows in source order
pub trait RecordSource {
    fn rows(&self) -> Result<Vec<AgreementRow>>;
}

/// CSV table with a header row
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    data: Vec<u8>,
}

impl CsvRecordSource {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl RecordSource for CsvRecordSource {
    fn rows(&self) -> Result<Vec<AgreementRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(self.data.as_slice());

        let mut rows = Vec::new();
        for result in reader.deserialize::<AgreementRow>() {
            let row = result.map_err(|e| {
                let line = e
                    .position()
                    .map(|pos| format!("line {}: ", pos.line()))
                    .unwrap_or_default();
                BatchError::SourceReadError(format!("{line}{e}"))
            })?;
            rows.push(row);
        }

        tracing::debug!(rows = rows.len(), "read agreement rows");
        Ok(rows)
    }
}
