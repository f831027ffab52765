//! Form record consumed by the filler

use crate::layout::FormField;
use serde::{Deserialize, Serialize};

/// Field values for one form
///
/// Absent values render as empty text. The selector is kept as supplied and
/// only interpreted at fill time, so an unusable value simply selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    #[serde(default)]
    pub borrower_name: Option<String>,
    #[serde(default)]
    pub authorized_signatory: Option<String>,
    #[serde(default)]
    pub business_day: Option<String>,
    /// Pre-formatted by the caller
    #[serde(default)]
    pub margin_amount: Option<String>,
    #[serde(default)]
    pub selector_value: Option<String>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrower_name(mut self, value: impl Into<String>) -> Self {
        self.borrower_name = Some(value.into());
        self
    }

    pub fn authorized_signatory(mut self, value: impl Into<String>) -> Self {
        self.authorized_signatory = Some(value.into());
        self
    }

    pub fn business_day(mut self, value: impl Into<String>) -> Self {
        self.business_day = Some(value.into());
        self
    }

    pub fn margin_amount(mut self, value: impl Into<String>) -> Self {
        self.margin_amount = Some(value.into());
        self
    }

    /// Set the selector from its textual form (e.g. a CLI argument)
    pub fn selector_value(mut self, value: impl Into<String>) -> Self {
        self.selector_value = Some(value.into());
        self
    }

    /// Set the selector from an integer
    pub fn selector(mut self, value: i64) -> Self {
        self.selector_value = Some(value.to_string());
        self
    }

    /// Selector as an integer, if it parses as one
    ///
    /// Surrounding whitespace is ignored; anything else that is not an
    /// integer yields `None`.
    pub fn selector_key(&self) -> Option<i64> {
        self.selector_value.as_deref()?.trim().parse().ok()
    }

    /// Text for a record-backed field, empty when absent
    ///
    /// Returns `None` for fields the record does not supply.
    pub fn text_for(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::GenerationDate => return None,
            FormField::BorrowerName => &self.borrower_name,
            FormField::AuthorizedSignatory => &self.authorized_signatory,
            FormField::BusinessDay => &self.business_day,
            FormField::MarginAmount => &self.margin_amount,
        };
        Some(value.as_deref().unwrap_or(""))
    }
}
