//! Batch configuration
//!
//! ```json
//! {
//!   "store_root": "./bucket",
//!   "template_key": "Input/Form1.pdf",
//!   "source_key": "Input/populated_credit_agreements.csv",
//!   "output_prefix": "Output/",
//!   "default_signatory": "Sagnik Sinha",
//!   "default_selector": 2,
//!   "failure_policy": "continue",
//!   "notification": { "kind": "webhook", "url": "https://hooks.example.com/forms" }
//! }
//! ```

use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::runner::{BatchSettings, FailurePolicy};
use crate::source::RowDefaults;
use crate::{BatchError, Result};
use form_filler::{load_layout, FormFiller, FormLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_template_key() -> String {
    "Input/Form1.pdf".to_string()
}

fn default_source_key() -> String {
    "Input/populated_credit_agreements.csv".to_string()
}

fn default_output_prefix() -> String {
    "Output/".to_string()
}

fn default_subject() -> String {
    "Credit agreement forms generated".to_string()
}

/// Where completion notifications go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationConfig {
    #[default]
    Log,
    Webhook { url: String },
}

impl NotificationConfig {
    pub fn notifier(&self) -> Box<dyn Notifier> {
        match self {
            NotificationConfig::Log => Box::new(LogNotifier),
            NotificationConfig::Webhook { url } => Box::new(WebhookNotifier::new(url.as_str())),
        }
    }
}

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory backing the object store
    pub store_root: PathBuf,

    #[serde(default = "default_template_key")]
    pub template_key: String,

    /// CSV object holding the agreement rows
    #[serde(default = "default_source_key")]
    pub source_key: String,

    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Signatory for rows without one
    #[serde(default)]
    pub default_signatory: Option<String>,

    /// Selector for rows without an interest rate
    #[serde(default)]
    pub default_selector: Option<i64>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Layout file; the credit agreement layout when omitted
    #[serde(default)]
    pub layout: Option<PathBuf>,

    #[serde(default)]
    pub notification: NotificationConfig,

    #[serde(default = "default_subject")]
    pub subject: String,
}

impl BatchConfig {
    /// Configuration with defaults for everything but the store root
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
            template_key: default_template_key(),
            source_key: default_source_key(),
            output_prefix: default_output_prefix(),
            default_signatory: None,
            default_selector: None,
            failure_policy: FailurePolicy::default(),
            layout: None,
            notification: NotificationConfig::default(),
            subject: default_subject(),
        }
    }

    /// Filler for the configured layout
    pub fn filler(&self) -> Result<FormFiller> {
        let layout = match &self.layout {
            Some(path) => load_layout(path)?,
            None => FormLayout::credit_agreement(),
        };
        Ok(FormFiller::new(layout)?)
    }

    pub fn row_defaults(&self) -> RowDefaults {
        RowDefaults {
            authorized_signatory: self.default_signatory.clone(),
            selector: self.default_selector,
        }
    }

    pub fn settings(&self) -> BatchSettings {
        BatchSettings {
            template_key: self.template_key.clone(),
            output_prefix: self.output_prefix.clone(),
            failure_policy: self.failure_policy,
            subject: self.subject.clone(),
        }
    }
}

/// Parse a configuration from JSON
pub fn parse_config(json: &str) -> Result<BatchConfig> {
    let config: BatchConfig =
        serde_json::from_str(json).map_err(|e| BatchError::ConfigError(e.to_string()))?;

    if config.template_key.is_empty() || config.source_key.is_empty() {
        return Err(BatchError::ConfigError(
            "template_key and source_key must not be empty".to_string(),
        ));
    }
    if let NotificationConfig::Webhook { url } = &config.notification {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BatchError::ConfigError(format!(
                "webhook url must be http(s), got {url:?}"
            )));
        }
    }

    Ok(config)
}

/// Read and parse a configuration file
///
/// Relative `store_root` and `layout` paths are resolved against the
/// directory containing the file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BatchConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        BatchError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let mut config = parse_config(&json)?;

    if let Some(base) = path.parent() {
        config.store_root = base.join(&config.store_root);
        config.layout = config.layout.map(|layout| base.join(layout));
    }

    Ok(config)
}
