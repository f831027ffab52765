//! Batch completion notifications

use crate::{BatchError, Result};
use reqwest::blocking::Client;
use serde::Serialize;

/// Receives one message per completed batch
pub trait Notifier {
    fn notify(&self, subject: &str, message: &str) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, subject: &str, message: &str) -> Result<()> {
        (**self).notify(subject, message)
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, subject: &str, message: &str) -> Result<()> {
        tracing::info!(subject, "{message}");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    message: &'a str,
}

/// Posts notifications as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, subject: &str, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { subject, message })
            .send()
            .map_err(|e| BatchError::NotifyError(format!("request to {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(BatchError::NotifyError(format!(
                "{} responded with status {}",
                self.url,
                resp.status()
            )));
        }

        tracing::debug!(url = %self.url, "notification delivered");
        Ok(())
    }
}
