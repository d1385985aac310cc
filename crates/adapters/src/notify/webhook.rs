// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook notification adapter (generic JSON POST).

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    title: &'a str,
    message: &'a str,
}

/// Notification adapter that POSTs a JSON body to a configured URL.
#[derive(Clone)]
pub struct WebhookNotifyAdapter {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifyAdapter {
    /// Build a webhook notifier. Validates the URL scheme is `http` or
    /// `https` up front so a misconfigured notifier fails at registration
    /// time rather than on the first fired notification.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| NotifyError::SendFailed(format!("invalid webhook url: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NotifyError::SendFailed(format!(
                "unsupported webhook url scheme: {}",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::SendFailed(format!("failed to build client: {e}")))?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl NotifyAdapter for WebhookNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let body = WebhookBody { title, message };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::SendFailed(format!(
                "webhook returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
