//! HTTP client for the hosted directory service.
//!
//! Implements [`DirectoryService`] against the directory's REST API:
//! `GET user/{handle}` for profiles, `POST mail/new` to reserve a pending
//! message, `POST mail/payment` to finalize a paid one.

use crate::directory::{DirectoryError, DirectoryService, MailDraft, PendingMessage, PublicProfile};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP directory client.
#[derive(Debug, Clone)]
pub struct HttpDirectoryConfig {
    /// Base URL of the directory service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for HttpDirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sollinked.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&crate::config::CoreConfig> for HttpDirectoryConfig {
    fn from(config: &crate::config::CoreConfig) -> Self {
        Self {
            base_url: config.directory_url.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// HTTP-backed directory service client.
pub struct HttpDirectoryService {
    config: HttpDirectoryConfig,
    client: reqwest::Client,
}

/// Reserve response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReserveResponse {
    mail_id: u64,
    deposit_to: String,
}

impl HttpDirectoryService {
    /// Create a client for the given directory service.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpDirectoryConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| crate::Error::Config(format!("HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn service_error(response: reqwest::Response) -> DirectoryError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if body.is_empty() {
            DirectoryError::Service(format!("directory returned {status}"))
        } else {
            DirectoryError::Service(body)
        }
    }
}

#[async_trait]
impl DirectoryService for HttpDirectoryService {
    async fn get_public_profile(
        &self,
        handle: &str,
    ) -> std::result::Result<PublicProfile, DirectoryError> {
        debug!(handle, "fetching public profile");
        let response = self
            .client
            .get(self.url(&format!("user/{handle}")))
            .send()
            .await
            .map_err(|e| DirectoryError::Service(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        response
            .json::<PublicProfile>()
            .await
            .map_err(|e| DirectoryError::Service(format!("malformed profile: {e}")))
    }

    async fn reserve_pending_message(
        &self,
        handle: &str,
        reply_email: &str,
    ) -> std::result::Result<PendingMessage, DirectoryError> {
        debug!(handle, "reserving pending message");
        let response = self
            .client
            .post(self.url("mail/new"))
            .json(&serde_json::json!({
                "username": handle,
                "replyToEmail": reply_email,
            }))
            .send()
            .await
            .map_err(|e| DirectoryError::Service(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let reserved = response
            .json::<ReserveResponse>()
            .await
            .map_err(|e| DirectoryError::Service(format!("malformed reservation: {e}")))?;
        Ok(PendingMessage {
            mail_id: reserved.mail_id,
            reply_email: reply_email.to_string(),
            deposit_address: reserved.deposit_to,
        })
    }

    async fn confirm_pending_message_payment(
        &self,
        handle: &str,
        draft: &MailDraft,
        tx_ref: &str,
        mail_id: u64,
    ) -> std::result::Result<(), DirectoryError> {
        debug!(handle, mail_id, "confirming pending message payment");
        let response = self
            .client
            .post(self.url("mail/payment"))
            .json(&serde_json::json!({
                "username": handle,
                "replyToEmail": draft.reply_email,
                "subject": draft.subject,
                "message": draft.body,
                "txHash": tx_ref,
                "mailId": mail_id,
            }))
            .send()
            .await
            .map_err(|e| DirectoryError::Service(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(())
    }
}
