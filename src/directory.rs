//! Directory service boundary.
//!
//! The hosted directory stores users, mails and tiers. This core only ever
//! talks to it through the [`DirectoryService`] trait: profile reads for the
//! tier picker, the reserve call that opens a pending message, and the
//! confirm call that finalizes a paid one.

use crate::tier::Tier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a directory service implementation.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The requested handle does not exist.
    #[error("handle not found")]
    NotFound,

    /// Any other service-side failure, with the service's own message.
    #[error("{0}")]
    Service(String),
}

/// A recipient's public profile as published by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Recipient handle.
    pub username: String,
    /// Display name, if set.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Whether the directory has verified this recipient.
    #[serde(default)]
    pub is_verified: bool,
    /// Profile picture URL, if set.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Tiers in configuration order (oldest first).
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

/// A reserved-but-unpaid message record.
///
/// Exists only inside the current submission attempt; never persisted
/// locally beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Opaque identifier assigned by the directory.
    pub mail_id: u64,
    /// Sender's reply email the reservation was opened with.
    pub reply_email: String,
    /// Recipient-specific deposit address for the tier payment.
    pub deposit_address: String,
}

/// The sender's compose state. Subject and body are cleared on successful
/// delivery; the reply email is kept for follow-up messages.
#[derive(Debug, Clone, Default)]
pub struct MailDraft {
    /// Sender's reply email.
    pub reply_email: String,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl MailDraft {
    /// Clear the compose fields after a delivered message.
    pub fn clear_composed(&mut self) {
        self.subject.clear();
        self.body.clear();
    }
}

/// Capability contract for the hosted directory service.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Fetch a recipient's public profile.
    async fn get_public_profile(
        &self,
        handle: &str,
    ) -> std::result::Result<PublicProfile, DirectoryError>;

    /// Open a pending message for the given recipient, obtaining its
    /// identifier and a deposit address.
    async fn reserve_pending_message(
        &self,
        handle: &str,
        reply_email: &str,
    ) -> std::result::Result<PendingMessage, DirectoryError>;

    /// Confirm a completed transfer against a reservation, making the
    /// message visible to its recipient.
    async fn confirm_pending_message_payment(
        &self,
        handle: &str,
        draft: &MailDraft,
        tx_ref: &str,
        mail_id: u64,
    ) -> std::result::Result<(), DirectoryError>;
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_composed_keeps_reply_email() {
        let mut draft = MailDraft {
            reply_email: "sender@example.com".into(),
            subject: "hello".into(),
            body: "world".into(),
        };
        draft.clear_composed();
        assert_eq!(draft.reply_email, "sender@example.com");
        assert!(draft.subject.is_empty());
        assert!(draft.body.is_empty());
    }

    #[test]
    fn test_profile_deserializes_with_missing_optionals() {
        let profile: PublicProfile =
            serde_json::from_str(r#"{"username": "alice"}"#).expect("should parse");
        assert_eq!(profile.username, "alice");
        assert!(profile.tiers.is_empty());
        assert!(!profile.is_verified);
    }
}
