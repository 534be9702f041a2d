//! Core library for paid direct messaging.
//!
//! A visitor sends a paid message to a recipient: they pick one of the
//! recipient's price/response-time tiers, the core reserves a pending
//! message record with the hosted directory service, the visitor transfers
//! the exact tier price in a stablecoin to a recipient-specific deposit
//! address, and the message becomes visible to the recipient only once the
//! transfer is confirmed against the reservation.
//!
//! # Architecture
//!
//! - [`tier::TierCatalog`]: read-only view of a recipient's tiers,
//!   newest-configured first.
//! - [`submission::MailSubmissionOrchestrator`]: drives the two-phase
//!   reserve → pay → finalize protocol as an explicit state machine with
//!   resumable retries: a retained reservation is reused, an executed
//!   payment is never repeated.
//! - [`notification::has_attention_required`]: pure predicate over a
//!   recipient's mailbox driving the notification indicator.
//!
//! The wallet, the ledger that executes transfers, and the directory
//! service are external collaborators behind the [`ledger::SigningIdentity`],
//! [`ledger::LedgerClient`] and [`directory::DirectoryService`] traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use paidmail::{MailDraft, MailSubmissionOrchestrator, TierCatalog};
//!
//! # async fn run(directory: impl paidmail::DirectoryService,
//! #              ledger: impl paidmail::LedgerClient,
//! #              wallet: impl paidmail::SigningIdentity,
//! #              denom: paidmail::TokenDenomination) -> paidmail::Result<()> {
//! let (profile, catalog) = TierCatalog::load(&directory, "alice").await?;
//! let tier = catalog.select(0)?;
//!
//! let mut draft = MailDraft {
//!     reply_email: "sender@example.com".into(),
//!     subject: "Hello".into(),
//!     body: "Quick question...".into(),
//! };
//!
//! let mut orchestrator = MailSubmissionOrchestrator::new(directory, ledger, wallet, denom);
//! let receipt = orchestrator.submit(&profile.username, &mut draft, tier).await?;
//! println!("delivered mail {} via {}", receipt.mail_id, receipt.tx_ref);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod directory_http;
pub mod error;
pub mod event;
pub mod ledger;
pub mod notification;
pub mod submission;
pub mod tier;

pub use config::CoreConfig;
pub use directory::{DirectoryService, MailDraft, PendingMessage, PublicProfile};
pub use directory_http::{HttpDirectoryConfig, HttpDirectoryService};
pub use error::{Error, ErrorCategory, Result};
pub use event::{SubmissionEvent, SubmissionEventsChannel};
pub use ledger::{LedgerClient, SigningIdentity, TokenDenomination, TransferError, TxReference};
pub use notification::{has_attention_required, Message};
pub use submission::{DeliveryReceipt, MailSubmissionOrchestrator, Phase, SubmissionAttempt};
pub use tier::{Tier, TierCatalog};
