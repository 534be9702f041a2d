//! Error types for the paidmail core.
//!
//! Every failure the protocol can surface is a value of [`Error`]; nothing in
//! non-test code panics. The presentation layer picks messaging and retry
//! affordances from [`Error::category`] rather than matching on strings.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the paidmail core.
#[derive(Debug, Error)]
pub enum Error {
    /// Reply email was empty at submission time.
    #[error("reply email is required")]
    MissingReplyEmail,

    /// Subject was empty at submission time.
    #[error("subject is required")]
    MissingSubject,

    /// Message body was empty at submission time.
    #[error("message body is required")]
    MissingBody,

    /// The recipient has not configured any payment tiers.
    #[error("recipient has no payment tiers configured")]
    NoTiersConfigured,

    /// Requested tier index does not exist in the catalog.
    #[error("no tier at index {0}")]
    NoSuchTier(usize),

    /// No signing identity (wallet) is available.
    #[error("no signing identity available - connect a wallet")]
    NoSigningIdentity,

    /// The recipient handle does not exist in the directory.
    #[error("recipient not found: {0}")]
    RecipientNotFound(String),

    /// Reserving the pending message failed. No funds moved; a full retry
    /// from scratch is safe.
    #[error("reservation failed: {0}")]
    Reservation(String),

    /// The ledger rejected the transfer for insufficient balance. The
    /// reservation is retained for retry.
    #[error("insufficient balance for transfer")]
    InsufficientFunds,

    /// The transfer failed for a reason other than balance or signing
    /// identity. The reservation is retained for retry.
    #[error("payment execution failed: {0}")]
    PaymentExecution(String),

    /// Confirming the payment against the reservation failed. Funds have
    /// already left the sender's custody; retry resumes at finalize only.
    #[error("finalization failed after payment: {0}")]
    Finalization(String),

    /// The attempt holds a reservation or payment that still needs
    /// resolution; plain cancel is refused.
    #[error("attempt holds unresolved state - retry or abandon explicitly")]
    UnresolvedAttempt,

    /// Directory service error outside the submission protocol.
    #[error("directory service error: {0}")]
    Directory(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category driving user-facing messaging and retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Recovered locally by re-editing input; no external service touched.
    Validation,
    /// Recovered by restoring a capability (reconnect wallet); retry
    /// resumes at the failed step.
    Precondition,
    /// No side effects occurred; full retry from scratch is safe.
    Reservation,
    /// Funds were not sent; the reservation is retained and must be reused.
    Payment,
    /// Funds have moved; only an idempotent re-finalize is permitted.
    Finalization,
    /// Anything outside the submission protocol (config, IO, directory
    /// reads).
    Other,
}

impl Error {
    /// Category of this error for messaging and retry-affordance decisions.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingReplyEmail
            | Self::MissingSubject
            | Self::MissingBody
            | Self::NoTiersConfigured
            | Self::NoSuchTier(_) => ErrorCategory::Validation,
            Self::NoSigningIdentity => ErrorCategory::Precondition,
            Self::Reservation(_) => ErrorCategory::Reservation,
            Self::InsufficientFunds | Self::PaymentExecution(_) => ErrorCategory::Payment,
            Self::Finalization(_) => ErrorCategory::Finalization,
            Self::UnresolvedAttempt
            | Self::RecipientNotFound(_)
            | Self::Directory(_)
            | Self::Config(_)
            | Self::Io(_) => ErrorCategory::Other,
        }
    }

    /// True if the error was caught before any external effect.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// True if funds have already left the sender's custody. The UI must
    /// not offer a "retry payment" action for these.
    #[must_use]
    pub fn funds_at_risk(&self) -> bool {
        self.category() == ErrorCategory::Finalization
    }

    /// True if a retained reservation should be reused on retry rather
    /// than reserving again.
    #[must_use]
    pub fn reservation_reusable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Payment | ErrorCategory::Precondition | ErrorCategory::Finalization
        )
    }
}
