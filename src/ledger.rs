//! Ledger capability boundary.
//!
//! The ledger that actually executes transfers reports failures as free
//! text. Classification into structured kinds happens exactly once, here at
//! the boundary, so call sites never match on strings.

use async_trait::async_trait;
use thiserror::Error;

/// Marker the ledger embeds in insufficient-balance failure text.
const INSUFFICIENT_BALANCE_MARKER: &str = "Not enough";

/// Marker the wallet library embeds when the signing identity is gone.
const SIGNING_UNAVAILABLE_MARKER: &str = "WalletNotConnected";

/// A stablecoin denomination: mint address plus atomic-unit scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDenomination {
    /// Token mint address.
    pub mint: String,
    /// Number of decimal places in the atomic unit.
    pub decimals: u8,
}

impl TokenDenomination {
    /// Convert a USD amount to atomic token units, rounding to the nearest
    /// unit. This is the only place float money arithmetic happens.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_atomic(&self, amount_usd: f64) -> u64 {
        let scale = 10u64.pow(u32::from(self.decimals));
        (amount_usd * scale as f64).round().max(0.0) as u64
    }
}

impl From<&crate::config::TokenConfig> for TokenDenomination {
    fn from(config: &crate::config::TokenConfig) -> Self {
        Self {
            mint: config.mint.clone(),
            decimals: config.decimals,
        }
    }
}

/// Reference to an executed ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReference(pub String);

impl std::fmt::Display for TxReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured transfer failure kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The sender's balance cannot cover the transfer.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The signing identity dropped before the transfer could be signed.
    #[error("signing identity unavailable")]
    SigningUnavailable,

    /// Any other ledger failure.
    #[error("transfer failed: {0}")]
    Other(String),
}

impl TransferError {
    /// Classify raw ledger failure text into a structured kind.
    ///
    /// Implementations of [`LedgerClient`] call this once on whatever error
    /// text their underlying library produces.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if raw.contains(SIGNING_UNAVAILABLE_MARKER) {
            Self::SigningUnavailable
        } else if raw.contains(INSUFFICIENT_BALANCE_MARKER) {
            Self::InsufficientBalance
        } else {
            Self::Other(raw.to_string())
        }
    }
}

/// Capability contract for executing token transfers.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Transfer the exact `amount_usd`, converted to the denomination's
    /// atomic units, to `destination`.
    async fn transfer(
        &self,
        destination: &str,
        denomination: &TokenDenomination,
        amount_usd: f64,
    ) -> std::result::Result<TxReference, TransferError>;
}

/// Globally-available signing capability (wallet connection).
///
/// Availability can change between protocol steps without notification, so
/// each step queries this fresh rather than caching an earlier answer.
pub trait SigningIdentity: Send + Sync {
    /// True if a signing identity is currently available.
    fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insufficient_balance() {
        let err = TransferError::classify("Error: Not enough SOL to cover fees");
        assert_eq!(err, TransferError::InsufficientBalance);
    }

    #[test]
    fn test_classify_signing_unavailable() {
        let err = TransferError::classify("WalletNotConnectedError");
        assert_eq!(err, TransferError::SigningUnavailable);
    }

    #[test]
    fn test_classify_other() {
        let err = TransferError::classify("rpc node timed out");
        assert_eq!(err, TransferError::Other("rpc node timed out".to_string()));
    }

    #[test]
    fn test_signing_marker_wins_over_balance_marker() {
        // Both markers present: identity loss is the actionable kind.
        let err = TransferError::classify("WalletNotConnectedError: Not enough context");
        assert_eq!(err, TransferError::SigningUnavailable);
    }

    #[test]
    fn test_to_atomic_usdc() {
        let denom = TokenDenomination {
            mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            decimals: 6,
        };
        assert_eq!(denom.to_atomic(10.0), 10_000_000);
        assert_eq!(denom.to_atomic(0.5), 500_000);
        assert_eq!(denom.to_atomic(1.234_567_8), 1_234_568);
        assert_eq!(denom.to_atomic(-1.0), 0);
    }
}
