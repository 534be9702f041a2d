//! Payment tiers a recipient publishes to senders.

use crate::directory::{DirectoryError, DirectoryService, PublicProfile};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A (price, response-window) pair a recipient publishes so senders can
/// choose a service level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Price in USD.
    pub value_usd: f64,
    /// Days the recipient commits to respond within.
    pub respond_days: u32,
}

impl Tier {
    /// Human-readable label for a tier picker, e.g. `$10.00 (3 Days)`.
    #[must_use]
    pub fn label(&self) -> String {
        let unit = if self.respond_days == 1 { "Day" } else { "Days" };
        format!("${:.2} ({} {unit})", self.value_usd, self.respond_days)
    }
}

/// Read-only view of a recipient's configured tiers, in presentation order.
///
/// The directory returns tiers in configuration order; the catalog presents
/// them newest-first. This ordering is a deliberate UX choice, not a
/// data-integrity requirement.
#[derive(Debug, Clone, Default)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    /// Build a catalog from tiers in configuration order.
    #[must_use]
    pub fn from_configured(mut tiers: Vec<Tier>) -> Self {
        tiers.reverse();
        Self { tiers }
    }

    /// Tiers in presentation order (newest-configured first).
    #[must_use]
    pub fn list(&self) -> &[Tier] {
        &self.tiers
    }

    /// True if the recipient has no tiers configured. Submission must be
    /// disabled in that case, not retried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Number of configured tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Select a tier by presentation index.
    ///
    /// A `Tier` can never be obtained from an empty catalog, so a recipient
    /// with zero tiers can never reach the reservation step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTiersConfigured`] on an empty catalog and
    /// [`Error::NoSuchTier`] if the index is out of range.
    pub fn select(&self, index: usize) -> Result<&Tier> {
        if self.tiers.is_empty() {
            return Err(Error::NoTiersConfigured);
        }
        self.tiers.get(index).ok_or(Error::NoSuchTier(index))
    }

    /// Load a recipient's profile and tier catalog from the directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipientNotFound`] if the handle does not exist
    /// and [`Error::Directory`] for other service failures.
    pub async fn load<D: DirectoryService>(
        directory: &D,
        handle: &str,
    ) -> Result<(PublicProfile, Self)> {
        match directory.get_public_profile(handle).await {
            Ok(profile) => {
                let catalog = Self::from_configured(profile.tiers.clone());
                Ok((profile, catalog))
            }
            Err(DirectoryError::NotFound) => Err(Error::RecipientNotFound(handle.to_string())),
            Err(e) => Err(Error::Directory(e.to_string())),
        }
    }
}
