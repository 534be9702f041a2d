//! Attention-required computation for a recipient's mailbox.
//!
//! Drives the notification indicator: a delivered, paid message that has
//! not been responded to or claimed, and whose response window is still
//! open, requires attention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A delivered message as published by the directory service. Read-only
/// from this core's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Payment was confirmed and the message is visible to the recipient.
    #[serde(default)]
    pub is_processed: bool,
    /// Tier price paid, absent for unpaid records.
    #[serde(default)]
    pub value_usd: Option<f64>,
    /// The recipient has responded.
    #[serde(default)]
    pub has_responded: bool,
    /// The payment was claimed (response window closed out).
    #[serde(default)]
    pub is_claimed: bool,
    /// End of the response window.
    pub expiry_date: DateTime<Utc>,
}

impl Message {
    /// True if this message still needs a reply before its response window
    /// expires.
    #[must_use]
    pub fn requires_attention(&self, now: DateTime<Utc>) -> bool {
        self.is_processed
            && self.value_usd.is_some()
            && !self.has_responded
            && !self.is_claimed
            && self.expiry_date > now
    }
}

/// True iff any message in the collection requires attention at `now`.
///
/// Pure and total: no failure modes, same inputs give the same answer. The
/// result is time-dependent through `now`, so callers recompute per poll or
/// render cycle rather than caching it.
#[must_use]
pub fn has_attention_required(messages: &[Message], now: DateTime<Utc>) -> bool {
    messages.iter().any(|m| m.requires_attention(now))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn paid_unanswered(expiry_date: DateTime<Utc>) -> Message {
        Message {
            is_processed: true,
            value_usd: Some(10.0),
            has_responded: false,
            is_claimed: false,
            expiry_date,
        }
    }

    #[test]
    fn test_open_window_requires_attention() {
        let now = Utc::now();
        let messages = vec![paid_unanswered(now + Duration::days(1))];
        assert!(has_attention_required(&messages, now));
    }

    #[test]
    fn test_expired_window_does_not() {
        let now = Utc::now();
        let messages = vec![paid_unanswered(now - Duration::days(1))];
        assert!(!has_attention_required(&messages, now));
    }

    #[test]
    fn test_each_disqualifier() {
        let now = Utc::now();
        let base = paid_unanswered(now + Duration::days(1));
        assert!(base.requires_attention(now));

        let mut m = base.clone();
        m.is_processed = false;
        assert!(!m.requires_attention(now));

        let mut m = base.clone();
        m.value_usd = None;
        assert!(!m.requires_attention(now));

        let mut m = base.clone();
        m.has_responded = true;
        assert!(!m.requires_attention(now));

        let mut m = base;
        m.is_claimed = true;
        assert!(!m.requires_attention(now));
    }

    #[test]
    fn test_empty_mailbox() {
        assert!(!has_attention_required(&[], Utc::now()));
    }

    #[test]
    fn test_one_eligible_among_many() {
        let now = Utc::now();
        let mut messages = vec![
            Message {
                has_responded: true,
                ..paid_unanswered(now + Duration::days(2))
            },
            Message {
                is_claimed: true,
                ..paid_unanswered(now + Duration::days(2))
            },
        ];
        assert!(!has_attention_required(&messages, now));
        messages.push(paid_unanswered(now + Duration::hours(1)));
        assert!(has_attention_required(&messages, now));
    }

    proptest! {
        #[test]
        fn prop_deterministic_for_same_inputs(
            is_processed: bool,
            has_value: bool,
            has_responded: bool,
            is_claimed: bool,
            offset_secs in -86_400i64..86_400,
        ) {
            let now = Utc::now();
            let message = Message {
                is_processed,
                value_usd: has_value.then_some(5.0),
                has_responded,
                is_claimed,
                expiry_date: now + Duration::seconds(offset_secs),
            };
            let messages = vec![message];
            let first = has_attention_required(&messages, now);
            let second = has_attention_required(&messages, now);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_expiry_flip(days in 1i64..365) {
            // All else equal, moving expiry from future to past flips the
            // singleton result from true to false.
            let now = Utc::now();
            let future = vec![paid_unanswered(now + Duration::days(days))];
            let past = vec![paid_unanswered(now - Duration::days(days))];
            prop_assert!(has_attention_required(&future, now));
            prop_assert!(!has_attention_required(&past, now));
        }
    }
}
