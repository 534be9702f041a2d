//! Submission event system.
//!
//! A UI can subscribe to observe an in-flight attempt without polling the
//! orchestrator.

use crate::submission::Phase;
use tokio::sync::broadcast;

/// Events emitted during a submission attempt.
#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    /// The attempt moved to a new phase.
    PhaseChanged {
        /// New phase.
        phase: Phase,
    },

    /// A pending message was reserved.
    ReservationObtained {
        /// Pending message identifier.
        mail_id: u64,
        /// Deposit address for the tier payment.
        deposit_address: String,
    },

    /// The tier payment was sent to the ledger.
    PaymentSent {
        /// Transaction reference returned by the ledger.
        tx_ref: String,
    },

    /// The message was finalized and is now visible to the recipient.
    Delivered {
        /// Pending message identifier.
        mail_id: u64,
    },

    /// The attempt failed.
    Failed {
        /// Error message.
        message: String,
    },
}

/// Channel for receiving submission events.
pub type SubmissionEventsChannel = broadcast::Receiver<SubmissionEvent>;

/// Sender for submission events.
pub type SubmissionEventsSender = broadcast::Sender<SubmissionEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (SubmissionEventsSender, SubmissionEventsChannel) {
    broadcast::channel(64)
}
