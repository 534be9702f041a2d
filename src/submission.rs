//! Mail submission orchestrator.
//!
//! Drives the three external effects of one outbound paid message (reserve,
//! pay, finalize) as an explicit state machine with correct partial-failure
//! recovery:
//!
//! ```text
//! submit()
//!    │ preconditions (no external effect)
//!    ▼
//! Reserving ──fail──▶ Failed (nothing retained, full retry safe)
//!    │
//!    ▼
//! Reserved
//!    │ re-check signing identity
//!    ▼
//! Paying ────fail──▶ Failed (reservation retained, retry resumes at pay)
//!    │
//!    ▼
//! Finalizing ─fail─▶ Failed (reservation + tx ref retained,
//!    │                       retry resumes at finalize, never re-pays)
//!    ▼
//! Succeeded (draft cleared)
//! ```

use crate::directory::{DirectoryService, MailDraft, PendingMessage};
use crate::error::{Error, ErrorCategory, Result};
use crate::event::{create_event_channel, SubmissionEvent, SubmissionEventsChannel, SubmissionEventsSender};
use crate::ledger::{LedgerClient, SigningIdentity, TokenDenomination, TransferError, TxReference};
use crate::tier::Tier;
use tracing::{debug, info, warn};

/// Phase of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No attempt in progress.
    #[default]
    Idle,
    /// Reserving a pending message with the directory.
    Reserving,
    /// Reservation held, payment not yet attempted.
    Reserved,
    /// Transfer handed to the ledger.
    Paying,
    /// Transfer confirmed, finalizing with the directory.
    Finalizing,
    /// Message delivered.
    Succeeded,
    /// Attempt failed; retained state decides where a retry resumes.
    Failed,
}

impl Phase {
    /// True while an external effect may be outstanding. New submissions
    /// and cancellation are rejected in these phases.
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::Reserving | Self::Reserved | Self::Paying | Self::Finalizing
        )
    }

    /// True once the attempt has reached a terminal phase.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// In-memory state of one submission attempt.
///
/// Exclusively owned by the orchestrator handling one sender's compose
/// form; never shared across recipients or sessions.
#[derive(Debug, Default)]
pub struct SubmissionAttempt {
    phase: Phase,
    pending: Option<PendingMessage>,
    tx_ref: Option<TxReference>,
    error: Option<ErrorCategory>,
}

impl SubmissionAttempt {
    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Reservation held by this attempt, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingMessage> {
        self.pending.as_ref()
    }

    /// Transaction reference of an executed-but-unconfirmed payment, if any.
    #[must_use]
    pub fn tx_ref(&self) -> Option<&TxReference> {
        self.tx_ref.as_ref()
    }

    /// Category of the last failure, if the attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<ErrorCategory> {
        self.error
    }

    /// True if retained state would make a plain cancel leak a reservation
    /// or an unconfirmed payment.
    #[must_use]
    pub fn holds_unresolved_state(&self) -> bool {
        self.pending.is_some() || self.tx_ref.is_some()
    }
}

/// Receipt for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Identifier of the delivered message.
    pub mail_id: u64,
    /// Ledger transaction that paid for it.
    pub tx_ref: TxReference,
}

/// Orchestrates the reserve → pay → finalize protocol for one sender.
pub struct MailSubmissionOrchestrator<D, L, S> {
    directory: D,
    ledger: L,
    signer: S,
    denomination: TokenDenomination,
    attempt: SubmissionAttempt,
    events_tx: SubmissionEventsSender,
}

impl<D, L, S> MailSubmissionOrchestrator<D, L, S>
where
    D: DirectoryService,
    L: LedgerClient,
    S: SigningIdentity,
{
    /// Create an orchestrator over the given collaborators.
    #[must_use]
    pub fn new(directory: D, ledger: L, signer: S, denomination: TokenDenomination) -> Self {
        let (events_tx, _events_rx) = create_event_channel();
        Self {
            directory,
            ledger,
            signer,
            denomination,
            attempt: SubmissionAttempt::default(),
            events_tx,
        }
    }

    /// Subscribe to submission events.
    #[must_use]
    pub fn subscribe_events(&self) -> SubmissionEventsChannel {
        self.events_tx.subscribe()
    }

    /// Current attempt state.
    #[must_use]
    pub fn attempt(&self) -> &SubmissionAttempt {
        &self.attempt
    }

    /// Submit the draft as a paid message to `recipient` at `tier`'s price.
    ///
    /// Retry semantics: calling `submit` again after a failure resumes at
    /// the step that failed. A retained reservation is reused instead of
    /// reserving again, and a retained transaction reference skips straight
    /// to finalize, so the protocol never pays twice. Resuming at finalize
    /// assumes the directory's confirm endpoint is idempotent keyed by the
    /// transaction reference; that contract cannot be enforced from this
    /// side.
    ///
    /// Dropping the returned future at an await point (a timeout or a
    /// `select!` losing the race) leaves the attempt mid-phase; the next
    /// call on the orchestrator downgrades it to `Failed` with all retained
    /// state intact, so the normal resume rules apply. If the drop happened
    /// during the transfer itself the outcome of that transfer is lost and
    /// the resumed attempt pays again.
    ///
    /// On success the draft's subject and body are cleared.
    ///
    /// # Errors
    ///
    /// Returns one of the enumerated [`Error`] kinds; see
    /// [`Error::category`] for the retry affordance each implies.
    pub async fn submit(
        &mut self,
        recipient: &str,
        draft: &mut MailDraft,
        tier: &Tier,
    ) -> Result<DeliveryReceipt> {
        self.recover_interrupted();
        if self.attempt.phase == Phase::Succeeded {
            self.attempt = SubmissionAttempt::default();
        }

        // Preconditions, in order, before any external effect. These leave
        // the attempt (and any retained reservation) untouched.
        if draft.reply_email.is_empty() {
            return Err(Error::MissingReplyEmail);
        }
        if draft.subject.is_empty() {
            return Err(Error::MissingSubject);
        }
        if draft.body.is_empty() {
            return Err(Error::MissingBody);
        }
        if !self.signer.is_available() {
            return Err(Error::NoSigningIdentity);
        }
        self.attempt.error = None;

        // Reserve, unless a prior failed attempt already holds one.
        let pending = if let Some(pending) = self.attempt.pending.clone() {
            info!(
                mail_id = pending.mail_id,
                "reusing reservation from previous attempt"
            );
            pending
        } else {
            self.set_phase(Phase::Reserving);
            debug!(recipient, "reserving pending message");
            match self
                .directory
                .reserve_pending_message(recipient, &draft.reply_email)
                .await
            {
                Ok(pending) => {
                    self.attempt.pending = Some(pending.clone());
                    self.set_phase(Phase::Reserved);
                    let _ = self.events_tx.send(SubmissionEvent::ReservationObtained {
                        mail_id: pending.mail_id,
                        deposit_address: pending.deposit_address.clone(),
                    });
                    pending
                }
                Err(e) => return Err(self.fail(Error::Reservation(e.to_string()))),
            }
        };

        // Pay, unless a prior finalize failure already holds a transaction
        // reference. The signing identity is re-checked here: it can drop
        // between steps without notification.
        let tx_ref = if let Some(tx_ref) = self.attempt.tx_ref.clone() {
            info!(%tx_ref, "payment already executed, resuming at finalize");
            tx_ref
        } else {
            if !self.signer.is_available() {
                return Err(self.fail(Error::NoSigningIdentity));
            }
            self.set_phase(Phase::Paying);
            debug!(
                deposit_address = %pending.deposit_address,
                amount_usd = tier.value_usd,
                "executing transfer"
            );
            match self
                .ledger
                .transfer(&pending.deposit_address, &self.denomination, tier.value_usd)
                .await
            {
                Ok(tx_ref) => {
                    self.attempt.tx_ref = Some(tx_ref.clone());
                    let _ = self.events_tx.send(SubmissionEvent::PaymentSent {
                        tx_ref: tx_ref.0.clone(),
                    });
                    tx_ref
                }
                Err(TransferError::InsufficientBalance) => {
                    return Err(self.fail(Error::InsufficientFunds))
                }
                Err(TransferError::SigningUnavailable) => {
                    return Err(self.fail(Error::NoSigningIdentity))
                }
                Err(TransferError::Other(msg)) => {
                    return Err(self.fail(Error::PaymentExecution(msg)))
                }
            }
        };

        // Finalize. Funds have moved, so a failure here is surfaced
        // distinctly and retains both the reservation and the tx reference.
        self.set_phase(Phase::Finalizing);
        match self
            .directory
            .confirm_pending_message_payment(recipient, draft, &tx_ref.0, pending.mail_id)
            .await
        {
            Ok(()) => {
                draft.clear_composed();
                self.attempt.pending = None;
                self.attempt.tx_ref = None;
                self.set_phase(Phase::Succeeded);
                let _ = self.events_tx.send(SubmissionEvent::Delivered {
                    mail_id: pending.mail_id,
                });
                info!(mail_id = pending.mail_id, %tx_ref, "message delivered");
                Ok(DeliveryReceipt {
                    mail_id: pending.mail_id,
                    tx_ref,
                })
            }
            Err(e) => Err(self.fail(Error::Finalization(e.to_string()))),
        }
    }

    /// Cancel an attempt that holds nothing needing resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedAttempt`] if a reservation or unconfirmed
    /// payment is retained; those need a retry or an explicit
    /// [`Self::abandon`].
    pub fn cancel(&mut self) -> Result<()> {
        self.recover_interrupted();
        if self.attempt.holds_unresolved_state() {
            return Err(Error::UnresolvedAttempt);
        }
        self.attempt = SubmissionAttempt::default();
        Ok(())
    }

    /// Deliberately discard a failed attempt's retained state, returning
    /// the orphaned reservation if one was held.
    ///
    /// The orphaned reservation (and any unconfirmed payment) is logged so
    /// an operator can reconcile it with the directory service.
    pub fn abandon(&mut self) -> Option<PendingMessage> {
        self.recover_interrupted();
        let orphaned = self.attempt.pending.take();
        if let Some(ref pending) = orphaned {
            warn!(
                mail_id = pending.mail_id,
                tx_ref = ?self.attempt.tx_ref,
                "abandoning attempt with retained reservation"
            );
        }
        self.attempt = SubmissionAttempt::default();
        orphaned
    }

    /// A dropped `submit` future leaves the attempt mid-phase. Exclusive
    /// ownership (`&mut self`) means no attempt can actually be running
    /// when another call observes such a phase, so it is downgraded to
    /// `Failed` with retained state intact and the resume rules apply.
    fn recover_interrupted(&mut self) {
        if self.attempt.phase.is_in_flight() {
            warn!(
                phase = ?self.attempt.phase,
                mail_id = ?self.attempt.pending.as_ref().map(|p| p.mail_id),
                "prior attempt was interrupted mid-flight"
            );
            self.attempt.error = Some(ErrorCategory::Other);
            self.set_phase(Phase::Failed);
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.attempt.phase = phase;
        let _ = self
            .events_tx
            .send(SubmissionEvent::PhaseChanged { phase });
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(%error, "submission attempt failed");
        self.attempt.error = Some(error.category());
        self.set_phase(Phase::Failed);
        let _ = self.events_tx.send(SubmissionEvent::Failed {
            message: error.to_string(),
        });
        error
    }
}
