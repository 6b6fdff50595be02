//! # Guess Submitter
//!
//! Validates a guess, sends the `guess` transaction and refreshes the board.
//!
//! ## Preconditions
//!
//! Checked in this order, before any network call:
//!
//! 1. a signer context is present
//! 2. a contract handle is present
//! 3. the number is 1-2 digits and at most 90
//! 4. the name is 1-90 characters
//!
//! A failed precondition fails the slot and shows one toast. A submitted
//! transaction shows its own pending/success/error toasts and is always
//! followed by exactly one refresh, even when a newer submission superseded
//! it. The refresh is skipped only when the contract handle changed or went
//! away while the transaction was in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use guess_chain::{ChainClient, ContractCall, SignerContext, TxOptions};
use guess_shared::ContractHandle;
use parking_lot::Mutex;

use crate::error::{GameError, GameResult};
use crate::notify::{tx_with_toast, Notification, Notifier};
use crate::request::{RequestSlot, RequestState};
use crate::sync::StateSynchronizer;
use crate::validation::{validate_guess, GuessInput, ValidGuess};

/// Sends guesses for one mounted session.
pub struct GuessSubmitter<C, N: ?Sized> {
    client: Arc<C>,
    notifier: Arc<N>,
    synchronizer: Arc<StateSynchronizer<C, N>>,
    slot: Mutex<RequestSlot<()>>,
    /// Bumped on every handle change.
    epoch: AtomicU64,
    options: TxOptions,
}

impl<C, N> GuessSubmitter<C, N>
where
    C: ChainClient,
    N: Notifier + ?Sized,
{
    /// Creates a submitter refreshing through `synchronizer`.
    #[must_use]
    pub fn new(
        client: Arc<C>,
        notifier: Arc<N>,
        synchronizer: Arc<StateSynchronizer<C, N>>,
        options: TxOptions,
    ) -> Self {
        Self {
            client,
            notifier,
            synchronizer,
            slot: Mutex::new(RequestSlot::new()),
            epoch: AtomicU64::new(0),
            options,
        }
    }

    /// Submits `input` as a guess and returns the outcome of this call.
    pub async fn submit(
        &self,
        handle: Option<&ContractHandle>,
        signer: Option<&SignerContext>,
        input: &GuessInput,
    ) -> RequestState<()> {
        let (handle, signer, guess) = match preflight(handle, signer, input) {
            Ok(checked) => checked,
            Err(err) => {
                tracing::info!("Guess rejected before sending: {}", err);
                self.notifier.notify(Notification::error(err.reason()));
                self.slot.lock().fail(err.clone());
                return RequestState::Failed(err);
            }
        };

        let epoch = self.epoch.load(Ordering::Acquire);
        let ticket = self.slot.lock().begin();
        let call = ContractCall::guess(&guess.name, guess.number);
        tracing::info!(
            "Submitting guess {} from {} (#{})",
            guess.number,
            signer.account(),
            ticket.generation()
        );

        let state = match tx_with_toast(
            self.client.as_ref(),
            self.notifier.as_ref(),
            signer,
            handle,
            &call,
            &self.options,
        )
        .await
        {
            Ok(_) => RequestState::Ready(()),
            Err(err) => RequestState::Failed(GameError::TxFailed(err.to_string())),
        };

        let outcome = match &state {
            RequestState::Failed(err) => Err(err.clone()),
            _ => Ok(()),
        };
        if !self.slot.lock().resolve(ticket, outcome) {
            tracing::debug!("Submission #{} superseded", ticket.generation());
        }
        if self.epoch.load(Ordering::Acquire) == epoch {
            self.synchronizer.sync(Some(handle)).await;
        } else {
            tracing::debug!(
                "Handle changed during submission #{}, skipping refresh",
                ticket.generation()
            );
        }

        state
    }

    /// Current state of the submission slot.
    #[must_use]
    pub fn state(&self) -> RequestState<()> {
        self.slot.lock().state().clone()
    }

    /// True while a transaction is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.slot.lock().state().is_loading()
    }

    /// Back to `Idle` after the contract handle changed. An in-flight
    /// submission becomes stale and will not refresh the board.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.slot.lock().reset();
    }
}

fn preflight<'a>(
    handle: Option<&'a ContractHandle>,
    signer: Option<&'a SignerContext>,
    input: &GuessInput,
) -> GameResult<(&'a ContractHandle, &'a SignerContext, ValidGuess)> {
    let signer = signer.ok_or(GameError::NotConnected)?;
    let handle = handle.ok_or(GameError::NotConnected)?;
    let guess = validate_guess(input)?;
    Ok((handle, signer, guess))
}
