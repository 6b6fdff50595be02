//! # State Synchronizer
//!
//! Pulls `guesses` and `winner` from the contract and republishes them as
//! typed request states.
//!
//! ## Flow
//!
//! ```text
//!            sync(Some(handle))
//!                   │
//!        ┌──────────┴──────────┐   begin() both slots, no lock kept
//!        ▼                     ▼
//!   query guesses         query winner       (concurrent, tokio::join!)
//!        │                     │
//!     decode                decode
//!        │                     │
//!   resolve(ticket)       resolve(ticket)    stale tickets are discarded
//!        │                     │
//!        └─── notify on applied failure ───┘
//! ```
//!
//! `sync(None)` resets both slots to `Idle` before returning and makes every
//! in-flight query stale.

use std::sync::Arc;

use guess_chain::{ChainClient, DecodedOutput, OutputDecoder, QueryMethod, RawQueryResult};
use guess_shared::{AccountId, ContractHandle, Guess, WinnerState};
use parking_lot::Mutex;

use crate::error::GameError;
use crate::notify::{Notification, Notifier};
use crate::request::{RequestSlot, RequestState, RequestTicket};

/// Copy of both query states at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    /// State of the `guesses` query.
    pub guesses: RequestState<Vec<Guess>>,
    /// State of the `winner` query.
    pub winner: RequestState<WinnerState>,
}

impl SyncSnapshot {
    /// True while either query is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.guesses.is_loading() || self.winner.is_loading()
    }
}

/// Keeps the guesses and winner slots in step with the contract.
pub struct StateSynchronizer<C, N: ?Sized> {
    client: Arc<C>,
    notifier: Arc<N>,
    caller: Option<AccountId>,
    guesses: Mutex<RequestSlot<Vec<Guess>>>,
    winner: Mutex<RequestSlot<WinnerState>>,
}

impl<C, N> StateSynchronizer<C, N>
where
    C: ChainClient,
    N: Notifier + ?Sized,
{
    /// Creates a synchronizer with both slots `Idle`.
    ///
    /// `caller` is forwarded to every query and may be empty.
    #[must_use]
    pub fn new(client: Arc<C>, notifier: Arc<N>, caller: Option<AccountId>) -> Self {
        Self {
            client,
            notifier,
            caller,
            guesses: Mutex::new(RequestSlot::new()),
            winner: Mutex::new(RequestSlot::new()),
        }
    }

    /// Synchronizes with `handle`, or resets when there is none.
    ///
    /// Supersedes any sync still in flight. The returned snapshot is taken
    /// after both queries settled, so it may already show a newer request.
    pub async fn sync(&self, handle: Option<&ContractHandle>) -> SyncSnapshot {
        let Some(handle) = handle else {
            self.reset();
            return self.snapshot();
        };

        let guesses_ticket = self.guesses.lock().begin();
        let winner_ticket = self.winner.lock().begin();
        tracing::debug!(
            "Sync {} (guesses #{}, winner #{})",
            handle,
            guesses_ticket.generation(),
            winner_ticket.generation()
        );

        tokio::join!(
            self.load(
                &self.guesses,
                guesses_ticket,
                handle,
                QueryMethod::Guesses,
                OutputDecoder::decode_guesses,
            ),
            self.load(
                &self.winner,
                winner_ticket,
                handle,
                QueryMethod::Winner,
                OutputDecoder::decode_winner,
            ),
        );

        self.snapshot()
    }

    /// Forces both slots to `Idle`. Anything in flight becomes stale.
    pub fn reset(&self) {
        self.guesses.lock().reset();
        self.winner.lock().reset();
        tracing::debug!("Sync state reset");
    }

    /// Current state of both slots.
    #[must_use]
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            guesses: self.guesses(),
            winner: self.winner(),
        }
    }

    /// Current state of the guesses slot.
    #[must_use]
    pub fn guesses(&self) -> RequestState<Vec<Guess>> {
        self.guesses.lock().state().clone()
    }

    /// Current state of the winner slot.
    #[must_use]
    pub fn winner(&self) -> RequestState<WinnerState> {
        self.winner.lock().state().clone()
    }

    async fn load<T>(
        &self,
        slot: &Mutex<RequestSlot<T>>,
        ticket: RequestTicket,
        handle: &ContractHandle,
        method: QueryMethod,
        decode: fn(&RawQueryResult) -> DecodedOutput<T>,
    ) {
        let outcome = match self.client.query(self.caller.as_ref(), handle, method).await {
            Ok(raw) => decode(&raw).into_result().map_err(GameError::QueryFailed),
            Err(err) => Err(GameError::QueryFailed(err.to_string())),
        };
        let failure = outcome.as_ref().err().map(GameError::reason);

        if !slot.lock().resolve(ticket, outcome) {
            tracing::debug!("Discarded stale {} result #{}", method, ticket.generation());
            return;
        }

        if let Some(reason) = failure {
            tracing::warn!("Fetching {} from {} failed: {}", method, handle, reason);
            self.notifier.notify(Notification::error(format!(
                "Error while fetching {method}: {reason}"
            )));
        } else {
            tracing::debug!("Fetched {} from {}", method, handle);
        }
    }
}
