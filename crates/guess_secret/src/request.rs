//! # Request Slots
//!
//! Lifecycle of one logical request (guesses query, winner query,
//! submission) with stale-response suppression.
//!
//! ## Generations
//!
//! ```text
//!  begin() ──▶ gen 1 Loading ──▶ begin() ──▶ gen 2 Loading
//!                   │                              │
//!          (late) resolve(gen 1)          resolve(gen 2)
//!                   ▼                              ▼
//!               discarded                    Ready / Failed
//! ```
//!
//! Every `begin` or `reset` bumps the slot's generation. A result is applied
//! only if it carries the current generation, so an older in-flight request
//! can never overwrite a newer one or a reset.

use crate::error::GameError;

/// Outcome of one asynchronous operation as tracked by the workflow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestState<T> {
    /// Nothing requested, or reset after the contract handle went away.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Ready(T),
    /// The latest request failed.
    Failed(GameError),
}

impl<T> RequestState<T> {
    /// True while a request is in flight.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The value when `Ready`.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The error when `Failed`.
    #[must_use]
    pub const fn error(&self) -> Option<&GameError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short state name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Proof of which request a result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a ticket is needed to resolve the request"]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    /// Generation this ticket was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// One logical request slot: current state plus generation counter.
#[derive(Debug, Default)]
pub struct RequestSlot<T> {
    generation: u64,
    state: RequestState<T>,
}

impl<T> RequestSlot<T> {
    /// Empty slot in `Idle`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: RequestState::Idle,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// Current generation.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new request, superseding any in-flight one.
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.state = RequestState::Loading;
        RequestTicket {
            generation: self.generation,
        }
    }

    /// True if `ticket` belongs to the latest request.
    #[inline]
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a result if `ticket` is still current.
    ///
    /// Returns `false` when the result was stale and got discarded.
    pub fn resolve(&mut self, ticket: RequestTicket, outcome: Result<T, GameError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = match outcome {
            Ok(value) => RequestState::Ready(value),
            Err(err) => RequestState::Failed(err),
        };
        true
    }

    /// Fails the slot immediately, without a request in flight.
    pub fn fail(&mut self, err: GameError) {
        self.generation += 1;
        self.state = RequestState::Failed(err);
    }

    /// Back to `Idle`; anything in flight becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
    }
}
