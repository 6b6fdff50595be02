//! # Guess Secret
//!
//! Contract-interaction workflow for the guess-the-number game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           GameSession                               │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐   refresh    ┌─────────────────┐               │
//! │  │ GuessSubmitter  │ ───────────▶ │ StateSynchroniz.│               │
//! │  │                 │              │                 │               │
//! │  │ • validation    │              │ • guesses slot  │               │
//! │  │ • guess tx      │              │ • winner slot   │               │
//! │  │ • submit slot   │              │ • generations   │               │
//! │  └────────┬────────┘              └────────┬────────┘               │
//! │           │          ┌─────────────┐       │                        │
//! │           └────────▶ │  Notifier   │ ◀─────┘                        │
//! │                      └─────────────┘                                │
//! │                                                                     │
//! │  request states ──▶ project() ──▶ GameView                          │
//! └─────────────────────────────────────────────────────────────────────┘
//!            │ ChainClient / ContractLookup (guess_chain)
//!            ▼
//!        chain node or LocalChain
//! ```
//!
//! ## Modules
//!
//! - `request`: request states and generation-keyed slots
//! - `validation`: pure checks on the guess form
//! - `sync`: the state synchronizer
//! - `submit`: the guess submitter
//! - `presentation`: projection into a view model
//! - `notify`: toasts and transaction progress
//! - `session`: one mounted game card
//! - `config`: TOML configuration

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod notify;
pub mod presentation;
pub mod request;
pub mod session;
pub mod submit;
pub mod sync;
pub mod validation;

// Re-export the bridge and shared types
pub use guess_chain as chain;
pub use guess_shared as shared;

pub use config::{ConfigError, GameConfig};
pub use error::{GameError, GameResult, ValidationError};
pub use notify::{
    tx_with_toast, ChannelNotifier, Notification, NotificationKind, NotificationReceiver,
    Notifier, TracingNotifier,
};
pub use presentation::{project, FormView, GameView, GuessRow, GuessesView, LOADING_TEXT, NO_WINNER_TEXT};
pub use request::{RequestSlot, RequestState, RequestTicket};
pub use session::GameSession;
pub use submit::GuessSubmitter;
pub use sync::{StateSynchronizer, SyncSnapshot};
pub use validation::{validate_guess, GuessInput, ValidGuess};
