//! # Game Session
//!
//! One mounted game card. Owns every request slot, the pending form input
//! and the current contract handle and signer.
//!
//! ## Lifecycle
//!
//! ```text
//!   mount() ──▶ lookup handle ──▶ sync
//!      │
//!      ├── on_registry_changed() ── handle differs? ──▶ sync (or reset)
//!      ├── connect() / disconnect()       signer only
//!      ├── set_name() / set_number()      form input only
//!      ├── submit_form() ──▶ submitter ──▶ refresh
//!      └── view() ──▶ GameView            pure projection
//! ```
//!
//! No lock is held across an `.await`: every async entry point copies what
//! it needs first.

use std::sync::Arc;

use guess_chain::{ChainClient, ContractLookup, SignerContext};
use guess_shared::{ContractHandle, ContractId};
use parking_lot::Mutex;

use crate::config::GameConfig;
use crate::notify::Notifier;
use crate::presentation::{project, GameView};
use crate::request::RequestState;
use crate::submit::GuessSubmitter;
use crate::sync::{StateSynchronizer, SyncSnapshot};
use crate::validation::GuessInput;

/// A mounted game card bound to one chain client and one registry.
pub struct GameSession<C, N: ?Sized, R> {
    registry: Arc<R>,
    synchronizer: Arc<StateSynchronizer<C, N>>,
    submitter: GuessSubmitter<C, N>,
    handle: Mutex<Option<ContractHandle>>,
    signer: Mutex<Option<SignerContext>>,
    input: Mutex<GuessInput>,
}

impl<C, N, R> GameSession<C, N, R>
where
    C: ChainClient,
    N: Notifier + ?Sized,
    R: ContractLookup,
{
    /// Creates an unmounted session with no signer.
    #[must_use]
    pub fn new(client: Arc<C>, notifier: Arc<N>, registry: Arc<R>, config: &GameConfig) -> Self {
        let synchronizer = Arc::new(StateSynchronizer::new(
            Arc::clone(&client),
            Arc::clone(&notifier),
            config.caller,
        ));
        let submitter = GuessSubmitter::new(client, notifier, Arc::clone(&synchronizer), config.tx);

        Self {
            registry,
            synchronizer,
            submitter,
            handle: Mutex::new(None),
            signer: Mutex::new(None),
            input: Mutex::new(GuessInput::default()),
        }
    }

    /// Resolves the contract handle and fetches the board.
    pub async fn mount(&self) -> SyncSnapshot {
        let handle = self.registry.lookup(ContractId::GuessSecret);
        tracing::info!(
            "Mounted on {}",
            handle.as_ref().map_or_else(|| "<no contract>".to_string(), ToString::to_string)
        );
        self.set_handle(handle.clone());
        self.synchronizer.sync(handle.as_ref()).await
    }

    /// Re-resolves the handle after the registry or active network changed.
    ///
    /// Syncs only when the handle actually changed. Any change resets the
    /// submission slot; losing the handle also resets both query slots
    /// before this returns.
    pub async fn on_registry_changed(&self) -> SyncSnapshot {
        let handle = self.registry.lookup(ContractId::GuessSecret);
        if *self.handle.lock() == handle {
            return self.synchronizer.snapshot();
        }

        match &handle {
            Some(h) => tracing::info!("Contract handle changed to {}", h),
            None => tracing::info!("Contract handle lost"),
        }
        self.set_handle(handle.clone());
        self.synchronizer.sync(handle.as_ref()).await
    }

    fn set_handle(&self, handle: Option<ContractHandle>) {
        let mut current = self.handle.lock();
        if *current != handle {
            self.submitter.reset();
            *current = handle;
        }
    }

    /// Sets the active account and signer.
    pub fn connect(&self, signer: SignerContext) {
        tracing::info!("Wallet connected: {}", signer.account());
        *self.signer.lock() = Some(signer);
    }

    /// Forgets the active account.
    pub fn disconnect(&self) {
        tracing::info!("Wallet disconnected");
        *self.signer.lock() = None;
    }

    /// Updates the name field.
    pub fn set_name(&self, name: impl Into<String>) {
        self.input.lock().name = name.into();
    }

    /// Updates the number field.
    pub fn set_number(&self, number: impl Into<String>) {
        self.input.lock().number = number.into();
    }

    /// Current form input.
    #[must_use]
    pub fn input(&self) -> GuessInput {
        self.input.lock().clone()
    }

    /// Submits the form. The input is cleared only when the transaction
    /// succeeded.
    pub async fn submit_form(&self) -> RequestState<()> {
        let handle = self.handle.lock().clone();
        let signer = self.signer.lock().clone();
        let input = self.input();

        let state = self
            .submitter
            .submit(handle.as_ref(), signer.as_ref(), &input)
            .await;

        if matches!(state, RequestState::Ready(())) {
            self.input.lock().clear();
        }
        state
    }

    /// Re-fetches the board for the current handle.
    pub async fn refresh(&self) -> SyncSnapshot {
        let handle = self.handle.lock().clone();
        self.synchronizer.sync(handle.as_ref()).await
    }

    /// Current contract handle.
    #[must_use]
    pub fn handle(&self) -> Option<ContractHandle> {
        self.handle.lock().clone()
    }

    /// Current state of the submission slot.
    #[must_use]
    pub fn submission(&self) -> RequestState<()> {
        self.submitter.state()
    }

    /// Current state of both query slots.
    #[must_use]
    pub fn snapshot(&self) -> SyncSnapshot {
        self.synchronizer.snapshot()
    }

    /// Renders the current state.
    #[must_use]
    pub fn view(&self) -> GameView {
        let snapshot = self.synchronizer.snapshot();
        let handle = self.handle.lock().clone();
        project(
            handle.as_ref(),
            &snapshot.guesses,
            &snapshot.winner,
            &self.submitter.state(),
            &self.input.lock(),
        )
    }
}
