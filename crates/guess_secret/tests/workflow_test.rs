//! Workflow tests against a scripted chain client.
//!
//! The mock answers queries from a response table unless a gate is armed for
//! that `(contract, method)`, in which case the query parks until the test
//! releases it. That is how the tests force a late response to arrive after a
//! newer request.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use alloy_sol_types::SolCall;
use guess_secret::chain::contracts::{GuessRecord, IGuessSecret};
use guess_secret::chain::{
    ChainClient, ContractCall, ContractLookup, DevSigner, QueryMethod, RawQueryResult,
    SignerContext, TransportError, TxError, TxOptions, TxReceipt,
};
use guess_secret::shared::{AccountId, ContractHandle, ContractId, Guess, NetworkId, WinnerState};
use guess_secret::{
    ChannelNotifier, GameConfig, GameError, GameSession, GuessesView, NotificationKind,
    NotificationReceiver, RequestState, StateSynchronizer, ValidationError,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

// =============================================================================
// MOCKS
// =============================================================================

type QueryReply = Result<RawQueryResult, TransportError>;
type Key = (AccountId, QueryMethod);

#[derive(Default)]
struct MockClient {
    responses: Mutex<HashMap<Key, QueryReply>>,
    gates: Mutex<HashMap<Key, VecDeque<oneshot::Receiver<QueryReply>>>>,
    queries: Mutex<Vec<Key>>,
    tx_results: Mutex<VecDeque<Result<TxReceipt, TxError>>>,
    submitted: Mutex<Vec<ContractCall>>,
}

impl MockClient {
    fn respond(&self, handle: &ContractHandle, method: QueryMethod, reply: QueryReply) {
        self.responses.lock().insert((*handle.address(), method), reply);
    }

    fn gate(&self, handle: &ContractHandle, method: QueryMethod) -> oneshot::Sender<QueryReply> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .entry((*handle.address(), method))
            .or_default()
            .push_back(rx);
        tx
    }

    fn next_tx(&self, result: Result<TxReceipt, TxError>) {
        self.tx_results.lock().push_back(result);
    }

    fn query_count(&self, method: QueryMethod) -> usize {
        self.queries.lock().iter().filter(|(_, m)| *m == method).count()
    }

    fn submitted(&self) -> Vec<ContractCall> {
        self.submitted.lock().clone()
    }
}

impl ChainClient for MockClient {
    async fn query(
        &self,
        _caller: Option<&AccountId>,
        contract: &ContractHandle,
        method: QueryMethod,
    ) -> Result<RawQueryResult, TransportError> {
        let key = (*contract.address(), method);
        self.queries.lock().push(key);

        let gate = self.gates.lock().get_mut(&key).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(TransportError::Unreachable("gate dropped".to_string())));
        }

        self.responses
            .lock()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Unreachable("no response scripted".to_string())))
    }

    async fn submit_tx(
        &self,
        _signer: &SignerContext,
        _contract: &ContractHandle,
        call: &ContractCall,
        _options: &TxOptions,
    ) -> Result<TxReceipt, TxError> {
        self.submitted.lock().push(call.clone());
        tokio::task::yield_now().await;
        self.tx_results
            .lock()
            .pop_front()
            .unwrap_or(Ok(TxReceipt { block_number: 1 }))
    }
}

#[derive(Default)]
struct MockRegistry {
    handle: Mutex<Option<ContractHandle>>,
}

impl MockRegistry {
    fn with(handle: &ContractHandle) -> Self {
        Self {
            handle: Mutex::new(Some(handle.clone())),
        }
    }

    fn set(&self, handle: Option<ContractHandle>) {
        *self.handle.lock() = handle;
    }
}

impl ContractLookup for MockRegistry {
    fn lookup(&self, contract: ContractId) -> Option<ContractHandle> {
        assert_eq!(contract, ContractId::GuessSecret);
        self.handle.lock().clone()
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

fn handle(byte: u8) -> ContractHandle {
    ContractHandle::new(
        NetworkId::from("development"),
        ContractId::GuessSecret,
        AccountId::repeat_byte(byte),
    )
}

fn guess(name: &str, number: u8) -> Guess {
    Guess {
        submitter: AccountId::repeat_byte(number),
        name: name.to_string(),
        number,
    }
}

fn guesses_reply(list: &[Guess]) -> QueryReply {
    let records: Vec<GuessRecord> = list.iter().map(GuessRecord::from).collect();
    Ok(RawQueryResult::ok(IGuessSecret::guessesCall::abi_encode_returns(&(records,))))
}

fn winner_reply(winner: Option<&str>) -> QueryReply {
    Ok(RawQueryResult::ok(IGuessSecret::winnerCall::abi_encode_returns(&(
        winner.is_some(),
        winner.unwrap_or_default().to_string(),
    ))))
}

fn board(client: &MockClient, h: &ContractHandle, list: &[Guess], winner: Option<&str>) {
    client.respond(h, QueryMethod::Guesses, guesses_reply(list));
    client.respond(h, QueryMethod::Winner, winner_reply(winner));
}

type Session = GameSession<MockClient, ChannelNotifier, MockRegistry>;

fn session(
    client: &Arc<MockClient>,
    registry: MockRegistry,
) -> (Session, Arc<MockRegistry>, NotificationReceiver) {
    let (notifier, toasts) = ChannelNotifier::channel(64);
    let registry = Arc::new(registry);
    let session = GameSession::new(
        Arc::clone(client),
        Arc::new(notifier),
        Arc::clone(&registry),
        &GameConfig::default(),
    );
    (session, registry, toasts)
}

fn errors(toasts: &NotificationReceiver) -> Vec<String> {
    toasts
        .drain()
        .into_iter()
        .filter(|t| t.kind == NotificationKind::Error)
        .map(|t| t.message)
        .collect()
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

#[tokio::test]
async fn test_sync_publishes_typed_state() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[guess("Ada", 42)], None);
    let (notifier, toasts) = ChannelNotifier::channel(16);
    let sync = StateSynchronizer::new(client, Arc::new(notifier), None);

    let snapshot = sync.sync(Some(&a)).await;

    assert_eq!(snapshot.guesses, RequestState::Ready(vec![guess("Ada", 42)]));
    assert_eq!(snapshot.winner, RequestState::Ready(WinnerState::Unrevealed));
    assert!(errors(&toasts).is_empty());
}

#[tokio::test]
async fn test_repeated_sync_is_idempotent() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[guess("Ada", 42), guess("Bob", 20)], Some("Bob"));
    let (notifier, _toasts) = ChannelNotifier::channel(16);
    let sync = StateSynchronizer::new(client, Arc::new(notifier), None);

    let first = sync.sync(Some(&a)).await;
    let second = sync.sync(Some(&a)).await;

    assert_eq!(first, second);
    assert!(matches!(first.guesses, RequestState::Ready(_)));
}

#[tokio::test]
async fn test_late_response_from_older_sync_is_discarded() {
    let client = Arc::new(MockClient::default());
    let (a, b) = (handle(0xa), handle(0xb));
    let release_guesses = client.gate(&a, QueryMethod::Guesses);
    let release_winner = client.gate(&a, QueryMethod::Winner);
    board(&client, &b, &[guess("Bob", 20)], None);

    let (notifier, toasts) = ChannelNotifier::channel(16);
    let sync = StateSynchronizer::new(Arc::clone(&client), Arc::new(notifier), None);

    let (_, landed) = tokio::join!(sync.sync(Some(&a)), async {
        tokio::task::yield_now().await;
        let landed = sync.sync(Some(&b)).await;
        release_guesses.send(guesses_reply(&[guess("Ada", 42)])).ok();
        release_winner
            .send(Err(TransportError::Unreachable("late failure".to_string())))
            .ok();
        landed
    });

    let expected = RequestState::Ready(vec![guess("Bob", 20)]);
    assert_eq!(landed.guesses, expected);
    assert_eq!(sync.guesses(), expected);
    assert_eq!(sync.winner(), RequestState::Ready(WinnerState::Unrevealed));
    assert!(errors(&toasts).is_empty(), "stale failure must not be toasted");
}

#[tokio::test]
async fn test_transport_failure_is_reported_once() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    client.respond(&a, QueryMethod::Guesses, guesses_reply(&[]));
    client.respond(
        &a,
        QueryMethod::Winner,
        Err(TransportError::Unreachable("connection reset".to_string())),
    );
    let (notifier, toasts) = ChannelNotifier::channel(16);
    let sync = StateSynchronizer::new(Arc::clone(&client), Arc::new(notifier), None);

    let snapshot = sync.sync(Some(&a)).await;

    assert_eq!(
        snapshot.winner,
        RequestState::Failed(GameError::QueryFailed(
            "chain unreachable: connection reset".to_string()
        ))
    );
    assert_eq!(
        errors(&toasts),
        vec!["Error while fetching winner: chain unreachable: connection reset".to_string()]
    );
    // Failed is terminal: nothing retries behind our back.
    assert_eq!(client.query_count(QueryMethod::Winner), 1);
}

#[tokio::test]
async fn test_sync_without_handle_resets_without_calls() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[guess("Ada", 42)], None);
    let (notifier, _toasts) = ChannelNotifier::channel(16);
    let sync = StateSynchronizer::new(Arc::clone(&client), Arc::new(notifier), None);

    sync.sync(Some(&a)).await;
    let calls = client.queries.lock().len();
    let snapshot = sync.sync(None).await;

    assert_eq!(snapshot.guesses, RequestState::Idle);
    assert_eq!(snapshot.winner, RequestState::Idle);
    assert_eq!(client.queries.lock().len(), calls);
}

// =============================================================================
// SESSION SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_scenario_a_valid_guess_is_sent() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[], None);
    let (session, _, toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    session.connect(DevSigner::context("ada"));
    session.set_number("42");
    session.set_name("Ada");
    board(&client, &a, &[guess("Ada", 42)], None);

    let state = session.submit_form().await;

    assert_eq!(state, RequestState::Ready(()));
    assert_eq!(client.submitted(), vec![ContractCall::guess("Ada", 42)]);
    assert!(session.input().is_empty());
    assert_eq!(
        session.snapshot().guesses,
        RequestState::Ready(vec![guess("Ada", 42)])
    );

    let kinds: Vec<_> = toasts.drain().into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Pending, NotificationKind::Success]);
}

#[tokio::test]
async fn test_scenario_b_out_of_range_never_reaches_chain() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[], None);
    let (session, _, toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    toasts.drain();
    let queries = client.queries.lock().len();

    session.connect(DevSigner::context("ada"));
    session.set_name("Ada");
    session.set_number("91");
    let state = session.submit_form().await;

    assert_eq!(
        state,
        RequestState::Failed(GameError::InvalidInput(ValidationError::NumberOutOfRange(91)))
    );
    assert!(client.submitted().is_empty());
    assert_eq!(client.queries.lock().len(), queries, "no refresh without a transaction");
    assert_eq!(session.input().number, "91");
    assert_eq!(errors(&toasts).len(), 1);
}

#[tokio::test]
async fn test_scenario_c_winner_application_error() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    client.respond(&a, QueryMethod::Guesses, guesses_reply(&[]));
    client.respond(&a, QueryMethod::Winner, Ok(RawQueryResult::reverted("not revealed")));
    let (session, _, toasts) = session(&client, MockRegistry::with(&a));

    let snapshot = session.mount().await;

    assert_eq!(
        snapshot.winner,
        RequestState::Failed(GameError::QueryFailed("not revealed".to_string()))
    );
    assert_eq!(
        errors(&toasts),
        vec!["Error while fetching winner: not revealed".to_string()]
    );
    assert_eq!(session.view().winner, "No winner yet.");
}

#[tokio::test]
async fn test_scenario_d_handle_lost_while_loading() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    let release = client.gate(&a, QueryMethod::Guesses);
    client.respond(&a, QueryMethod::Winner, winner_reply(None));
    let (session, registry, toasts) = session(&client, MockRegistry::with(&a));

    let (_, after_loss) = tokio::join!(session.mount(), async {
        tokio::task::yield_now().await;
        assert!(session.snapshot().guesses.is_loading());

        registry.set(None);
        let after_loss = session.on_registry_changed().await;
        release.send(guesses_reply(&[guess("Ada", 42)])).ok();
        after_loss
    });

    assert_eq!(after_loss.guesses, RequestState::Idle);
    assert_eq!(after_loss.winner, RequestState::Idle);
    assert_eq!(session.snapshot().guesses, RequestState::Idle);
    assert_eq!(session.handle(), None);
    assert_eq!(
        session.view().guesses,
        GuessesView::Placeholder { text: "Loading…" }
    );
    assert!(errors(&toasts).is_empty());
}

#[tokio::test]
async fn test_failed_tx_keeps_input_and_refreshes_once() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[guess("Ada", 42)], None);
    let (session, _, toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    toasts.drain();
    let (guesses_before, winner_before) = (
        client.query_count(QueryMethod::Guesses),
        client.query_count(QueryMethod::Winner),
    );

    client.next_tx(Err(TxError::Reverted("you cannot play twice".to_string())));
    session.connect(DevSigner::context("ada"));
    session.set_name("Ada");
    session.set_number("10");
    let state = session.submit_form().await;

    assert_eq!(
        state,
        RequestState::Failed(GameError::TxFailed(
            "transaction reverted: you cannot play twice".to_string()
        ))
    );
    assert_eq!(session.input().number, "10");
    assert_eq!(client.query_count(QueryMethod::Guesses), guesses_before + 1);
    assert_eq!(client.query_count(QueryMethod::Winner), winner_before + 1);
    assert_eq!(
        errors(&toasts),
        vec!["Transaction failed: transaction reverted: you cannot play twice".to_string()]
    );
}

#[tokio::test]
async fn test_successful_tx_refreshes_once() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[], None);
    let (session, _, _toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    let before = client.query_count(QueryMethod::Guesses);

    session.connect(DevSigner::context("ada"));
    session.set_name("Ada");
    session.set_number("0");
    session.submit_form().await;

    assert_eq!(client.query_count(QueryMethod::Guesses), before + 1);
}

#[tokio::test]
async fn test_not_connected_without_signer_or_handle() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[], None);
    let (session, registry, toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    session.set_name("Ada");
    session.set_number("42");
    assert_eq!(
        session.submit_form().await,
        RequestState::Failed(GameError::NotConnected)
    );

    session.connect(DevSigner::context("ada"));
    registry.set(None);
    session.on_registry_changed().await;
    assert_eq!(
        session.submit_form().await,
        RequestState::Failed(GameError::NotConnected)
    );

    assert!(client.submitted().is_empty());
    assert_eq!(
        errors(&toasts),
        vec![
            "Wallet not connected. Try again…".to_string(),
            "Wallet not connected. Try again…".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_revealed_winner_locks_form() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[guess("Bob", 20)], Some("Bob"));
    let (session, _, _toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    let view = session.view();

    assert_eq!(view.winner, "Bob is the winner!");
    assert!(!view.accepts_guesses());
    assert_eq!(view.contract_label, a.address().to_string());
}

#[tokio::test]
async fn test_registry_change_to_new_contract_resyncs() {
    let client = Arc::new(MockClient::default());
    let (a, b) = (handle(0xa), handle(0xb));
    board(&client, &a, &[guess("Ada", 42)], None);
    board(&client, &b, &[], Some("Eve"));
    let (session, registry, _toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    let calls = client.queries.lock().len();
    session.on_registry_changed().await;
    assert_eq!(client.queries.lock().len(), calls, "same handle, no sync");

    registry.set(Some(b.clone()));
    let snapshot = session.on_registry_changed().await;

    assert_eq!(session.handle(), Some(b));
    assert_eq!(snapshot.guesses, RequestState::Ready(Vec::new()));
    assert_eq!(
        snapshot.winner,
        RequestState::Ready(WinnerState::Revealed("Eve".to_string()))
    );
}

#[tokio::test]
async fn test_handle_change_during_submission_keeps_new_board() {
    let client = Arc::new(MockClient::default());
    let (a, b) = (handle(0xa), handle(0xb));
    board(&client, &a, &[guess("FromA", 1)], None);
    board(&client, &b, &[guess("FromB", 2)], None);
    let (session, registry, _toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    session.connect(DevSigner::context("ada"));
    session.set_name("Ada");
    session.set_number("42");
    let queries_on_a = client
        .queries
        .lock()
        .iter()
        .filter(|(address, _)| address == a.address())
        .count();

    registry.set(Some(b.clone()));
    let (state, _) = tokio::join!(session.submit_form(), session.on_registry_changed());

    assert_eq!(state, RequestState::Ready(()));
    assert_eq!(session.handle(), Some(b));
    assert_eq!(
        session.snapshot().guesses,
        RequestState::Ready(vec![guess("FromB", 2)])
    );
    assert_eq!(session.submission(), RequestState::Idle);
    let queries_on_a_after = client
        .queries
        .lock()
        .iter()
        .filter(|(address, _)| address == a.address())
        .count();
    assert_eq!(queries_on_a_after, queries_on_a, "old contract is not refreshed");
}

#[tokio::test]
async fn test_overlapping_submissions_each_refresh() {
    let client = Arc::new(MockClient::default());
    let a = handle(0xa);
    board(&client, &a, &[], None);
    let (session, _, toasts) = session(&client, MockRegistry::with(&a));

    session.mount().await;
    toasts.drain();
    let before = client.query_count(QueryMethod::Guesses);

    session.connect(DevSigner::context("ada"));
    session.set_name("Ada");
    session.set_number("42");
    let (first, second) = tokio::join!(session.submit_form(), session.submit_form());

    assert_eq!(first, RequestState::Ready(()));
    assert_eq!(second, RequestState::Ready(()));
    assert_eq!(client.submitted().len(), 2);
    assert_eq!(client.query_count(QueryMethod::Guesses), before + 2);
    assert_eq!(client.query_count(QueryMethod::Winner), before + 2);
    assert_eq!(session.submission(), RequestState::Ready(()));
}
