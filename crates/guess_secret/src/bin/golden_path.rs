//! # Golden Path
//!
//! Scripted end-to-end session on the local development chain:
//!
//! Deploy → Mount → Guess → Duplicate Rejected → Reveal → Form Locked
//!
//! Prints the rendered card and the toasts after every step. Exits with 1 if
//! any step does not end in the expected state.

use std::process;
use std::sync::Arc;

use guess_secret::chain::{
    commit, ContractCall, ContractRegistry, Deployer, DevSigner, LocalChain,
};
use guess_secret::shared::ContractId;
use guess_secret::{
    tx_with_toast, ChannelNotifier, GameConfig, GameSession, NotificationReceiver, RequestState,
};

const SECRET: u8 = 20;
const SALT: &str = "golden-path";

type Session = GameSession<LocalChain, ChannelNotifier, ContractRegistry>;

fn show(step: &str, session: &Session, toasts: &NotificationReceiver) {
    println!("┌─ {step} ─────────────────────────────────────────────");
    for line in session.view().to_string().lines() {
        println!("│ {line}");
    }
    for toast in toasts.drain() {
        println!("│ toast {:?}: {}", toast.kind, toast.message);
    }
    println!("└──────────────────────────────────────────────────────");
    println!();
}

fn check(ok: bool, what: &str, failures: &mut Vec<String>) {
    if ok {
        println!("✓ {what}");
    } else {
        println!("✗ {what}");
        failures.push(what.to_string());
    }
}

async fn run() -> Vec<String> {
    let mut failures = Vec::new();
    let config = GameConfig::default();
    let chain = Arc::new(LocalChain::new(config.network.clone()));
    let owner = DevSigner::context("alice");

    // =========================================================================
    // DEPLOY
    // =========================================================================
    let handle = match chain
        .deploy(&owner, ContractId::GuessSecret, commit(SECRET, SALT))
        .await
    {
        Ok(handle) => handle,
        Err(err) => {
            failures.push(format!("deploy failed: {err}"));
            return failures;
        }
    };

    let mut registry = ContractRegistry::new();
    registry.register(handle.network().clone(), ContractId::GuessSecret, *handle.address());
    registry.set_network(Some(config.network.clone()));

    let (notifier, toasts) = ChannelNotifier::channel(64);
    let session: Session = GameSession::new(
        Arc::clone(&chain),
        Arc::new(notifier.clone()),
        Arc::new(registry),
        &config,
    );

    // =========================================================================
    // MOUNT
    // =========================================================================
    let snapshot = session.mount().await;
    check(
        snapshot.guesses == RequestState::Ready(Vec::new()),
        "fresh contract shows an empty board",
        &mut failures,
    );
    show("mounted", &session, &toasts);

    // =========================================================================
    // GUESS
    // =========================================================================
    session.connect(DevSigner::context("bob"));
    session.set_name("Bob");
    session.set_number("20");
    let state = session.submit_form().await;
    check(state == RequestState::Ready(()), "bob's guess lands", &mut failures);
    check(session.input().is_empty(), "form cleared after success", &mut failures);
    show("bob guessed 20", &session, &toasts);

    session.set_name("Bob again");
    session.set_number("7");
    let state = session.submit_form().await;
    check(
        matches!(state, RequestState::Failed(_)),
        "second guess from the same account is rejected",
        &mut failures,
    );
    check(!session.input().is_empty(), "form kept after failure", &mut failures);
    show("bob tried again", &session, &toasts);

    session.connect(DevSigner::context("charlie"));
    session.set_name("Charlie");
    session.set_number("91");
    let state = session.submit_form().await;
    check(
        matches!(state, RequestState::Failed(_)),
        "out-of-range number never reaches the chain",
        &mut failures,
    );
    session.set_number("42");
    session.submit_form().await;
    show("charlie guessed 42", &session, &toasts);

    // =========================================================================
    // REVEAL
    // =========================================================================
    let reveal = tx_with_toast(
        chain.as_ref(),
        &notifier,
        &owner,
        &handle,
        &ContractCall::select_winner(SECRET, SALT),
        &config.tx,
    )
    .await;
    check(reveal.is_ok(), "owner reveals the secret", &mut failures);

    session.refresh().await;
    let view = session.view();
    check(view.winner == "Bob is the winner!", "bob is the winner", &mut failures);
    check(!view.accepts_guesses(), "form hidden once revealed", &mut failures);
    show("revealed", &session, &toasts);

    failures
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           GUESS SECRET GOLDEN PATH                   ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Cannot start runtime: {err}");
            process::exit(1);
        }
    };

    let failures = runtime.block_on(run());
    println!();
    if failures.is_empty() {
        println!("✅ GOLDEN PATH PASSED");
        process::exit(0);
    } else {
        println!("❌ GOLDEN PATH FAILED: {}", failures.join("; "));
        process::exit(1);
    }
}
