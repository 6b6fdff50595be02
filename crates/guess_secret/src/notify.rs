//! # Notifications
//!
//! User-facing toasts. The workflow pushes them; a sink decides where they go.
//!
//! ```text
//! ┌──────────────┐   notify    ┌─────────────────┐   drain   ┌──────────┐
//! │ Synchronizer │ ──────────▶ │ ChannelNotifier │ ────────▶ │ UI loop  │
//! │ Submitter    │             └─────────────────┘           └──────────┘
//! └──────────────┘   notify    ┌─────────────────┐
//!                  ──────────▶ │ TracingNotifier │ ──▶ log
//!                              └─────────────────┘
//! ```
//!
//! The channel sink never blocks the workflow: a full channel drops the toast
//! and logs a warning.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use guess_chain::{ChainClient, ContractCall, SignerContext, TxError, TxOptions, TxReceipt};
use guess_shared::ContractHandle;

/// Severity of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// A transaction is on its way.
    Pending,
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
}

/// One toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Pending toast.
    #[must_use]
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Pending,
            message: message.into(),
        }
    }

    /// Success toast.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// Error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Notification sink.
pub trait Notifier {
    /// Shows one toast. Must not block.
    fn notify(&self, notification: Notification);
}

// =============================================================================
// SINKS
// =============================================================================

/// Sink that writes every toast to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Pending | NotificationKind::Success => {
                tracing::info!("[toast] {}", notification.message);
            }
            NotificationKind::Error => tracing::warn!("[toast] {}", notification.message),
        }
    }
}

/// Sink backed by a bounded channel, drained by the UI.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    sender: Sender<Notification>,
}

impl ChannelNotifier {
    /// Creates the sink and the receiving end.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Toasts buffered before new ones are dropped.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, NotificationReceiver) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, NotificationReceiver { receiver })
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!("Notification channel full, dropping: {}", dropped.message);
            }
            Err(TrySendError::Disconnected(dropped)) => {
                tracing::debug!("Nobody listening, dropping: {}", dropped.message);
            }
        }
    }
}

/// Receiving end of a [`ChannelNotifier`].
#[derive(Clone, Debug)]
pub struct NotificationReceiver {
    receiver: Receiver<Notification>,
}

impl NotificationReceiver {
    /// Takes every pending toast (non-blocking).
    pub fn drain(&self) -> Vec<Notification> {
        self.receiver.try_iter().collect()
    }

    /// Takes one toast if any (non-blocking).
    pub fn try_recv(&self) -> Option<Notification> {
        self.receiver.try_recv().ok()
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Submits `call` and reports its progress: one pending toast, then exactly
/// one success or error toast.
pub async fn tx_with_toast<C, N>(
    client: &C,
    notifier: &N,
    signer: &SignerContext,
    handle: &ContractHandle,
    call: &ContractCall,
    options: &TxOptions,
) -> Result<TxReceipt, TxError>
where
    C: ChainClient,
    N: Notifier + ?Sized,
{
    notifier.notify(Notification::pending("Transaction pending…"));
    tracing::debug!("Submitting {} to {}", call.method(), handle);

    match client.submit_tx(signer, handle, call, options).await {
        Ok(receipt) => {
            tracing::info!("{} included in block {}", call.method(), receipt.block_number);
            notifier.notify(Notification::success("Transaction successful"));
            Ok(receipt)
        }
        Err(err) => {
            tracing::warn!("{} failed: {}", call.method(), err);
            notifier.notify(Notification::error(format!("Transaction failed: {err}")));
            Err(err)
        }
    }
}
