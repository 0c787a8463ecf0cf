use std::{
    fmt::Display,
    sync::{Arc, PoisonError, RwLock},
};

use alloy::primitives::TxHash;
use futures::channel::mpsc::{self, UnboundedReceiver};

use crate::{
    error::SdkError,
    types::{Receipt, TransactionStatus, TransactionType},
};

/// Lifecycle event kinds subscribers can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PendingTransaction,
    SuccessTransaction,
    ErrorTransaction,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::PendingTransaction => write!(f, "pendingTransaction"),
            EventKind::SuccessTransaction => write!(f, "successTransaction"),
            EventKind::ErrorTransaction => write!(f, "errorTransaction"),
        }
    }
}

/// Lifecycle event of one orchestrated transaction.
///
/// Each operation emits at most one [`TransactionEvent::Pending`], always
/// before its single terminal [`TransactionEvent::Success`] or
/// [`TransactionEvent::Error`].
#[derive(Clone, Debug)]
pub enum TransactionEvent {
    /// The network accepted the transaction.
    Pending { hash: TxHash, transaction_type: TransactionType, token_name: Option<String> },
    /// The transaction was mined successfully.
    Success { transaction_type: TransactionType, receipt: Receipt, token_name: Option<String> },
    /// The operation failed at any stage.
    Error { transaction_type: TransactionType, error: SdkError, token_name: Option<String> },
}

impl TransactionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TransactionEvent::Pending { .. } => EventKind::PendingTransaction,
            TransactionEvent::Success { .. } => EventKind::SuccessTransaction,
            TransactionEvent::Error { .. } => EventKind::ErrorTransaction,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionEvent::Pending { transaction_type, .. }
            | TransactionEvent::Success { transaction_type, .. }
            | TransactionEvent::Error { transaction_type, .. } => *transaction_type,
        }
    }

    pub fn token_name(&self) -> Option<&str> {
        match self {
            TransactionEvent::Pending { token_name, .. }
            | TransactionEvent::Success { token_name, .. }
            | TransactionEvent::Error { token_name, .. } => token_name.as_deref(),
        }
    }

    /// Status a subscriber should record after seeing this event.
    pub fn status(&self) -> TransactionStatus {
        match self {
            TransactionEvent::Pending { .. } => TransactionStatus::None,
            TransactionEvent::Success { .. } => TransactionStatus::Success,
            TransactionEvent::Error { .. } => TransactionStatus::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionEvent::Pending { .. })
    }
}

impl Display for TransactionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.token_name() {
            Some(token) => format!("{} ({token})", self.transaction_type()),
            None => self.transaction_type().to_string(),
        };
        match self {
            TransactionEvent::Pending { hash, .. } => write!(f, "{label}: pending {hash}"),
            TransactionEvent::Success { receipt, .. } => {
                write!(f, "{label}: mined in block {}", receipt.block_number)
            },
            TransactionEvent::Error { error, .. } => write!(f, "{label}: {error}"),
        }
    }
}

type Handler = Arc<dyn Fn(&TransactionEvent) + Send + Sync>;

/// Per-service lifecycle event bus.
///
/// Clones share the same subscribers. Handlers run synchronously, in
/// subscription order, and all of them have returned before `emit` does.
#[derive(Clone, Default)]
pub struct TransactionEmitter {
    handlers: Arc<RwLock<Vec<(EventKind, Handler)>>>,
}

impl TransactionEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event kind.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&TransactionEvent) + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, Arc::new(handler)));
    }

    /// Returns a stream of all events emitted from now on.
    ///
    /// Events are dropped once the receiver is closed.
    pub fn subscribe(&self) -> UnboundedReceiver<TransactionEvent> {
        let (tx, rx) = mpsc::unbounded();
        for kind in [EventKind::PendingTransaction, EventKind::SuccessTransaction, EventKind::ErrorTransaction] {
            let tx = tx.clone();
            self.on(kind, move |event| {
                _ = tx.unbounded_send(event.clone());
            });
        }
        rx
    }

    pub fn emit(&self, event: TransactionEvent) {
        // Handlers may subscribe further handlers, so none is called under the lock
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(kind, _)| *kind == event.kind())
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for TransactionEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionEmitter").field("handlers", &self.subscriber_count()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::StreamExt;

    use super::*;

    fn pending() -> TransactionEvent {
        TransactionEvent::Pending {
            hash: TxHash::ZERO,
            transaction_type: TransactionType::CreateLock,
            token_name: None,
        }
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let emitter = TransactionEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let seen = seen.clone();
            emitter.on(EventKind::PendingTransaction, move |_| seen.lock().unwrap().push(i));
        }
        emitter.emit(pending());
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_handlers_filter_by_kind() {
        let emitter = TransactionEmitter::new();
        let seen = Arc::new(Mutex::new(0));
        let counter = seen.clone();
        emitter.on(EventKind::ErrorTransaction, move |_| *counter.lock().unwrap() += 1);
        emitter.emit(pending());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let emitter = TransactionEmitter::new();
        let mut events = emitter.clone().subscribe();
        emitter.emit(pending());
        drop(emitter);
        let event = futures::executor::block_on(events.next()).unwrap();
        assert_eq!(event.kind(), EventKind::PendingTransaction);
        assert_eq!(event.status(), TransactionStatus::None);
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_handler_may_subscribe() {
        let emitter = TransactionEmitter::new();
        let inner = emitter.clone();
        emitter.on(EventKind::PendingTransaction, move |_| {
            inner.on(EventKind::PendingTransaction, |_| {});
        });
        emitter.emit(pending());
        assert_eq!(emitter.subscriber_count(), 2);
    }
}
