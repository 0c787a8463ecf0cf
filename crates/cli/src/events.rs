use colored::Colorize;
use stablecoin_sdk::event::{EventKind, TransactionEmitter};

/// Prints lifecycle events of a service as they happen.
pub(crate) fn print(emitter: &TransactionEmitter) {
    emitter.on(EventKind::PendingTransaction, |event| println!("{}", event.to_string().yellow()));
    emitter.on(EventKind::SuccessTransaction, |event| println!("{}", event.to_string().green()));
    emitter.on(EventKind::ErrorTransaction, |event| eprintln!("{}", event.to_string().red()));
}
