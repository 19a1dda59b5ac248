//! Ledger core for the wallet service.
//!
//! The engine owns the persisted state (users, wallets, transactions) and
//! every balance-affecting operation: deposits, wallet-to-wallet transfers and
//! reversals. All mutations run inside a single database transaction and
//! either commit fully or leave no trace.

pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionDetail, TransactionKind, TransactionStatus};
pub use users::User;
pub use wallets::Wallet;

mod error;
mod money;
mod ops;
mod transactions;
mod users;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
