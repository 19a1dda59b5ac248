use sea_orm::DatabaseConnection;

use crate::{EngineError, Money, ResultEngine};

mod access;
mod common;
mod deposit;
mod queries;
mod reverse;
mod transfer;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back
/// (via drop) on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Boundary re-check for mutating operations: amounts below one cent never
/// reach the stores.
fn ensure_positive_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(
            "amount must be at least 0.01".to_string(),
        ));
    }
    Ok(())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
