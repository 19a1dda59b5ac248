use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind, Wallet};

use super::{Engine, ensure_positive_amount, normalize_optional_text, with_tx};

impl Engine {
    /// Moves `amount` from the wallet of `user_id` to the wallet of
    /// `destination_user_id` and records a single `transfer` entry,
    /// atomically.
    ///
    /// Precondition order is load-bearing (first failing check wins): source
    /// wallet exists, source not frozen, not a self-transfer, sufficient
    /// balance, destination user exists, destination wallet exists. The
    /// destination wallet's inconsistency flag is deliberately not checked:
    /// a frozen wallet can still receive funds.
    pub async fn transfer(
        &self,
        user_id: Uuid,
        destination_user_id: Uuid,
        amount: Money,
        description: Option<&str>,
    ) -> ResultEngine<Transaction> {
        ensure_positive_amount(amount)?;
        let description = normalize_optional_text(description);

        with_tx!(self, |db_tx| {
            let source = Wallet::try_from(self.require_wallet_by_user(&db_tx, user_id).await?)?;
            if source.has_inconsistency {
                return Err(EngineError::Conflict(
                    "wallet has inconsistencies; transfers are blocked".to_string(),
                ));
            }
            if user_id == destination_user_id {
                return Err(EngineError::BadRequest(
                    "cannot transfer to self".to_string(),
                ));
            }
            if source.balance < amount {
                return Err(EngineError::BadRequest("insufficient balance".to_string()));
            }

            self.require_user(&db_tx, destination_user_id).await?;
            let destination = Wallet::try_from(
                self.require_wallet_by_user(&db_tx, destination_user_id)
                    .await?,
            )?;

            let mut tx = Transaction::completed(
                TransactionKind::Transfer,
                amount,
                Some(description.unwrap_or_else(|| "Transfer".to_string())),
            )?;
            tx.source_wallet_id = Some(source.id);
            tx.destination_wallet_id = Some(destination.id);

            self.debit_wallet(&db_tx, source.id, amount, "insufficient balance")
                .await?;
            self.credit_wallet(&db_tx, destination.id, amount).await?;
            self.insert_transaction(&db_tx, &tx).await?;

            tracing::debug!(
                transaction = %tx.id,
                source = %source.id,
                destination = %destination.id,
                "transfer recorded"
            );
            Ok(tx)
        })
    }
}
