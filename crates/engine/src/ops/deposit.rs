use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind, Wallet};

use super::{Engine, ensure_positive_amount, normalize_optional_text, with_tx};

impl Engine {
    /// Credits `amount` to the wallet of `user_id` and records a `deposit`
    /// entry, atomically.
    ///
    /// Fails with `NotFound` when the wallet is missing and `Conflict` when
    /// the wallet is frozen by its inconsistency flag.
    pub async fn deposit(
        &self,
        user_id: Uuid,
        amount: Money,
        description: Option<&str>,
    ) -> ResultEngine<Transaction> {
        ensure_positive_amount(amount)?;
        let description = normalize_optional_text(description);

        with_tx!(self, |db_tx| {
            let wallet = Wallet::try_from(self.require_wallet_by_user(&db_tx, user_id).await?)?;
            if wallet.has_inconsistency {
                return Err(EngineError::Conflict(
                    "wallet has inconsistencies; deposits are blocked".to_string(),
                ));
            }

            let mut tx = Transaction::completed(
                TransactionKind::Deposit,
                amount,
                Some(description.unwrap_or_else(|| "Deposit".to_string())),
            )?;
            tx.destination_wallet_id = Some(wallet.id);

            self.credit_wallet(&db_tx, wallet.id, amount).await?;
            self.insert_transaction(&db_tx, &tx).await?;

            tracing::debug!(transaction = %tx.id, wallet = %wallet.id, "deposit recorded");
            Ok(tx)
        })
    }
}
