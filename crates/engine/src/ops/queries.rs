use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransactionDetail, Wallet, transactions,
    wallets,
};

use super::Engine;

/// Read paths. These never mutate state and run directly on the connection,
/// outside any storage transaction.
impl Engine {
    /// Current balance of the wallet owned by `user_id`.
    pub async fn balance(&self, user_id: Uuid) -> ResultEngine<Money> {
        let wallet = Wallet::try_from(
            self.require_wallet_by_user(&self.database, user_id)
                .await?,
        )?;
        Ok(wallet.balance)
    }

    /// All transactions touching the wallet of `user_id` (as source or
    /// destination), newest first.
    pub async fn transactions_for_user(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let wallet = Wallet::try_from(
            self.require_wallet_by_user(&self.database, user_id)
                .await?,
        )?;

        let models = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::SourceWalletId.eq(wallet.id.to_string()))
                    .add(transactions::Column::DestinationWalletId.eq(wallet.id.to_string())),
            )
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    /// A single transaction with both wallet references resolved.
    pub async fn transaction_by_id(&self, id: Uuid) -> ResultEngine<TransactionDetail> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("transaction {id} not found")))?;
        let transaction = Transaction::try_from(model)?;

        let source_wallet = self
            .load_wallet_ref(transaction.source_wallet_id)
            .await?;
        let destination_wallet = self
            .load_wallet_ref(transaction.destination_wallet_id)
            .await?;

        Ok(TransactionDetail {
            transaction,
            source_wallet,
            destination_wallet,
        })
    }

    async fn load_wallet_ref(&self, wallet_id: Option<Uuid>) -> ResultEngine<Option<Wallet>> {
        let Some(wallet_id) = wallet_id else {
            return Ok(None);
        };
        wallets::Entity::find_by_id(wallet_id.to_string())
            .one(&self.database)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }
}
