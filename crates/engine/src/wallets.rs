//! The module contains the `Wallet` record and its entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money};

/// A per-user balance record.
///
/// Each user owns exactly one wallet, created together with the user. The
/// balance is only ever changed by a committed ledger operation; nothing else
/// in the system assigns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    /// Stable identifier, generated once and persisted as a string column.
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Money,
    /// Manual circuit breaker. While set, the wallet rejects deposits and
    /// outbound transfers; no engine code path ever sets it.
    pub has_inconsistency: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: Money::ZERO,
            has_inconsistency: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub balance: i64,
    pub has_inconsistency: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(wallet.id.to_string()),
            user_id: ActiveValue::Set(wallet.user_id.to_string()),
            balance: ActiveValue::Set(wallet.balance.cents()),
            has_inconsistency: ActiveValue::Set(wallet.has_inconsistency),
            created_at: ActiveValue::Set(wallet.created_at),
            updated_at: ActiveValue::Set(wallet.updated_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |value: &str| {
            Uuid::parse_str(value).map_err(|_| EngineError::NotFound("wallet not found".to_string()))
        };
        Ok(Self {
            id: parse(&model.id)?,
            user_id: parse(&model.user_id)?,
            balance: Money::new(model.balance),
            has_inconsistency: model.has_inconsistency,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wallet_starts_empty_and_unflagged() {
        let wallet = Wallet::new(Uuid::new_v4());
        assert_eq!(wallet.balance, Money::ZERO);
        assert!(!wallet.has_inconsistency);
    }

    #[test]
    fn model_round_trip_preserves_balance() {
        let wallet = Wallet::new(Uuid::new_v4());
        let active = ActiveModel::from(&wallet);
        let model = Model {
            id: active.id.clone().unwrap(),
            user_id: active.user_id.clone().unwrap(),
            balance: 10050,
            has_inconsistency: false,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        };
        let back = Wallet::try_from(model).unwrap();
        assert_eq!(back.id, wallet.id);
        assert_eq!(back.balance, Money::new(10050));
    }

    #[test]
    fn corrupt_id_is_rejected() {
        let model = Model {
            id: "not-a-uuid".to_string(),
            user_id: Uuid::new_v4().to_string(),
            balance: 0,
            has_inconsistency: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Wallet::try_from(model).is_err());
    }
}
