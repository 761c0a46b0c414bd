use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment with ID {id} not found")]
    NotFound { id: i64 },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row as handed to storage. `id: None` inserts, `Some` overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub id: Option<i64>,
    pub order_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
}

/// Input for the save path. Empty or missing `currency`, `status` and
/// `transaction_id` get filled in by the service.
#[derive(Debug, Clone, Default)]
pub struct CreatePayment {
    pub order_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub payment_method: String,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePayment {
    pub order_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub payment_method: String,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
}

impl Payment {
    /// Replaces the stored fields with `changes`. Optional columns left out
    /// of the update keep their current value.
    pub fn apply(self, changes: UpdatePayment) -> PaymentDraft {
        PaymentDraft {
            id: Some(self.id),
            order_id: changes.order_id,
            user_id: changes.user_id,
            amount: changes.amount,
            currency: changes.currency.unwrap_or(self.currency),
            payment_method: changes.payment_method,
            status: changes.status.unwrap_or(self.status),
            transaction_id: changes.transaction_id.or(self.transaction_id),
            description: changes.description.or(self.description),
        }
    }
}
