//! Storage backends for payment records

use async_trait::async_trait;

use crate::models::payment::{Payment, PaymentDraft, PaymentError};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPaymentStore;
pub use postgres::PgPaymentStore;

/// Keyed storage for payments with the filtered lookups the service needs.
///
/// Implementations provide their own concurrency safety; callers add no
/// locking on top.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, PaymentError>;

    /// All payments, ordered by id.
    async fn find_all(&self) -> Result<Vec<Payment>, PaymentError>;

    /// Payments of one user, newest first.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Payment>, PaymentError>;

    async fn find_by_order_id(&self, order_id: i64) -> Result<Vec<Payment>, PaymentError>;

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, PaymentError>;

    /// Payments in one status, newest first.
    async fn find_by_status(&self, status: &str) -> Result<Vec<Payment>, PaymentError>;

    async fn count_by_status(&self, status: &str) -> Result<i64, PaymentError>;

    /// Inserts when `draft.id` is `None`, otherwise overwrites the row.
    ///
    /// Overwriting keeps `created_at` and refreshes `updated_at`. Returns
    /// `PaymentError::NotFound` if the id does not exist.
    async fn save(&self, draft: PaymentDraft) -> Result<Payment, PaymentError>;

    /// Returns `PaymentError::NotFound` when nothing was deleted.
    async fn delete_by_id(&self, id: i64) -> Result<(), PaymentError>;
}
