//! In-memory payment store, used when no database is configured and in tests

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::payment::{Payment, PaymentDraft, PaymentError};
use crate::storage::PaymentStore;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Payment>,
}

/// Thread-safe map of payments keyed by id. Ids are assigned sequentially
/// starting at 1.
#[derive(Clone, Default)]
pub struct InMemoryPaymentStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, PaymentError> {
        self.table
            .read()
            .map_err(|e| PaymentError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, PaymentError> {
        self.table
            .write()
            .map_err(|e| PaymentError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn select<F>(&self, filter: F) -> Result<Vec<Payment>, PaymentError>
    where
        F: Fn(&Payment) -> bool,
    {
        let table = self.read()?;
        Ok(table.rows.values().filter(|p| filter(*p)).cloned().collect())
    }

    fn newest_first(mut payments: Vec<Payment>) -> Vec<Payment> {
        payments.sort_by_key(|p| Reverse((p.created_at, p.id)));
        payments
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, PaymentError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Payment>, PaymentError> {
        self.select(|_| true)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Payment>, PaymentError> {
        self.select(|p| p.user_id == user_id).map(Self::newest_first)
    }

    async fn find_by_order_id(&self, order_id: i64) -> Result<Vec<Payment>, PaymentError> {
        self.select(|p| p.order_id == order_id)
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, PaymentError> {
        let table = self.read()?;
        Ok(table
            .rows
            .values()
            .find(|p| p.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Payment>, PaymentError> {
        self.select(|p| p.status == status).map(Self::newest_first)
    }

    async fn count_by_status(&self, status: &str) -> Result<i64, PaymentError> {
        let table = self.read()?;
        Ok(table.rows.values().filter(|p| p.status == status).count() as i64)
    }

    async fn save(&self, draft: PaymentDraft) -> Result<Payment, PaymentError> {
        let mut table = self.write()?;
        let now = Utc::now();

        let (id, created_at) = match draft.id {
            Some(id) => {
                let existing = table.rows.get(&id).ok_or(PaymentError::NotFound { id })?;
                (id, existing.created_at)
            }
            None => {
                table.last_id += 1;
                (table.last_id, now)
            }
        };

        let payment = Payment {
            id,
            order_id: draft.order_id,
            user_id: draft.user_id,
            amount: draft.amount,
            currency: draft.currency,
            payment_method: draft.payment_method,
            status: draft.status,
            transaction_id: draft.transaction_id,
            description: draft.description,
            created_at,
            updated_at: now,
        };
        table.rows.insert(id, payment.clone());

        Ok(payment)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), PaymentError> {
        let mut table = self.write()?;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(PaymentError::NotFound { id })
    }
}
