use async_trait::async_trait;
use chrono::Utc;

use crate::database::connection::DbPool;
use crate::models::payment::{Payment, PaymentDraft, PaymentError};
use crate::storage::PaymentStore;

/// `PaymentStore` over the `payments` table.
#[derive(Clone)]
pub struct PgPaymentStore {
    pool: DbPool,
}

impl PgPaymentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, draft: PaymentDraft) -> Result<Payment, PaymentError> {
        let now = Utc::now();

        let payment = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (order_id, user_id, amount, currency, payment_method, status, transaction_id, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
            .bind(draft.order_id)
            .bind(draft.user_id)
            .bind(draft.amount)
            .bind(draft.currency)
            .bind(draft.payment_method)
            .bind(draft.status)
            .bind(draft.transaction_id)
            .bind(draft.description)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(payment)
    }

    async fn overwrite(&self, id: i64, draft: PaymentDraft) -> Result<Payment, PaymentError> {
        let now = Utc::now();

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET
                order_id = $2,
                user_id = $3,
                amount = $4,
                currency = $5,
                payment_method = $6,
                status = $7,
                transaction_id = $8,
                description = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.order_id)
        .bind(draft.user_id)
        .bind(draft.amount)
        .bind(draft.currency)
        .bind(draft.payment_method)
        .bind(draft.status)
        .bind(draft.transaction_id)
        .bind(draft.description)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        payment.ok_or(PaymentError::NotFound { id })
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, PaymentError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    async fn find_all(&self) -> Result<Vec<Payment>, PaymentError> {
        let payments = sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Payment>, PaymentError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    async fn find_by_order_id(&self, order_id: i64) -> Result<Vec<Payment>, PaymentError> {
        let payments =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE order_id = $1 ORDER BY id")
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(payments)
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, PaymentError> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE transaction_id = $1 ORDER BY id LIMIT 1",
        )
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Payment>, PaymentError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE status = $1 ORDER BY created_at DESC, id DESC",
        )
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    async fn count_by_status(&self, status: &str) -> Result<i64, PaymentError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save(&self, draft: PaymentDraft) -> Result<Payment, PaymentError> {
        match draft.id {
            Some(id) => self.overwrite(id, draft).await,
            None => self.insert(draft).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), PaymentError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PaymentError::NotFound { id });
        }

        Ok(())
    }
}
