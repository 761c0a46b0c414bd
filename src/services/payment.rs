use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::payment::{
    CreatePayment, DEFAULT_CURRENCY, Payment, PaymentDraft, PaymentError, STATUS_COMPLETED,
    STATUS_FAILED, STATUS_PENDING,
};
use crate::services::cache::{CacheKey, PaymentCache};
use crate::storage::PaymentStore;

/// Amounts above this fail the simulated processing. Placeholder value, not
/// a business rule.
pub const PROCESSING_AMOUNT_LIMIT: i64 = 1000;

pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    cache: PaymentCache,
    processing_delay: Duration,
}

impl PaymentService {
    pub fn new(store: Arc<dyn PaymentStore>, processing_delay: Duration) -> Self {
        Self {
            store,
            cache: PaymentCache::new(),
            processing_delay,
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, PaymentError> {
        info!("Retrieving payment with ID: {}", id);
        self.cache
            .one(CacheKey::Id(id), || self.store.find_by_id(id))
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<Payment>, PaymentError> {
        info!("Retrieving all payments");
        self.cache
            .many(CacheKey::All, || self.store.find_all())
            .await
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Payment>, PaymentError> {
        info!("Retrieving payments for user ID: {}", user_id);
        self.cache
            .many(CacheKey::User(user_id), || self.store.find_by_user_id(user_id))
            .await
    }

    pub async fn find_by_order_id(&self, order_id: i64) -> Result<Vec<Payment>, PaymentError> {
        info!("Retrieving payments for order ID: {}", order_id);
        self.cache
            .many(CacheKey::Order(order_id), || {
                self.store.find_by_order_id(order_id)
            })
            .await
    }

    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, PaymentError> {
        info!("Retrieving payment with transaction ID: {}", transaction_id);
        self.store.find_by_transaction_id(transaction_id).await
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<Payment>, PaymentError> {
        info!("Retrieving payments with status: {}", status);
        self.store.find_by_status(status).await
    }

    pub async fn count_by_status(&self, status: &str) -> Result<i64, PaymentError> {
        info!("Counting payments with status: {}", status);
        self.store.count_by_status(status).await
    }

    /// Save path: fills in a transaction id, currency and status when they
    /// are missing, then persists.
    pub async fn save(&self, payment: CreatePayment) -> Result<Payment, PaymentError> {
        info!("Saving payment for order ID: {}", payment.order_id);

        let draft = PaymentDraft {
            id: None,
            order_id: payment.order_id,
            user_id: payment.user_id,
            amount: payment.amount,
            currency: non_empty(payment.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            payment_method: payment.payment_method,
            status: non_empty(payment.status).unwrap_or_else(|| STATUS_PENDING.to_string()),
            transaction_id: Some(
                non_empty(payment.transaction_id).unwrap_or_else(|| Uuid::new_v4().to_string()),
            ),
            description: payment.description,
        };

        let saved = self.store.save(draft).await;
        self.cache.evict_all();
        saved
    }

    /// Raw update: persists the draft as given, no defaults applied.
    pub async fn update(&self, payment: PaymentDraft) -> Result<Payment, PaymentError> {
        info!("Updating payment with ID: {:?}", payment.id);
        let updated = self.store.save(payment).await;
        self.cache.evict_all();
        updated
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), PaymentError> {
        info!("Deleting payment with ID: {}", id);
        let deleted = self.store.delete_by_id(id).await;
        self.cache.evict_all();
        deleted
    }

    /// Simulated processing: waits, decides the outcome from the amount and
    /// stores the result through the save path. A failure of the simulation
    /// itself marks the payment failed instead of returning an error.
    pub async fn process_payment(&self, payment: CreatePayment) -> Result<Payment, PaymentError> {
        info!("Processing payment for order ID: {}", payment.order_id);

        let delay = self.processing_delay;
        let amount = payment.amount;
        let simulation = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            processing_outcome(amount)
        });

        self.settle(payment, simulation).await
    }

    /// Waits for a running simulation and saves `payment` with its result.
    pub(crate) async fn settle(
        &self,
        payment: CreatePayment,
        simulation: JoinHandle<Outcome>,
    ) -> Result<Payment, PaymentError> {
        let (status, description) = match simulation.await {
            Ok((status, description)) => (status.to_string(), description.to_string()),
            Err(e) if e.is_cancelled() => {
                error!("Payment processing interrupted: {}", e);
                (
                    STATUS_FAILED.to_string(),
                    "Payment processing interrupted".to_string(),
                )
            }
            Err(e) => {
                error!("Payment processing failed: {}", e);
                (
                    STATUS_FAILED.to_string(),
                    format!("Payment processing failed: {}", e),
                )
            }
        };

        self.save(CreatePayment {
            status: Some(status),
            description: Some(description),
            ..payment
        })
        .await
    }
}

/// Status and description assigned by the simulation.
pub type Outcome = (&'static str, &'static str);

/// Status and description the simulation assigns for `amount`.
pub fn processing_outcome(amount: Decimal) -> Outcome {
    if amount > Decimal::from(PROCESSING_AMOUNT_LIMIT) {
        (STATUS_FAILED, "Payment failed: Amount too high")
    } else {
        (STATUS_COMPLETED, "Payment processed successfully")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
