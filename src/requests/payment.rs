use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::payment::{CreatePayment, UpdatePayment};

/// Body accepted by POST `/api/payments`, POST `/process` and PUT `/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: i64,
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[validate(length(max = 50))]
    pub currency: Option<String>,
    #[validate(length(max = 20), custom(function = "not_blank"))]
    pub payment_method: String,
    #[validate(length(max = 20))]
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Amounts are stored as `NUMERIC(19, 2)`, so anything finer than cents is
/// refused rather than rounded behind the caller's back.
fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::new(1, 2) {
        let mut error = ValidationError::new("amount_too_small");
        error.message = Some("Amount must be greater than 0".into());
        return Err(error);
    }
    if amount.normalize().scale() > 2 {
        let mut error = ValidationError::new("amount_precision");
        error.message = Some("Amount must have at most 2 decimal places".into());
        return Err(error);
    }
    Ok(())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

impl From<PaymentRequest> for CreatePayment {
    fn from(request: PaymentRequest) -> Self {
        Self {
            order_id: request.order_id,
            user_id: request.user_id,
            amount: request.amount,
            currency: request.currency,
            payment_method: request.payment_method,
            status: request.status,
            transaction_id: request.transaction_id,
            description: request.description,
        }
    }
}

impl From<PaymentRequest> for UpdatePayment {
    fn from(request: PaymentRequest) -> Self {
        Self {
            order_id: request.order_id,
            user_id: request.user_id,
            amount: request.amount,
            currency: request.currency,
            payment_method: request.payment_method,
            status: request.status,
            transaction_id: request.transaction_id,
            description: request.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> PaymentRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_minimal_body() {
        let request = parse(json!({
            "orderId": 1,
            "userId": 2,
            "amount": 19.99,
            "paymentMethod": "card"
        }));

        assert!(request.validate().is_ok());
        assert_eq!(request.amount, Decimal::new(1999, 2));
        assert!(request.currency.is_none());
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        for amount in [0.0, -5.0, 0.001] {
            let request = parse(json!({
                "orderId": 1,
                "userId": 2,
                "amount": amount,
                "paymentMethod": "card"
            }));
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"), "amount {amount}");
        }
    }

    #[test]
    fn rejects_sub_cent_amounts() {
        for amount in [1000.004, 12.345] {
            let request = parse(json!({
                "orderId": 1,
                "userId": 2,
                "amount": amount,
                "paymentMethod": "card"
            }));
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"), "amount {amount}");
        }
    }

    #[test]
    fn accepts_whole_and_cent_amounts() {
        for amount in [1000.0, 1000.1, 0.01, 12.34] {
            let request = parse(json!({
                "orderId": 1,
                "userId": 2,
                "amount": amount,
                "paymentMethod": "card"
            }));
            assert!(request.validate().is_ok(), "amount {amount}");
        }
    }

    #[test]
    fn rejects_blank_payment_method() {
        let request = parse(json!({
            "orderId": 1,
            "userId": 2,
            "amount": 10,
            "paymentMethod": "   "
        }));

        assert!(request.validate().is_err());
    }

    #[test]
    fn rejects_oversized_fields() {
        let request = parse(json!({
            "orderId": 1,
            "userId": 2,
            "amount": 10,
            "paymentMethod": "m".repeat(21),
            "currency": "X".repeat(51),
            "status": "s".repeat(21),
            "transactionId": "t".repeat(101),
            "description": "d".repeat(501)
        }));

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("currency"));
        assert!(fields.contains_key("status"));
        assert!(fields.contains_key("description"));
        // payment method and transaction id make up the rest
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn accepts_fields_at_their_limits() {
        let request = parse(json!({
            "orderId": 1,
            "userId": 2,
            "amount": 10,
            "paymentMethod": "m".repeat(20),
            "currency": "X".repeat(50),
            "status": "s".repeat(20),
            "transactionId": "t".repeat(100),
            "description": "d".repeat(500)
        }));

        assert!(request.validate().is_ok());
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let result = serde_json::from_value::<PaymentRequest>(json!({
            "orderId": 1,
            "amount": 10,
            "paymentMethod": "card"
        }));

        assert!(result.is_err());
    }
}
