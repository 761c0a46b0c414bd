use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::models::payment::{CreatePayment, PaymentError, UpdatePayment};
use crate::requests::payment::PaymentRequest;
use crate::services::payment::PaymentService;
use crate::utils::helpers::{ApiResponse, validation_failed};

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

fn server_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error(message))
}

fn not_found(message: String) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error(message))
}

pub async fn all(service: web::Data<PaymentService>) -> Result<HttpResponse> {
    match service.find_all().await {
        Ok(payments) => {
            info!("Retrieved {} payments", payments.len());
            Ok(HttpResponse::Ok().json(payments))
        }
        Err(e) => {
            error!("Error retrieving payments: {}", e);
            Ok(server_error("Failed to retrieve payments"))
        }
    }
}

pub async fn get_payment(
    service: web::Data<PaymentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let payment_id = path.into_inner();

    match service.find_by_id(payment_id).await {
        Ok(Some(payment)) => {
            info!("Retrieved payment with ID: {}", payment_id);
            Ok(HttpResponse::Ok().json(payment))
        }
        Ok(None) => {
            warn!("Payment not found with ID: {}", payment_id);
            Ok(not_found(format!("Payment {} not found", payment_id)))
        }
        Err(e) => {
            error!("Error retrieving payment with ID {}: {}", payment_id, e);
            Ok(server_error("Failed to retrieve payment"))
        }
    }
}

pub async fn get_user_payments(
    service: web::Data<PaymentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    match service.find_by_user_id(user_id).await {
        Ok(payments) => {
            info!("Retrieved {} payments for user ID: {}", payments.len(), user_id);
            Ok(HttpResponse::Ok().json(payments))
        }
        Err(e) => {
            error!("Error retrieving payments for user ID {}: {}", user_id, e);
            Ok(server_error("Failed to retrieve payments"))
        }
    }
}

pub async fn get_order_payments(
    service: web::Data<PaymentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let order_id = path.into_inner();

    match service.find_by_order_id(order_id).await {
        Ok(payments) => {
            info!("Retrieved {} payments for order ID: {}", payments.len(), order_id);
            Ok(HttpResponse::Ok().json(payments))
        }
        Err(e) => {
            error!("Error retrieving payments for order ID {}: {}", order_id, e);
            Ok(server_error("Failed to retrieve payments"))
        }
    }
}

pub async fn get_status_payments(
    service: web::Data<PaymentService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let status = path.into_inner();

    match service.find_by_status(&status).await {
        Ok(payments) => {
            info!("Retrieved {} payments with status: {}", payments.len(), status);
            Ok(HttpResponse::Ok().json(payments))
        }
        Err(e) => {
            error!("Error retrieving payments with status {}: {}", status, e);
            Ok(server_error("Failed to retrieve payments"))
        }
    }
}

pub async fn count_status_payments(
    service: web::Data<PaymentService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let status = path.into_inner();

    match service.count_by_status(&status).await {
        Ok(count) => Ok(HttpResponse::Ok().json(StatusCount { status, count })),
        Err(e) => {
            error!("Error counting payments with status {}: {}", status, e);
            Ok(server_error("Failed to count payments"))
        }
    }
}

pub async fn get_transaction_payment(
    service: web::Data<PaymentService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let transaction_id = path.into_inner();

    match service.find_by_transaction_id(&transaction_id).await {
        Ok(Some(payment)) => Ok(HttpResponse::Ok().json(payment)),
        Ok(None) => {
            warn!("Payment not found with transaction ID: {}", transaction_id);
            Ok(not_found(format!(
                "Payment with transaction {} not found",
                transaction_id
            )))
        }
        Err(e) => {
            error!(
                "Error retrieving payment with transaction ID {}: {}",
                transaction_id, e
            );
            Ok(server_error("Failed to retrieve payment"))
        }
    }
}

pub async fn create(
    service: web::Data<PaymentService>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(validation_failed(&errors));
    }

    match service.save(CreatePayment::from(request.into_inner())).await {
        Ok(payment) => {
            info!("Created payment with ID: {}", payment.id);
            Ok(HttpResponse::Created().json(payment))
        }
        Err(e) => {
            error!("Error creating payment: {}", e);
            Ok(server_error("Failed to create payment"))
        }
    }
}

pub async fn process(
    service: web::Data<PaymentService>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(validation_failed(&errors));
    }

    match service
        .process_payment(CreatePayment::from(request.into_inner()))
        .await
    {
        Ok(payment) => {
            info!(
                "Processed payment with ID: {} ({})",
                payment.id, payment.status
            );
            Ok(HttpResponse::Ok().json(payment))
        }
        Err(e) => {
            error!("Error processing payment: {}", e);
            Ok(server_error("Failed to process payment"))
        }
    }
}

pub async fn update(
    service: web::Data<PaymentService>,
    path: web::Path<i64>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    let payment_id = path.into_inner();
    if let Err(errors) = request.validate() {
        return Ok(validation_failed(&errors));
    }

    let existing = match service.find_by_id(payment_id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            warn!("Payment not found with ID: {}", payment_id);
            return Ok(not_found(format!("Payment {} not found", payment_id)));
        }
        Err(e) => {
            error!("Error checking payment {}: {}", payment_id, e);
            return Ok(server_error("Failed to update payment"));
        }
    };

    let draft = existing.apply(UpdatePayment::from(request.into_inner()));

    match service.update(draft).await {
        Ok(payment) => {
            info!("Updated payment with ID: {}", payment_id);
            Ok(HttpResponse::Ok().json(payment))
        }
        // Deleted between the lookup and the write.
        Err(PaymentError::NotFound { id }) => Ok(not_found(format!("Payment {} not found", id))),
        Err(e) => {
            error!("Error updating payment with ID {}: {}", payment_id, e);
            Ok(server_error("Failed to update payment"))
        }
    }
}

pub async fn delete(
    service: web::Data<PaymentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let payment_id = path.into_inner();

    match service.find_by_id(payment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Payment not found with ID: {}", payment_id);
            return Ok(not_found(format!("Payment {} not found", payment_id)));
        }
        Err(e) => {
            error!("Error checking payment {}: {}", payment_id, e);
            return Ok(server_error("Failed to delete payment"));
        }
    }

    match service.delete_by_id(payment_id).await {
        Ok(()) => {
            info!("Deleted payment with ID: {}", payment_id);
            Ok(HttpResponse::NoContent().finish())
        }
        Err(PaymentError::NotFound { id }) => Ok(not_found(format!("Payment {} not found", id))),
        Err(e) => {
            error!("Error deleting payment with ID {}: {}", payment_id, e);
            Ok(server_error("Failed to delete payment"))
        }
    }
}
