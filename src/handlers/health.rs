use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use tracing::error;

use crate::models::payment::STATUS_PENDING;
use crate::services::payment::PaymentService;

pub const SERVICE_NAME: &str = "payment-service";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn new(status: &'static str, error: Option<String>) -> Self {
        Self {
            status,
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            error,
        }
    }
}

/// Liveness probe. Runs a count query so an unreachable database reports
/// unhealthy.
pub async fn health(service: web::Data<PaymentService>) -> Result<HttpResponse> {
    match service.count_by_status(STATUS_PENDING).await {
        Ok(_) => Ok(HttpResponse::Ok().json(HealthResponse::new("healthy", None))),
        Err(e) => {
            error!("Health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(HealthResponse::new(
                "unhealthy",
                Some("Storage unavailable".to_string()),
            )))
        }
    }
}
