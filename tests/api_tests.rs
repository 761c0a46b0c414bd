//! End-to-end tests of the `/api/payments` routes against the in-memory store.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use payment_service::routes;
use payment_service::services::payment::PaymentService;
use payment_service::storage::InMemoryPaymentStore;

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let service = PaymentService::new(Arc::new(InMemoryPaymentStore::new()), Duration::ZERO);
    test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(routes::api::scoped_config),
    )
    .await
}

fn body(order_id: i64, user_id: i64, amount: f64) -> Value {
    json!({
        "orderId": order_id,
        "userId": user_id,
        "amount": amount,
        "paymentMethod": "card"
    })
}

async fn create<S>(app: &S, payload: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/payments")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

async fn get<S>(app: &S, uri: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await
}

#[actix_web::test]
async fn health_reports_healthy() {
    let app = app().await;

    let resp = get(&app, "/api/payments/health").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let health: Value = test::read_body_json(resp).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "payment-service");
    assert!(health.get("error").is_none());
}

#[actix_web::test]
async fn create_applies_defaults() {
    let app = app().await;

    let payment = create(&app, body(1, 2, 49.99)).await;

    assert!(payment["id"].as_i64().is_some());
    assert_eq!(payment["currency"], "USD");
    assert_eq!(payment["status"], "pending");
    assert!(!payment["transactionId"].as_str().unwrap().is_empty());
    assert_eq!(payment["amount"].as_f64(), Some(49.99));
    assert!(payment["createdAt"].is_string());
}

#[actix_web::test]
async fn create_rejects_non_positive_amounts() {
    let app = app().await;

    for amount in [0.0, -10.0] {
        let req = test::TestRequest::post()
            .uri("/api/payments")
            .set_json(body(1, 2, amount))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["success"], false);
    }

    let resp = get(&app, "/api/payments").await;
    let all: Value = test::read_body_json(resp).await;
    assert_eq!(all.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn create_rejects_missing_fields_and_bad_json() {
    let app = app().await;

    let missing = test::TestRequest::post()
        .uri("/api/payments")
        .set_json(json!({ "orderId": 1, "amount": 10.0, "paymentMethod": "card" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, missing).await.status(),
        StatusCode::BAD_REQUEST
    );

    let garbage = test::TestRequest::post()
        .uri("/api/payments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, garbage).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(resp).await;
    assert!(error["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn get_by_id_and_not_found() {
    let app = app().await;
    let created = create(&app, body(1, 2, 10.0)).await;
    let id = created["id"].as_i64().unwrap();

    let resp = get(&app, &format!("/api/payments/{}", id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    let resp = get(&app, "/api/payments/9999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn lists_by_user_newest_first() {
    let app = app().await;
    let first = create(&app, body(1, 42, 10.0)).await;
    create(&app, body(2, 7, 10.0)).await;
    let second = create(&app, body(3, 42, 10.0)).await;

    let resp = get(&app, "/api/payments/user/42").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(resp).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]
    );
}

#[actix_web::test]
async fn lists_by_order_and_status() {
    let app = app().await;
    create(&app, body(5, 1, 10.0)).await;
    create(&app, body(5, 2, 10.0)).await;
    create(&app, body(6, 3, 10.0)).await;

    let resp = get(&app, "/api/payments/order/5").await;
    let by_order: Value = test::read_body_json(resp).await;
    assert_eq!(by_order.as_array().unwrap().len(), 2);

    let resp = get(&app, "/api/payments/status/pending").await;
    let pending: Value = test::read_body_json(resp).await;
    assert_eq!(pending.as_array().unwrap().len(), 3);

    let resp = get(&app, "/api/payments/status/pending/count").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let count: Value = test::read_body_json(resp).await;
    assert_eq!(count, json!({ "status": "pending", "count": 3 }));

    let resp = get(&app, "/api/payments/status/completed").await;
    let completed: Value = test::read_body_json(resp).await;
    assert!(completed.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn finds_by_transaction_id() {
    let app = app().await;
    let created = create(&app, body(1, 2, 10.0)).await;
    let transaction_id = created["transactionId"].as_str().unwrap();

    let resp = get(&app, &format!("/api/payments/transaction/{}", transaction_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Value = test::read_body_json(resp).await;
    assert_eq!(found["id"], created["id"]);

    let resp = get(&app, "/api/payments/transaction/unknown").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn process_assigns_outcome_by_amount() {
    let app = app().await;

    let req = test::TestRequest::post()
        .uri("/api/payments/process")
        .set_json(body(1, 2, 1500.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let failed: Value = test::read_body_json(resp).await;
    assert_eq!(failed["status"], "failed");
    assert_eq!(failed["description"], "Payment failed: Amount too high");

    let req = test::TestRequest::post()
        .uri("/api/payments/process")
        .set_json(body(1, 2, 500.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Value = test::read_body_json(resp).await;
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["description"], "Payment processed successfully");
    assert!(completed["id"].as_i64().is_some());
}

#[actix_web::test]
async fn update_replaces_fields_and_is_visible() {
    let app = app().await;
    let created = create(&app, body(1, 2, 10.0)).await;
    let id = created["id"].as_i64().unwrap();

    // warm the cache
    assert_eq!(get(&app, &format!("/api/payments/{}", id)).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/payments/{}", id))
        .set_json(json!({
            "orderId": 1,
            "userId": 2,
            "amount": 25.5,
            "paymentMethod": "paypal",
            "status": "completed"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["transactionId"], created["transactionId"]);

    let resp = get(&app, &format!("/api/payments/{}", id)).await;
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["paymentMethod"], "paypal");
    assert_eq!(fetched["amount"].as_f64(), Some(25.5));
    assert_eq!(fetched["createdAt"], created["createdAt"]);
}

#[actix_web::test]
async fn update_unknown_or_invalid() {
    let app = app().await;

    let req = test::TestRequest::put()
        .uri("/api/payments/77")
        .set_json(body(1, 2, 10.0))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let created = create(&app, body(1, 2, 10.0)).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/payments/{}", created["id"]))
        .set_json(body(1, 2, -1.0))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn delete_then_not_found() {
    let app = app().await;
    let created = create(&app, body(1, 2, 10.0)).await;
    let uri = format!("/api/payments/{}", created["id"]);

    assert_eq!(get(&app, &uri).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_all_reflects_writes() {
    let app = app().await;

    let resp = get(&app, "/api/payments").await;
    let empty: Value = test::read_body_json(resp).await;
    assert!(empty.as_array().unwrap().is_empty());

    create(&app, body(1, 2, 10.0)).await;
    create(&app, body(3, 4, 20.0)).await;

    let resp = get(&app, "/api/payments").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let all: Value = test::read_body_json(resp).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn sub_cent_amounts_are_rejected_before_processing() {
    let app = app().await;

    for uri in ["/api/payments/process", "/api/payments"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(body(1, 2, 1000.004))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let resp = get(&app, "/api/payments").await;
    let all: Value = test::read_body_json(resp).await;
    assert!(all.as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/payments/process")
        .set_json(body(1, 2, 1000.0))
        .to_request();
    let processed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(processed["status"], "completed");
}

#[actix_web::test]
async fn non_numeric_path_ids_are_bad_requests() {
    let app = app().await;

    for uri in [
        "/api/payments/abc",
        "/api/payments/user/abc",
        "/api/payments/order/1.5",
    ] {
        let resp = get(&app, uri).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["success"], false);
        assert!(
            error["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid path parameter"),
            "{uri}"
        );
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/payments/abc").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
