use actix_web::web;

use crate::handlers;
use crate::utils::helpers::{json_error_handler, path_error_handler};

/// Mounts the payment API under `/api/payments`.
pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api/payments")
                // fixed segments go before `/{id}`
                .service(web::resource("/health").route(web::get().to(handlers::health::health)))
                .service(
                    web::resource("/process").route(web::post().to(handlers::payments::process)),
                )
                .service(
                    web::resource("/user/{user_id}")
                        .route(web::get().to(handlers::payments::get_user_payments)),
                )
                .service(
                    web::resource("/order/{order_id}")
                        .route(web::get().to(handlers::payments::get_order_payments)),
                )
                .service(
                    web::resource("/status/{status}/count")
                        .route(web::get().to(handlers::payments::count_status_payments)),
                )
                .service(
                    web::resource("/status/{status}")
                        .route(web::get().to(handlers::payments::get_status_payments)),
                )
                .service(
                    web::resource("/transaction/{transaction_id}")
                        .route(web::get().to(handlers::payments::get_transaction_payment)),
                )
                .service(
                    web::resource("")
                        .route(web::get().to(handlers::payments::all))
                        .route(web::post().to(handlers::payments::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(handlers::payments::get_payment))
                        .route(web::put().to(handlers::payments::update))
                        .route(web::delete().to(handlers::payments::delete)),
                ),
        );
}
