use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

use payment_service::config::Settings;
use payment_service::database::connection::{create_pool, run_migrations};
use payment_service::logging::init_logging;
use payment_service::routes;
use payment_service::services::payment::PaymentService;
use payment_service::storage::{InMemoryPaymentStore, PaymentStore, PgPaymentStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::load().context("Failed to load settings")?;
    init_logging(&settings.log);

    let store: Arc<dyn PaymentStore> = match settings.database.url.as_deref() {
        Some(url) => {
            let pool = create_pool(url, &settings.database)
                .await
                .context("Failed to connect to database")?;
            if settings.database.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("Failed to run migrations")?;
            }
            Arc::new(PgPaymentStore::new(pool))
        }
        None => {
            warn!("No database URL configured, payments are kept in memory");
            Arc::new(InMemoryPaymentStore::new())
        }
    };

    let service = web::Data::new(PaymentService::new(store, settings.processing.delay()));

    let address = (settings.server.host.clone(), settings.server.port);
    info!("Starting payment service on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(routes::api::scoped_config)
    })
    .bind(address)
    .context("Failed to bind server address")?
    .run()
    .await
    .context("Server error")?;

    Ok(())
}
