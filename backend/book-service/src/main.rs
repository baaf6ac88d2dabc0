use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use auth_gateway::{AuthGateway, MetricsMiddleware, ServiceMetrics};
use catalog_common::{cors, init_tracing};
use book_service::config::Config;
use book_service::handlers;
use book_service::repository::{BookRepository, InMemoryBookRepository};
use book_service::security;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing("info,book_service=debug,auth_gateway=debug", config.json_logs());

    info!("Starting book-service v{}", env!("CARGO_PKG_VERSION"));

    let metrics = ServiceMetrics::new().context("Failed to register metrics")?;
    let policy = Arc::new(security::route_policy());
    let verifier = Arc::new(config.auth.build_verifier());
    info!(
        jwks_url = %config.auth.jwks_config().jwks_url,
        validate_exp = config.auth.auth_validate_exp,
        "Auth gateway configured"
    );

    let repo: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::new());
    let repo = web::Data::from(repo);
    let metrics_data = web::Data::new(metrics.clone());
    let cors_origins = config.server.cors_allowed_origins.clone();

    let bind_addr = config.bind_addr();
    info!("book-service listening on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(metrics_data.clone())
            .wrap(
                AuthGateway::new(policy.clone(), verifier.clone())
                    .with_metrics(metrics.gateway.clone()),
            )
            .wrap(cors(&cors_origins))
            .wrap(MetricsMiddleware::new(metrics.http.clone()))
            .wrap(TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
