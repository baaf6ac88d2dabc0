use crate::repository::ReviewRepository;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

/// GET /admin/healthcheck
///
/// Covers the local store only. The book service being down does not make
/// reviews unhealthy.
pub async fn healthcheck(repo: web::Data<dyn ReviewRepository>) -> HttpResponse {
    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "checks": { "store": { "healthy": true } }
        })),
        Err(e) => {
            error!("Review store health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "checks": { "store": { "healthy": false, "message": e.to_string() } }
            }))
        }
    }
}
