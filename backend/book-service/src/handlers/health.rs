use crate::repository::BookRepository;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

/// GET /admin/healthcheck
pub async fn healthcheck(repo: web::Data<dyn BookRepository>) -> HttpResponse {
    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "checks": { "store": { "healthy": true } }
        })),
        Err(e) => {
            error!("Book store health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "checks": { "store": { "healthy": false, "message": e.to_string() } }
            }))
        }
    }
}
