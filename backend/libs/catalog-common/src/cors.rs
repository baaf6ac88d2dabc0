use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser frontend. `allowed_origins` is comma separated and
/// `*` allows any origin.
pub fn cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(vec!["GET", "PUT", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
            header::CONTENT_LENGTH,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .supports_credentials()
        .max_age(3600)
}
