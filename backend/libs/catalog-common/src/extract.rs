use crate::error::error_response;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web;

/// Malformed JSON bodies become 400 with the parser's message
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::BAD_REQUEST, err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Query strings that fail to parse become 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::BAD_REQUEST, err.to_string());
        InternalError::from_response(err, response).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use actix_web::{test as actix_test, App, HttpResponse};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code)]
        name: String,
    }

    #[derive(Deserialize)]
    struct Params {
        #[allow(dead_code)]
        page: u32,
    }

    async fn accept(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn list(_params: web::Query<Params>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_bad_json_is_bad_request() {
        let app = actix_test::init_service(
            App::new()
                .app_data(json_config())
                .route("/", web::post().to(accept)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = actix_test::read_body_json(resp).await;
        assert_eq!(body.code, 400);
        assert!(!body.error.is_empty());
    }

    #[actix_web::test]
    async fn test_bad_query_is_bad_request() {
        let app = actix_test::init_service(
            App::new()
                .app_data(query_config())
                .route("/", web::get().to(list)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/?page=first").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
