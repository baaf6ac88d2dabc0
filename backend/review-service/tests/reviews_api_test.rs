use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use auth_gateway::testing::{admin_token, forged_token, roleless_token, trusted_verifier, user_token};
use auth_gateway::{AuthGateway, ServiceMetrics};
use review_service::book_client::BookServiceClient;
use review_service::handlers;
use review_service::models::Review;
use review_service::repository::{InMemoryReviewRepository, ReviewRepository};
use review_service::security;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOKS: &str = r#"[{"id":1,"title":"Dune","author":"Frank Herbert","isbn":"978-0-441-17271-9","publishedYear":1965}]"#;

macro_rules! review_app {
    ($book_service_url:expr) => {{
        let repo: Arc<dyn ReviewRepository> = Arc::new(InMemoryReviewRepository::new());
        test::init_service(
            App::new()
                .app_data(web::Data::from(repo))
                .app_data(web::Data::new(BookServiceClient::new(
                    $book_service_url,
                    Duration::from_secs(2),
                )))
                .app_data(web::Data::new(ServiceMetrics::new().unwrap()))
                .wrap(AuthGateway::new(
                    Arc::new(security::route_policy()),
                    Arc::new(trusted_verifier()),
                ))
                .configure(handlers::configure_routes),
        )
        .await
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

async fn book_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BOOKS, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"id":1,"title":"Dune"}"#, "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn review_body(book_id: i64) -> serde_json::Value {
    json!({
        "bookId": book_id,
        "reviewerName": "Ada",
        "rating": 5,
        "comment": "A classic"
    })
}

#[actix_web::test]
async fn test_reads_require_token() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    for uri in ["/reviews", "/reviews/1", "/reviews/books", "/reviews/book/1"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "GET {}", uri);
    }

    let req = test::TestRequest::get()
        .uri("/reviews")
        .insert_header(bearer(&forged_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_healthcheck_and_metrics_are_public() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::get()
        .uri("/admin/healthcheck")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_books_proxy_is_verbatim() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::get()
        .uri("/reviews/books")
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, BOOKS);
}

#[actix_web::test]
async fn test_books_proxy_unavailable() {
    let app = review_app!("http://127.0.0.1:1");

    let req = test::TestRequest::get()
        .uri("/reviews/books")
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Book service unavailable");
}

#[actix_web::test]
async fn test_books_proxy_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(503).set_body_string("partial garbage"))
        .mount(&server)
        .await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::get()
        .uri("/reviews/books")
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_server_error());
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("partial garbage"));
}

#[actix_web::test]
async fn test_review_lifecycle() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(bearer(&roleless_token()))
        .set_json(review_body(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Review = test::read_body_json(resp).await;
    assert_eq!(created.book_id.id(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&user_token()))
        .to_request();
    let fetched: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::get()
        .uri("/reviews/book/1")
        .insert_header(bearer(&user_token()))
        .to_request();
    let for_book: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(for_book.len(), 1);

    // Any verified caller may edit or remove a review
    let patch = json!({"rating": 2, "reviewerName": " ", "comment": "Changed my mind"});
    let req = test::TestRequest::put()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&user_token()))
        .set_json(&patch)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Review = test::read_body_json(resp).await;
    assert_eq!(updated.rating, 2);
    assert_eq!(updated.reviewer_name, "Ada");
    assert_eq!(updated.comment, "Changed my mind");

    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&roleless_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        test::read_body(resp).await,
        format!("Review with ID {} deleted successfully", created.id)
    );

    let req = test::TestRequest::get()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        format!("Review with ID {} not found", created.id)
    );
}

#[actix_web::test]
async fn test_admin_may_also_edit_reviews() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(bearer(&user_token()))
        .set_json(review_body(1))
        .to_request();
    let created: Review = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"rating": 3}))
        .to_request();
    let updated: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.rating, 3);

    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Deleting twice is a 404, not a role failure
    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", created.id))
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_review_rejected() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(bearer(&user_token()))
        .set_json(json!({"reviewerName": "Ada", "rating": 6, "comment": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "bookId: bookId is required; rating: rating cannot be more than 5; "
    );
}

#[actix_web::test]
async fn test_weak_reference_resolution() {
    let server = book_service().await;
    let app = review_app!(server.uri());

    let mut ids = Vec::new();
    for book_id in [1, 404] {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .insert_header(bearer(&user_token()))
            .set_json(review_body(book_id))
            .to_request();
        let review: Review = test::call_and_read_body_json(&app, req).await;
        ids.push(review.id);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/reviews/{}/book", ids[0]))
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, r#"{"id":1,"title":"Dune"}"#);

    // Orphaned reference: the review is fine, the book is gone
    let req = test::TestRequest::get()
        .uri(&format!("/reviews/{}/book", ids[1]))
        .insert_header(bearer(&user_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Referenced book not found");
}
