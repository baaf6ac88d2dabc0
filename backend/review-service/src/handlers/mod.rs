pub mod health;
pub mod reviews;

use actix_web::web;
use auth_gateway::metrics_handler;
use catalog_common::json_config;

// Static segments are registered ahead of `{id}` so they are never read as ids
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/metrics", web::get().to(metrics_handler))
        .route("/admin/healthcheck", web::get().to(health::healthcheck))
        .service(
            web::scope("/reviews")
                .route("", web::get().to(reviews::list_reviews))
                .route("", web::post().to(reviews::create_review))
                .route("/books", web::get().to(reviews::list_books))
                .route("/book/{book_id}", web::get().to(reviews::reviews_for_book))
                .route(r"/{id:\d+}", web::get().to(reviews::get_review))
                .route(r"/{id:\d+}", web::put().to(reviews::update_review))
                .route(r"/{id:\d+}", web::delete().to(reviews::delete_review))
                .route(r"/{id:\d+}/book", web::get().to(reviews::book_for_review)),
        );
}
