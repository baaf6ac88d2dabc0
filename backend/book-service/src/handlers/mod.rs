pub mod books;
pub mod health;

use actix_web::web;
use auth_gateway::metrics_handler;
use catalog_common::{json_config, query_config};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/metrics", web::get().to(metrics_handler))
        .route("/admin/healthcheck", web::get().to(health::healthcheck))
        .service(
            web::scope("/books")
                .route("", web::get().to(books::list_books))
                .route("", web::post().to(books::create_book))
                .route("/search", web::get().to(books::search_books))
                .route("/{id}", web::get().to(books::get_book))
                .route("/{id}", web::put().to(books::update_book))
                .route("/{id}", web::delete().to(books::delete_book)),
        );
}
