use actix_web::http::Method;
use auth_gateway::{PathMatcher, RoutePolicy};
use once_cell::sync::Lazy;

// Hardcoded patterns, always valid
static BOOK_COLLECTION: Lazy<PathMatcher> = Lazy::new(|| {
    PathMatcher::regex(r".*/books/?").expect("hardcoded book collection regex is invalid")
});
static BOOK_SEARCH: Lazy<PathMatcher> = Lazy::new(|| {
    PathMatcher::regex(r".*/books/search.*").expect("hardcoded book search regex is invalid")
});
static BOOK_BY_ID: Lazy<PathMatcher> = Lazy::new(|| {
    PathMatcher::regex(r".*/books/\d+").expect("hardcoded book id regex is invalid")
});

/// Access table for the book service.
///
/// Catalog reads are open to everyone. Writes need a token and `PUT`/`DELETE`
/// need the admin role.
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::builder()
        .public_infrastructure()
        .public_for(
            Method::GET,
            [BOOK_COLLECTION.clone(), BOOK_SEARCH.clone()],
        )
        .public_for(Method::GET, [BOOK_BY_ID.clone()])
        .build()
}
