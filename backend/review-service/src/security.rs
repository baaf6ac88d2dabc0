use actix_web::http::Method;
use auth_gateway::RoutePolicy;

/// Access table for the review service. Only infrastructure routes are open
/// and any verified caller may use the rest, whatever their role.
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::builder()
        .public_infrastructure()
        .admin_methods(Vec::<Method>::new())
        .build()
}
