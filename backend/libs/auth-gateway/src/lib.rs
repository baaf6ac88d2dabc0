//! # Auth Gateway
//!
//! Bearer-token authentication and route authorization shared by the catalog
//! services.
//!
//! ## Modules
//! - `jwks`: signing key resolution from a remote JWKS endpoint
//! - `verifier`: RS256 token verification
//! - `role`: role extraction from verified claims
//! - `policy`: per-service route classification
//! - `middleware`: the actix-web gateway composing the above
//! - `metrics`: Prometheus metrics on a process-scoped registry

pub mod config;
pub mod error;
pub mod jwks;
pub mod metrics;
pub mod middleware;
pub mod policy;
pub mod role;
pub mod verifier;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::AuthSettings;
pub use error::AuthError;
pub use jwks::{JwkSet, JwksConfig, JwksKeyResolver, KeyResolver, StaticKeyResolver};
pub use metrics::{metrics_handler, GatewayMetrics, MetricsMiddleware, ServiceMetrics};
pub use middleware::{AuthContext, AuthGateway};
pub use policy::{AccessLevel, PathMatcher, PolicyRule, RoutePolicy};
pub use role::{extract_role, Role};
pub use verifier::{ClaimsPolicy, TokenVerifier, VerifiedIdentity};
