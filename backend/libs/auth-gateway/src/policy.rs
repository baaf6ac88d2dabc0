//! Route classification
//!
//! A [`RoutePolicy`] is an ordered list of rules. The first rule whose method
//! and path match decides the access level. Requests no rule matches are
//! `Authenticated`, or `AdminOnly` for the configured admin methods.

use actix_web::http::Method;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Authenticated,
    AdminOnly,
}

#[derive(Debug, Clone)]
pub enum PathMatcher {
    Exact(String),
    Contains(String),
    /// Matches the whole path
    Regex(Regex),
}

impl PathMatcher {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn contains(fragment: impl Into<String>) -> Self {
        Self::Contains(fragment.into())
    }

    /// Compile `pattern` anchored at both ends
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex(Regex::new(&format!("^(?:{})$", pattern))?))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(expected) => path == expected,
            PathMatcher::Contains(fragment) => path.contains(fragment.as_str()),
            PathMatcher::Regex(re) => re.is_match(path),
        }
    }
}

/// One row of the policy table. An empty matcher list matches every path.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    pub method: Option<Method>,
    pub paths: Vec<PathMatcher>,
    pub access: AccessLevel,
}

impl PolicyRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(expected) = &self.method {
            if expected != method {
                return false;
            }
        }
        self.paths.is_empty() || self.paths.iter().any(|m| m.matches(path))
    }
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<PolicyRule>,
    admin_methods: Vec<Method>,
}

impl RoutePolicy {
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder::default()
    }

    pub fn classify(&self, method: &Method, path: &str) -> AccessLevel {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(method, path)) {
            return rule.access;
        }

        if self.admin_methods.contains(method) {
            AccessLevel::AdminOnly
        } else {
            AccessLevel::Authenticated
        }
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }
}

pub struct RoutePolicyBuilder {
    rules: Vec<PolicyRule>,
    admin_methods: Vec<Method>,
}

impl Default for RoutePolicyBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            admin_methods: vec![Method::PUT, Method::DELETE],
        }
    }
}

impl RoutePolicyBuilder {
    pub fn rule(mut self, rule: PolicyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Every request with `method` is public
    pub fn public_method(self, method: Method) -> Self {
        self.rule(PolicyRule {
            method: Some(method),
            paths: Vec::new(),
            access: AccessLevel::Public,
        })
    }

    /// Any method on a matching path is public
    pub fn public_paths(self, paths: impl IntoIterator<Item = PathMatcher>) -> Self {
        self.rule(PolicyRule {
            method: None,
            paths: paths.into_iter().collect(),
            access: AccessLevel::Public,
        })
    }

    /// `method` on a matching path is public
    pub fn public_for(self, method: Method, paths: impl IntoIterator<Item = PathMatcher>) -> Self {
        self.rule(PolicyRule {
            method: Some(method),
            paths: paths.into_iter().collect(),
            access: AccessLevel::Public,
        })
    }

    /// CORS preflight, `/metrics`, health checks and the admin prefix
    pub fn public_infrastructure(self) -> Self {
        self.public_method(Method::OPTIONS).public_paths([
            PathMatcher::exact("/metrics"),
            PathMatcher::contains("/healthcheck"),
            PathMatcher::contains("/admin"),
        ])
    }

    /// Methods that need the admin role when no rule matches
    pub fn admin_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.admin_methods = methods.into_iter().collect();
        self
    }

    pub fn build(self) -> RoutePolicy {
        RoutePolicy {
            rules: self.rules,
            admin_methods: self.admin_methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_policy() -> RoutePolicy {
        RoutePolicy::builder()
            .public_infrastructure()
            .public_for(
                Method::GET,
                [
                    PathMatcher::regex(r".*/books/?").unwrap(),
                    PathMatcher::regex(r".*/books/search.*").unwrap(),
                ],
            )
            .build()
    }

    #[test]
    fn test_options_always_public() {
        let policy = catalog_policy();
        for path in ["/books/1", "/reviews", "/anything/at/all", "/"] {
            assert_eq!(policy.classify(&Method::OPTIONS, path), AccessLevel::Public);
        }
    }

    #[test]
    fn test_infrastructure_paths_public_for_any_method() {
        let policy = catalog_policy();
        for method in [Method::GET, Method::POST, Method::DELETE] {
            assert_eq!(policy.classify(&method, "/metrics"), AccessLevel::Public);
            assert_eq!(
                policy.classify(&method, "/admin/healthcheck"),
                AccessLevel::Public
            );
            assert_eq!(
                policy.classify(&method, "/v1/healthcheck"),
                AccessLevel::Public
            );
        }
    }

    #[test]
    fn test_metrics_match_is_exact() {
        let policy = catalog_policy();
        assert_eq!(
            policy.classify(&Method::GET, "/metrics/extra"),
            AccessLevel::Authenticated
        );
    }

    #[test]
    fn test_regex_is_anchored() {
        let matcher = PathMatcher::regex(r".*/books/?").unwrap();
        assert!(matcher.matches("/books"));
        assert!(matcher.matches("/api/books/"));
        assert!(!matcher.matches("/books/1"));
    }

    #[test]
    fn test_fallback_levels() {
        let policy = catalog_policy();
        assert_eq!(
            policy.classify(&Method::POST, "/books"),
            AccessLevel::Authenticated
        );
        assert_eq!(
            policy.classify(&Method::PUT, "/books/1"),
            AccessLevel::AdminOnly
        );
        assert_eq!(
            policy.classify(&Method::DELETE, "/books/1"),
            AccessLevel::AdminOnly
        );
        assert_eq!(
            policy.classify(&Method::PATCH, "/books/1"),
            AccessLevel::Authenticated
        );
    }

    #[test]
    fn test_first_match_wins() {
        let policy = RoutePolicy::builder()
            .rule(PolicyRule {
                method: Some(Method::DELETE),
                paths: vec![PathMatcher::exact("/books/locked")],
                access: AccessLevel::Authenticated,
            })
            .public_paths([PathMatcher::contains("/books")])
            .build();

        assert_eq!(
            policy.classify(&Method::DELETE, "/books/locked"),
            AccessLevel::Authenticated
        );
        assert_eq!(
            policy.classify(&Method::DELETE, "/books/other"),
            AccessLevel::Public
        );
    }

    #[test]
    fn test_custom_admin_methods() {
        let policy = RoutePolicy::builder()
            .admin_methods([Method::DELETE])
            .build();
        assert_eq!(
            policy.classify(&Method::PUT, "/x"),
            AccessLevel::Authenticated
        );
        assert_eq!(
            policy.classify(&Method::DELETE, "/x"),
            AccessLevel::AdminOnly
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let policy = catalog_policy();
        let first = policy.classify(&Method::PUT, "/books/7");
        for _ in 0..10 {
            assert_eq!(policy.classify(&Method::PUT, "/books/7"), first);
        }
    }
}
