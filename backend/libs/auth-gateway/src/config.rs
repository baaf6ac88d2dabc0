use crate::jwks::{JwksConfig, JwksKeyResolver};
use crate::verifier::{ClaimsPolicy, TokenVerifier};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Gateway settings read from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Identity provider domain, e.g. `clerk.example.com`
    pub clerk_domain: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub jwks_cache_ttl_secs: u64,
    #[serde(default = "default_min_refresh_secs")]
    pub jwks_min_refresh_secs: u64,
    #[serde(default = "default_fetch_timeout_ms")]
    pub jwks_fetch_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub auth_validate_exp: bool,
    #[serde(default = "default_leeway_secs")]
    pub auth_leeway_secs: u64,
    #[serde(default)]
    pub auth_issuer: Option<String>,
    #[serde(default)]
    pub auth_audience: Option<String>,
}

fn default_cache_ttl_secs() -> u64 {
    36_000
}

fn default_min_refresh_secs() -> u64 {
    30
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

fn default_leeway_secs() -> u64 {
    60
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<AuthSettings>()
    }

    pub fn jwks_config(&self) -> JwksConfig {
        JwksConfig {
            cache_ttl: Duration::from_secs(self.jwks_cache_ttl_secs),
            min_refresh_interval: Duration::from_secs(self.jwks_min_refresh_secs),
            fetch_timeout: Duration::from_millis(self.jwks_fetch_timeout_ms),
            ..JwksConfig::for_domain(&self.clerk_domain)
        }
    }

    pub fn claims_policy(&self) -> ClaimsPolicy {
        ClaimsPolicy {
            validate_exp: self.auth_validate_exp,
            leeway_secs: self.auth_leeway_secs,
            issuer: self.auth_issuer.clone().filter(|s| !s.is_empty()),
            audience: self.auth_audience.clone().filter(|s| !s.is_empty()),
        }
    }

    /// Verifier backed by the provider's remote key set
    pub fn build_verifier(&self) -> TokenVerifier {
        let resolver = JwksKeyResolver::new(self.jwks_config());
        TokenVerifier::new(Arc::new(resolver), self.claims_policy())
    }
}
