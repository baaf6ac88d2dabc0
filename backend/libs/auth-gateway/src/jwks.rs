//! Signing key resolution
//!
//! Keys are looked up by the `kid` carried in a token header. The remote
//! resolver fetches the identity provider's JWKS document on a cache miss and
//! keeps every RSA key it finds for `cache_ttl`.

use crate::error::{AuthError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const JWKS_PATH: &str = "/.well-known/jwks.json";
const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60 * 60;
const DEFAULT_MIN_REFRESH_SECS: u64 = 30;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Source of public signing keys
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, kid: &str) -> Result<Arc<DecodingKey>>;
}

/// JWKS document
#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// Single entry of a JWKS document. Only RSA fields are read.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: Option<String>,
    pub kty: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

impl JwkSet {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AuthError::KeyFetchFailed(format!("invalid JWKS document: {}", e)))
    }

    /// Usable RSA keys by kid. Entries without a kid, of another key type or
    /// with broken components are skipped.
    pub fn decoding_keys(&self) -> HashMap<String, Arc<DecodingKey>> {
        let mut keys = HashMap::new();

        for jwk in &self.keys {
            let Some(kid) = jwk.kid.as_deref() else {
                debug!("Skipping JWK without kid");
                continue;
            };
            if jwk.kty != "RSA" {
                debug!(kid, kty = %jwk.kty, "Skipping non-RSA JWK");
                continue;
            }
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                warn!(kid, "RSA JWK missing modulus or exponent");
                continue;
            };

            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(kid.to_string(), Arc::new(key));
                }
                Err(e) => warn!(kid, error = %e, "Invalid RSA components in JWK"),
            }
        }

        keys
    }
}

/// Build the key-set URL for an identity provider domain.
///
/// A bare domain gets `https://`. An explicit scheme is kept as is.
pub fn jwks_url_for_domain(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("https://") || domain.starts_with("http://") {
        format!("{}{}", domain, JWKS_PATH)
    } else {
        format!("https://{}{}", domain, JWKS_PATH)
    }
}

#[derive(Debug, Clone)]
pub struct JwksConfig {
    pub jwks_url: String,
    /// Maximum age of a cached key
    pub cache_ttl: Duration,
    /// Minimum gap between two fetches triggered by unknown kids
    pub min_refresh_interval: Duration,
    pub fetch_timeout: Duration,
}

impl JwksConfig {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            jwks_url: jwks_url_for_domain(domain),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            min_refresh_interval: Duration::from_secs(DEFAULT_MIN_REFRESH_SECS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

struct CachedKey {
    key: Arc<DecodingKey>,
    fetched_at: Instant,
}

/// Outcome of the most recent fetch
struct RefreshAttempt {
    finished_at: Instant,
    error: Option<AuthError>,
}

/// Resolver backed by a remote JWKS endpoint
pub struct JwksKeyResolver {
    config: JwksConfig,
    http: reqwest::Client,
    keys: DashMap<String, CachedKey>,
    /// Held while a fetch is in flight. Failed fetches are throttled like
    /// successful ones, so callers queued behind a failure fail fast.
    last_attempt: Mutex<Option<RefreshAttempt>>,
}

impl JwksKeyResolver {
    pub fn new(config: JwksConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: JwksConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            keys: DashMap::new(),
            last_attempt: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &JwksConfig {
        &self.config
    }

    /// Number of cached keys
    pub fn cached_len(&self) -> usize {
        self.keys.len()
    }

    fn cached(&self, kid: &str) -> Result<Arc<DecodingKey>> {
        self.keys
            .get(kid)
            .map(|entry| entry.key.clone())
            .ok_or_else(|| AuthError::KeyNotFound {
                kid: kid.to_string(),
            })
    }

    fn fresh(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        self.keys
            .get(kid)
            .filter(|entry| entry.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|entry| entry.key.clone())
    }

    async fn fetch(&self) -> Result<JwkSet> {
        debug!(url = %self.config.jwks_url, "Fetching JWKS");

        let response = self
            .http
            .get(&self.config.jwks_url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::KeyFetchFailed(format!(
                        "timed out after {:?}",
                        self.config.fetch_timeout
                    ))
                } else {
                    AuthError::KeyFetchFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetchFailed(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::KeyFetchFailed(e.to_string()))?;

        JwkSet::from_json(&body)
    }

    /// Replace the cache with the current key set
    async fn refresh(&self) -> Result<()> {
        let set = self.fetch().await?;
        let fresh = set.decoding_keys();
        let now = Instant::now();

        self.keys.retain(|kid, _| fresh.contains_key(kid));
        for (kid, key) in fresh {
            self.keys.insert(
                kid,
                CachedKey {
                    key,
                    fetched_at: now,
                },
            );
        }

        info!(keys = self.keys.len(), "JWKS cache refreshed");
        Ok(())
    }
}

#[async_trait]
impl KeyResolver for JwksKeyResolver {
    async fn resolve(&self, kid: &str) -> Result<Arc<DecodingKey>> {
        if let Some(key) = self.fresh(kid) {
            return Ok(key);
        }

        let mut last_attempt = self.last_attempt.lock().await;

        // Another task may have refreshed while we waited
        if let Some(key) = self.fresh(kid) {
            return Ok(key);
        }

        if let Some(attempt) = last_attempt.as_ref() {
            if attempt.finished_at.elapsed() < self.config.min_refresh_interval {
                if let Some(err) = &attempt.error {
                    debug!(kid, "JWKS fetch failed recently, not retrying");
                    return Err(err.clone());
                }
                debug!(kid, "JWKS refreshed recently, not refetching");
                return self.cached(kid);
            }
        }

        let result = self.refresh().await;
        if let Err(e) = &result {
            warn!(error = %e, "JWKS refresh failed");
        }
        *last_attempt = Some(RefreshAttempt {
            finished_at: Instant::now(),
            error: result.as_ref().err().cloned(),
        });
        result?;

        self.cached(kid)
    }
}

/// Resolver over a fixed key set
#[derive(Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, Arc<DecodingKey>>,
}

impl StaticKeyResolver {
    pub fn from_jwk_set(set: &JwkSet) -> Self {
        Self {
            keys: set.decoding_keys(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self::from_jwk_set(&JwkSet::from_json(raw)?))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeyResolver for StaticKeyResolver {
    async fn resolve(&self, kid: &str) -> Result<Arc<DecodingKey>> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound {
                kid: kid.to_string(),
            })
    }
}
