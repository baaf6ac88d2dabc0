use crate::error::{AuthError, Result};
use crate::jwks::KeyResolver;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

pub type Claims = Map<String, Value>;

/// Registered-claim checks applied after the signature is verified
#[derive(Debug, Clone)]
pub struct ClaimsPolicy {
    pub validate_exp: bool,
    pub leeway_secs: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl Default for ClaimsPolicy {
    fn default() -> Self {
        Self {
            validate_exp: true,
            leeway_secs: 60,
            issuer: None,
            audience: None,
        }
    }
}

impl ClaimsPolicy {
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = self.validate_exp;

        let mut required = HashSet::new();
        if self.validate_exp {
            required.insert("exp".to_string());
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            required.insert("iss".to_string());
        }
        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }
        validation.required_spec_claims = required;

        validation
    }
}

/// Outcome of a successful verification
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// `sub` claim, empty when the token has none
    pub subject: String,
    pub claims: Claims,
}

/// RS256 bearer token verifier
#[derive(Clone)]
pub struct TokenVerifier {
    resolver: Arc<dyn KeyResolver>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(resolver: Arc<dyn KeyResolver>, policy: ClaimsPolicy) -> Self {
        Self {
            resolver,
            validation: policy.validation(),
        }
    }

    /// Verify `token` and return its payload.
    ///
    /// The header is read untrusted first to find the kid. Anything other than
    /// RS256 is rejected before a key is looked up.
    pub async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidToken(format!("malformed header: {}", e)))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("header has no kid".to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let key = self.resolver.resolve(&kid).await?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => "signature verification failed".to_string(),
                ErrorKind::ExpiredSignature => "token expired".to_string(),
                ErrorKind::InvalidIssuer => "invalid issuer".to_string(),
                ErrorKind::InvalidAudience => "invalid audience".to_string(),
                ErrorKind::MissingRequiredClaim(claim) => format!("missing claim {}", claim),
                _ => e.to_string(),
            };
            AuthError::InvalidToken(reason)
        })?;

        let subject = data
            .claims
            .get("sub")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(VerifiedIdentity {
            subject,
            claims: data.claims,
        })
    }
}
