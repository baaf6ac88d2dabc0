//! Fixture keys and token helpers for tests.
//!
//! Compiled for this crate's own tests and for dependents that enable the
//! `test-support` feature.

use crate::jwks::StaticKeyResolver;
use crate::verifier::{ClaimsPolicy, TokenVerifier};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;

/// kid of the key published in [`TRUSTED_JWKS`]
pub const TRUSTED_KID: &str = "test-key-1";
pub const TRUSTED_JWKS: &str = include_str!("../tests/fixtures/jwks.json");
pub const TRUSTED_PRIVATE_PEM: &str = include_str!("../tests/fixtures/trusted_private.pem");
/// Key that is not part of [`TRUSTED_JWKS`]
pub const ROGUE_PRIVATE_PEM: &str = include_str!("../tests/fixtures/rogue_private.pem");

pub fn trusted_resolver() -> StaticKeyResolver {
    StaticKeyResolver::from_json(TRUSTED_JWKS).expect("fixture JWKS is valid")
}

pub fn trusted_verifier() -> TokenVerifier {
    TokenVerifier::new(Arc::new(trusted_resolver()), ClaimsPolicy::default())
}

/// Sign `claims` with RS256 using `private_pem` and put `kid` in the header
pub fn sign(claims: &Value, kid: &str, private_pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("fixture PEM is valid");
    encode(&header, claims, &key).expect("token encodes")
}

/// Claims for `sub` with an optional `public_metadata.role`, valid for an hour
pub fn claims(sub: &str, role: Option<&str>) -> Value {
    let exp = chrono::Utc::now().timestamp() + 3600;
    match role {
        Some(role) => json!({ "sub": sub, "exp": exp, "public_metadata": { "role": role } }),
        None => json!({ "sub": sub, "exp": exp }),
    }
}

pub fn user_token() -> String {
    sign(&claims("user_123", Some("user")), TRUSTED_KID, TRUSTED_PRIVATE_PEM)
}

pub fn roleless_token() -> String {
    sign(&claims("user_456", None), TRUSTED_KID, TRUSTED_PRIVATE_PEM)
}

pub fn admin_token() -> String {
    sign(&claims("admin_1", Some("admin")), TRUSTED_KID, TRUSTED_PRIVATE_PEM)
}

/// Token claiming the trusted kid but signed by a foreign key
pub fn forged_token() -> String {
    sign(&claims("mallory", Some("admin")), TRUSTED_KID, ROGUE_PRIVATE_PEM)
}
