use crate::verifier::Claims;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Coarse role taken from `public_metadata.role`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const USER: &'static str = "user";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn user() -> Self {
        Self(Self::USER.to_string())
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the role from a verified payload. Never fails: anything other than a
/// non-empty string at `public_metadata.role` yields `user`.
pub fn extract_role(claims: &Claims) -> Role {
    let metadata = match claims.get("public_metadata") {
        None | Some(Value::Null) => return Role::user(),
        Some(Value::Object(metadata)) => metadata,
        Some(other) => {
            debug!(value = %other, "public_metadata is not an object");
            return Role::user();
        }
    };

    match metadata.get("role") {
        Some(Value::String(role)) if !role.is_empty() => Role::new(role.as_str()),
        None | Some(Value::Null) => Role::user(),
        Some(other) => {
            debug!(value = %other, "public_metadata.role is not a usable string");
            Role::user()
        }
    }
}
