//! Requester identity relayed by the API gateway.
//!
//! The gateway terminates authentication and forwards the caller's email and
//! role; this service only performs ownership and role checks against that
//! relayed identity.

use std::str::FromStr;

/// Role granted to the requester by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequesterRole {
    /// Regular shopper; may only touch their own orders.
    User,
    /// Administrative operator; may touch any order.
    Admin,
}

/// Error raised when a relayed role header is not a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown requester role: {value}")]
pub struct ParseRequesterRoleError {
    /// The rejected raw value.
    pub value: String,
}

impl FromStr for RequesterRole {
    type Err = ParseRequesterRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ParseRequesterRoleError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Authenticated caller identity for workflow operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    /// Email the gateway authenticated.
    pub email: String,
    /// Granted role.
    pub role: RequesterRole,
}

impl Requester {
    /// Build a regular user identity.
    pub fn user(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: RequesterRole::User,
        }
    }

    /// Build an administrative identity.
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: RequesterRole::Admin,
        }
    }

    /// Whether the requester holds administrative privilege.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == RequesterRole::Admin
    }

    /// Whether the requester owns the given order email.
    #[must_use]
    pub fn owns(&self, owner_email: &str) -> bool {
        self.email == owner_email
    }
}
