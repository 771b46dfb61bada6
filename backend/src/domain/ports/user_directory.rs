//! Port for the user directory collaborator: profile and shipping address
//! lookups by email.

use async_trait::async_trait;
use uuid::Uuid;

/// Directory projection of a user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Directory user id.
    pub id: Uuid,
    /// Account email.
    pub email: String,
    /// Registered shipping address.
    pub address: String,
}

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// The directory service could not be reached (including timeouts).
    #[error("user directory unreachable: {message}")]
    Unreachable {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The directory service answered but the exchange failed.
    #[error("user directory protocol error: {message}")]
    Protocol {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl UserDirectoryError {
    /// Create an unreachable error with the given message.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a protocol error with the given message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Port for resolving user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a profile by email; `None` when the directory has no entry.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserProfile>, UserDirectoryError>;
}

/// Fixture implementation for wiring that does not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(None)
    }
}
