//! Reqwest-backed user directory adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{UserDirectory, UserDirectoryError, UserProfile};

use super::dto::{EnvelopeDto, UserProfileDto};

/// User directory adapter speaking the directory service's REST surface.
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self) -> Result<Url, UserDirectoryError> {
        self.base_url
            .join("/user/findByEmail")
            .map_err(|error| UserDirectoryError::protocol(error.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() || error.is_connect() {
        UserDirectoryError::unreachable(error.to_string())
    } else {
        UserDirectoryError::protocol(error.to_string())
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        let response = self
            .client
            .get(self.endpoint()?)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() {
            return Err(UserDirectoryError::unreachable(format!(
                "directory answered {status}"
            )));
        }
        if !status.is_success() {
            return Err(UserDirectoryError::protocol(format!(
                "directory answered {status}"
            )));
        }

        let envelope: EnvelopeDto<UserProfileDto> = response
            .json()
            .await
            .map_err(|error| UserDirectoryError::protocol(error.to_string()))?;

        // An empty envelope means the directory has no entry for the email.
        Ok(envelope.into_result().ok().map(UserProfile::from))
    }
}
