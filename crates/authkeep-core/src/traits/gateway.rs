//! API gateway trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::credentials::FormFields;
use crate::error::ProtocolError;

/// A raw response from the authentication API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    status: u16,
    body: String,
}

impl GatewayResponse {
    /// Create a response from a status code and body text.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the raw body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] carrying the status if the body is not
    /// valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| ProtocolError::new(self.status, Some(e.to_string())).into())
    }
}

/// The HTTP collaborator the session store talks to.
///
/// Implementations send `form` as an `application/x-www-form-urlencoded`
/// POST to `endpoint`, resolved against their configured base URL, and
/// return whatever status the server produced. Only transport failures are
/// errors here; interpreting the status is the caller's job.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// POST form fields to an endpoint.
    async fn post(&self, endpoint: &str, form: &FormFields) -> Result<GatewayResponse>;
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for std::sync::Arc<T> {
    async fn post(&self, endpoint: &str, form: &FormFields) -> Result<GatewayResponse> {
        (**self).post(endpoint, form).await
    }
}
