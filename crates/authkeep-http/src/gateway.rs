//! reqwest-backed gateway implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::{debug, instrument, trace};

use authkeep_core::error::{Error, TransportError};
use authkeep_core::traits::{Gateway, GatewayResponse};
use authkeep_core::{ApiUrl, FormFields, Result};

const USER_AGENT: &str = concat!("authkeep/", env!("CARGO_PKG_VERSION"));

fn map_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: timeout
                .and_then(|t| u64::try_from(t.as_millis()).ok())
                .unwrap_or(0),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    transport.into()
}

/// HTTP client for the authentication API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api: ApiUrl,
    timeout: Option<Duration>,
}

impl HttpGateway {
    /// Create a gateway for the given API base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be initialized
    /// (for example when no TLS backend is available).
    pub fn new(api: ApiUrl) -> Result<Self> {
        Self::builder(api).build()
    }

    /// Start configuring a gateway.
    pub fn builder(api: ApiUrl) -> HttpGatewayBuilder {
        HttpGatewayBuilder {
            api,
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Returns the API base URL this gateway is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }
}

/// Builder for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayBuilder {
    api: ApiUrl,
    user_agent: String,
    timeout: Option<Duration>,
}

impl HttpGatewayBuilder {
    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Abort requests that take longer than `timeout` at the transport level.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpGateway> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| map_reqwest(e, self.timeout))?;

        Ok(HttpGateway {
            client,
            api: self.api,
            timeout: self.timeout,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self, form), fields(api = %self.api))]
    async fn post(&self, endpoint: &str, form: &FormFields) -> Result<GatewayResponse> {
        let url = self.api.endpoint_url(endpoint);
        debug!(endpoint, %url, "POST form");
        trace!(?form, "form fields");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(form.as_pairs())
            .send()
            .await
            .map_err(|e| map_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest(e, self.timeout))?;

        trace!(status, "API response");
        Ok(GatewayResponse::new(status, body))
    }
}
