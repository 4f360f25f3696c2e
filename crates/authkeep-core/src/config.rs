//! Session store configuration.

use std::time::Duration;

/// Storage key the session record is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "user";

/// Endpoint that exchanges credentials for an access token.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "token";

/// Endpoint that creates a new user.
pub const DEFAULT_REGISTER_ENDPOINT: &str = "register";

/// Upper bound for a single API call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`SessionStore`](crate::SessionStore).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use authkeep_core::StoreConfig;
///
/// let config = StoreConfig::default().with_request_timeout(Duration::from_secs(5));
/// assert_eq!(config.storage_key, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the persisted session record.
    pub storage_key: String,
    /// Endpoint name for login.
    pub token_endpoint: String,
    /// Endpoint name for registration.
    pub register_endpoint: String,
    /// Timeout applied to every API call made by the store.
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            register_endpoint: DEFAULT_REGISTER_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    pub fn with_register_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.register_endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
