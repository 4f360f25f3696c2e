//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the authentication API.
///
/// Endpoints such as `token` and `register` are resolved relative to it, so a
/// deployment only ever changes this one value.
///
/// Both `https` and plain `http` are accepted, so LAN and container
/// deployments (`http://backend:8080/`) work without extra configuration.
///
/// # Example
///
/// ```
/// use authkeep_core::ApiUrl;
///
/// let api = ApiUrl::new("http://localhost:8080/").unwrap();
/// assert_eq!(api.endpoint_url("token"), "http://localhost:8080/token");
///
/// let lan = ApiUrl::new("http://192.168.37.8:8080").unwrap();
/// assert_eq!(lan.endpoint_url("register"), "http://192.168.37.8:8080/register");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the full URL of an endpoint below this base.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, endpoint.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the URL scheme ("https" or "http").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        match url.scheme() {
            "https" | "http" => Ok(()),
            _ => Err(invalid("scheme must be http or https")),
        }
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://auth.example.com").unwrap();
        assert_eq!(api.host(), Some("auth.example.com"));
        assert_eq!(api.scheme(), "https");
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://localhost:8080/").unwrap();
        assert_eq!(api.host(), Some("localhost"));
        assert_eq!(api.endpoint_url("token"), "http://localhost:8080/token");
    }

    #[test]
    fn valid_private_network_http() {
        let api = ApiUrl::new("http://192.168.37.8:8080/").unwrap();
        assert_eq!(api.endpoint_url("token"), "http://192.168.37.8:8080/token");
        assert!(ApiUrl::new("http://10.0.0.2").is_ok());
        assert!(ApiUrl::new("http://127.0.0.1:9000").is_ok());
        assert!(ApiUrl::new("http://[::1]:9000").is_ok());
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let api = ApiUrl::new("https://example.com/api/v1/").unwrap();
        assert_eq!(
            api.endpoint_url("/register"),
            "https://example.com/api/v1/register"
        );

        let no_slash = ApiUrl::new("https://example.com/api").unwrap();
        assert_eq!(no_slash.endpoint_url("token"), "https://example.com/api/token");
    }

    #[test]
    fn valid_http_service_hostname() {
        let api = ApiUrl::new("http://backend:8080/").unwrap();
        assert_eq!(api.host(), Some("backend"));
        assert_eq!(api.endpoint_url("token"), "http://backend:8080/token");
        assert!(ApiUrl::new("http://auth.example.com").is_ok());
    }

    #[test]
    fn invalid_scheme() {
        assert!(ApiUrl::new("ftp://localhost/").is_err());
        assert!(ApiUrl::new("file:///tmp/api").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/token").is_err());
    }

    #[test]
    fn invalid_query() {
        assert!(ApiUrl::new("https://example.com/?debug=1").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let api: ApiUrl = serde_json::from_str("\"https://example.com\"").unwrap();
        assert_eq!(api.host(), Some("example.com"));
        assert!(serde_json::from_str::<ApiUrl>("\"ftp://example.com\"").is_err());
    }
}
