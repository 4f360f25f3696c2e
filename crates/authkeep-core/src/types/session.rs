//! Session record and session state types.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, Error, ProtocolError};
use crate::tokens::AccessToken;

/// JSON field carrying the access token in a token endpoint response.
const ACCESS_TOKEN_FIELD: &str = "access_token";
const TOKEN_TYPE_FIELD: &str = "token_type";
const USERNAME_FIELD: &str = "username";

/// The payload of a successful login.
///
/// This is the typed form of the token endpoint's response body, e.g.
/// `{"access_token": "...", "token_type": "bearer", "username": "alice"}`.
/// Only the access token is typed. Every other claim, including
/// `token_type` and `username`, is kept verbatim in [`claims`], so the record
/// serializes back to the same JSON object it was decoded from.
///
/// [`claims`]: SessionRecord::claims
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    access_token: AccessToken,
    #[serde(flatten)]
    claims: Map<String, Value>,
}

impl SessionRecord {
    /// Create a record holding only an access token.
    pub fn new(access_token: AccessToken) -> Self {
        Self {
            access_token,
            claims: Map::new(),
        }
    }

    pub fn with_token_type(self, token_type: impl Into<String>) -> Self {
        self.with_claim(TOKEN_TYPE_FIELD, Value::String(token_type.into()))
    }

    pub fn with_username(self, username: impl Into<String>) -> Self {
        self.with_claim(USERNAME_FIELD, Value::String(username.into()))
    }

    /// Attach an extra server-provided claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    /// Validate a decoded token endpoint body.
    ///
    /// The body must be a JSON object with a non-empty string `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingAccessToken`] if the token is absent, empty
    /// or not a string, and a [`ProtocolError`] if the body is not an object.
    pub fn from_token_response(status: u16, body: Value) -> Result<Self, Error> {
        let Value::Object(object) = body else {
            return Err(ProtocolError::new(
                status,
                Some("token response is not a JSON object".to_string()),
            )
            .into());
        };

        match object.get(ACCESS_TOKEN_FIELD) {
            Some(Value::String(token)) if !token.is_empty() => {}
            _ => return Err(AuthError::MissingAccessToken.into()),
        }

        serde_json::from_value(Value::Object(object))
            .map_err(|e| ProtocolError::new(status, Some(e.to_string())).into())
    }

    /// Decode a record previously written with [`SessionRecord::to_json`].
    ///
    /// Returns the serde error message on failure; the caller decides how
    /// malformed data is reported.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let record: SessionRecord = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if record.access_token.is_empty() {
            return Err("stored access token is empty".to_string());
        }
        Ok(record)
    }

    /// Serialize the record for persisted storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// The token type reported by the server, usually `bearer`.
    ///
    /// `None` when the claim is absent or not a string.
    pub fn token_type(&self) -> Option<&str> {
        self.claims.get(TOKEN_TYPE_FIELD).and_then(Value::as_str)
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.get(USERNAME_FIELD).and_then(Value::as_str)
    }

    /// Every server-provided claim except the access token.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// The current authentication state.
///
/// A logged-in state always carries its user record, and a logged-out state
/// never does. Serializes as `{"loggedIn": bool, "user": record | null}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// No token is held.
    #[default]
    LoggedOut,
    /// A token obtained from the token endpoint is held.
    LoggedIn(SessionRecord),
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    /// Returns the current user record, if logged in.
    pub fn user(&self) -> Option<&SessionRecord> {
        match self {
            SessionState::LoggedIn(record) => Some(record),
            SessionState::LoggedOut => None,
        }
    }
}

impl Serialize for SessionState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SessionState", 2)?;
        state.serialize_field("loggedIn", &self.is_logged_in())?;
        state.serialize_field("user", &self.user())?;
        state.end()
    }
}
