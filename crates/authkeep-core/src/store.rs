//! The session store: login state, its transitions and its persistence.
//!
//! A [`SessionStore`] is the single owner of the current [`SessionState`].
//! Actions ([`login`], [`logout`], [`register`]) talk to the API through a
//! [`Gateway`], then commit exactly one mutation. Login success and logout are
//! the only transitions that touch persisted storage.
//!
//! ```text
//!              login ok
//!  LoggedOut ───────────▶ LoggedIn
//!      ▲                     │
//!      └─────────────────────┘
//!   login failure, logout, register
//! ```
//!
//! [`login`]: SessionStore::login
//! [`logout`]: SessionStore::logout
//! [`register`]: SessionStore::register

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, trace, warn};

use crate::Result;
use crate::config::StoreConfig;
use crate::credentials::{Credentials, FormFields, RegistrationForm};
use crate::error::{AuthError, StorageError, TransportError};
use crate::traits::{Gateway, GatewayResponse, SessionStorage};
use crate::types::{SessionRecord, SessionState};

/// The status the token endpoint must answer with for a login to count.
const LOGIN_OK: u16 = 200;

/// A defined state transition.
#[derive(Debug)]
enum Mutation {
    LoginSuccess(SessionRecord),
    LoginFailure,
    Logout,
    RegisterSuccess,
    RegisterFailure,
}

impl Mutation {
    fn apply(self, state: &mut SessionState) {
        *state = match self {
            Mutation::LoginSuccess(record) => SessionState::LoggedIn(record),
            // Registration never logs the user in, whatever the outcome.
            Mutation::LoginFailure
            | Mutation::Logout
            | Mutation::RegisterSuccess
            | Mutation::RegisterFailure => SessionState::LoggedOut,
        };
    }
}

/// Authentication state for one client, backed by an API gateway and
/// persisted storage.
///
/// Stores are cheap to clone; clones share the same state.
///
/// # Example
///
/// ```no_run
/// use authkeep_core::{Credentials, MemoryStorage, SessionStore, StoreConfig};
/// # use authkeep_core::traits::Gateway;
///
/// # async fn example(gateway: impl Gateway + 'static) -> Result<(), authkeep_core::Error> {
/// let store = SessionStore::open(gateway, MemoryStorage::new(), StoreConfig::default());
///
/// let user = store.login(Credentials::new("alice", "hunter2")).await?;
/// assert!(store.is_logged_in());
/// println!("token type: {:?}", user.token_type());
///
/// store.logout().await;
/// assert!(!store.is_logged_in());
/// # Ok(())
/// # }
/// ```
pub struct SessionStore<G, S> {
    inner: Arc<StoreInner<G, S>>,
}

struct StoreInner<G, S> {
    gateway: G,
    storage: S,
    config: StoreConfig,
    state: watch::Sender<SessionState>,
    // Held for the whole of a login, and by logout while it clears the session.
    login_in_flight: Mutex<()>,
}

impl<G, S> Clone for SessionStore<G, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G, S> SessionStore<G, S>
where
    G: Gateway,
    S: SessionStorage,
{
    /// Create a store, restoring the session persisted under
    /// `config.storage_key`.
    ///
    /// A missing, unreadable or malformed record yields a logged-out store.
    pub fn open(gateway: G, storage: S, config: StoreConfig) -> Self {
        let initial = restore(&storage, &config.storage_key);
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(StoreInner {
                gateway,
                storage,
                config,
                state,
                login_in_flight: Mutex::new(()),
            }),
        }
    }

    /// Exchange credentials for an access token.
    ///
    /// On success the token endpoint's body is persisted, the store becomes
    /// logged in, and the body is returned.
    ///
    /// # Errors
    ///
    /// - [`AuthError::LoginRejected`] if the endpoint answers anything but 200
    /// - [`AuthError::MissingAccessToken`] if a 200 body has no usable token
    /// - [`AuthError::LoginInProgress`] if another login has not finished
    /// - transport, protocol and storage errors as they occur
    ///
    /// Every error except `LoginInProgress` leaves the store logged out.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: Credentials) -> Result<SessionRecord> {
        let Ok(_in_flight) = self.inner.login_in_flight.try_lock() else {
            warn!("Login rejected, another login is in progress");
            return Err(AuthError::LoginInProgress.into());
        };

        info!("Logging in");

        match self.request_token(&credentials).await {
            Ok(record) => {
                self.commit(Mutation::LoginSuccess(record.clone()));
                debug!("Login succeeded");
                Ok(record)
            }
            Err(e) => {
                self.commit(Mutation::LoginFailure);
                debug!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Forget the current session.
    ///
    /// The persisted record is removed and the store becomes logged out.
    /// Storage faults are logged and otherwise ignored, so this cannot fail.
    ///
    /// A logout issued while a login is in flight waits for that login to
    /// settle, so it always has the last word.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _in_flight = self.inner.login_in_flight.lock().await;
        info!("Logging out");

        if let Err(e) = self.inner.storage.remove(&self.inner.config.storage_key) {
            warn!(error = %e, "Failed to remove persisted session");
        }

        self.commit(Mutation::Logout);
    }

    /// Register a new user.
    ///
    /// Registration does not log the user in: on success and on failure the
    /// store ends up logged out and persisted storage is left alone. The
    /// decoded response payload is returned (`Value::Null` for an empty body).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RegistrationRejected`] for a non-2xx answer, or
    /// the transport/protocol error that occurred.
    #[instrument(skip(self, form), fields(username = %form.username()))]
    pub async fn register(&self, form: RegistrationForm) -> Result<Value> {
        info!("Registering user");

        match self.request_registration(&form).await {
            Ok(payload) => {
                self.commit(Mutation::RegisterSuccess);
                debug!("Registration succeeded");
                Ok(payload)
            }
            Err(e) => {
                self.commit(Mutation::RegisterFailure);
                debug!(error = %e, "Registration failed");
                Err(e)
            }
        }
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<SessionRecord> {
        let config = &self.inner.config;
        let response = self
            .post(&config.token_endpoint, &credentials.to_form())
            .await?;

        let status = response.status();
        if status != LOGIN_OK {
            return Err(AuthError::LoginRejected { status }.into());
        }

        let body: Value = response.json()?;
        let record = SessionRecord::from_token_response(status, body)?;

        let json = record.to_json().map_err(|e| StorageError::Encode {
            message: e.to_string(),
        })?;
        self.inner.storage.set(&config.storage_key, &json)?;

        Ok(record)
    }

    async fn request_registration(&self, form: &RegistrationForm) -> Result<Value> {
        let response = self
            .post(&self.inner.config.register_endpoint, &form.to_form())
            .await?;

        if !response.is_success() {
            return Err(AuthError::RegistrationRejected {
                status: response.status(),
                detail: rejection_detail(&response),
            }
            .into());
        }

        if response.body().trim().is_empty() {
            return Ok(Value::Null);
        }

        response.json()
    }

    /// POST through the gateway, bounded by the configured timeout.
    async fn post(&self, endpoint: &str, form: &FormFields) -> Result<GatewayResponse> {
        let timeout = self.inner.config.request_timeout;
        trace!(endpoint, ?form, "Calling gateway");

        match tokio::time::timeout(timeout, self.inner.gateway.post(endpoint, form)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
        }
    }
}

impl<G, S> SessionStore<G, S> {
    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().is_logged_in()
    }

    /// Returns the current user record, if logged in.
    pub fn user(&self) -> Option<SessionRecord> {
        self.inner.state.borrow().user().cloned()
    }

    /// Watch the state. The receiver sees every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    fn commit(&self, mutation: Mutation) {
        trace!(?mutation, "Committing mutation");
        self.inner.state.send_modify(|state| mutation.apply(state));
    }
}

impl<G, S> fmt::Debug for SessionStore<G, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

/// Read the persisted session, treating anything unusable as absent.
fn restore<S: SessionStorage>(storage: &S, key: &str) -> SessionState {
    let json = match storage.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            debug!(key, "No persisted session");
            return SessionState::LoggedOut;
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted session, starting logged out");
            return SessionState::LoggedOut;
        }
    };

    match SessionRecord::from_json(&json) {
        Ok(record) => {
            debug!(key, "Restored persisted session");
            SessionState::LoggedIn(record)
        }
        Err(reason) => {
            let error = StorageError::MalformedStoredSession {
                key: key.to_string(),
                reason,
            };
            warn!(%error, "Ignoring persisted session, starting logged out");
            SessionState::LoggedOut
        }
    }
}

/// Pull a human-readable reason out of an error body such as
/// `{"detail": "Username already registered"}`.
fn rejection_detail(response: &GatewayResponse) -> Option<String> {
    let body: Value = response.json().ok()?;
    match body.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}
