//! authkeep-core - session store, types and traits.
//!
//! The [`SessionStore`] holds the login state of one client. It talks to the
//! authentication API through a [`Gateway`] and keeps the session across
//! restarts in a [`SessionStorage`].
//!
//! # Example
//!
//! ```no_run
//! use authkeep_core::{Credentials, MemoryStorage, SessionStore, StoreConfig};
//! # use authkeep_core::traits::Gateway;
//!
//! # async fn example(gateway: impl Gateway + 'static) -> authkeep_core::Result<()> {
//! let store = SessionStore::open(gateway, MemoryStorage::new(), StoreConfig::default());
//! store.login(Credentials::new("alice", "hunter2")).await?;
//!
//! let mut changes = store.subscribe();
//! store.logout().await;
//! assert!(!changes.borrow_and_update().is_logged_in());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::StoreConfig;
pub use credentials::{Credentials, FormFields, RegistrationForm};
pub use error::Error;
pub use memory::MemoryStorage;
pub use store::SessionStore;
pub use tokens::AccessToken;
pub use traits::{Gateway, GatewayResponse, SessionStorage};
pub use types::{ApiUrl, SessionRecord, SessionState};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
