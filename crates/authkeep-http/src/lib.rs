//! authkeep-http - HTTP gateway for the authkeep session store.
//!
//! [`HttpGateway`] sends form-encoded POST requests to an authentication API
//! whose base URL is supplied as configuration.
//!
//! # Example
//!
//! ```no_run
//! use authkeep_core::{ApiUrl, Credentials, MemoryStorage, SessionStore, StoreConfig};
//! use authkeep_http::HttpGateway;
//!
//! # async fn example() -> authkeep_core::Result<()> {
//! let api = ApiUrl::new("http://localhost:8080/")?;
//! let store = SessionStore::open(HttpGateway::new(api)?, MemoryStorage::new(), StoreConfig::default());
//! store.login(Credentials::new("alice", "hunter2")).await?;
//! # Ok(())
//! # }
//! ```

mod gateway;

pub use gateway::{HttpGateway, HttpGatewayBuilder};
