//! Session store wiring for CLI use.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use directories::ProjectDirs;

use authkeep_core::error::TransportError;
use authkeep_core::{ApiUrl, FormFields, Gateway, GatewayResponse, SessionStore, StoreConfig};
use authkeep_file::FileStorage;
use authkeep_http::HttpGateway;

use crate::cli::ConfigArgs;

/// Store for commands that talk to the API.
pub type CliStore = SessionStore<HttpGateway, FileStorage>;

/// Store for commands that only touch the persisted session.
pub type LocalStore = SessionStore<Offline, FileStorage>;

/// Gateway that refuses every request.
///
/// `logout` and `status` never reach the API, so they run without a
/// configured base URL.
#[derive(Debug, Clone, Copy)]
pub struct Offline;

#[async_trait]
impl Gateway for Offline {
    async fn post(
        &self,
        endpoint: &str,
        _form: &FormFields,
    ) -> authkeep_core::Result<GatewayResponse> {
        Err(TransportError::Connection {
            message: format!("'{endpoint}' requested from an offline command"),
        }
        .into())
    }
}

/// Get the directory holding the persisted session.
fn session_dir(config: &ConfigArgs) -> Result<PathBuf> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "authkeep").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join("session"))
}

fn store_config(config: &ConfigArgs) -> StoreConfig {
    StoreConfig::default().with_request_timeout(Duration::from_secs(config.timeout))
}

fn storage(config: &ConfigArgs) -> Result<FileStorage> {
    let storage = FileStorage::new(session_dir(config)?);
    tracing::debug!(dir = %storage.dir().display(), "Opening session store");
    Ok(storage)
}

/// Open the session store described by the global options.
pub fn open_store(config: &ConfigArgs) -> Result<CliStore> {
    let api = ApiUrl::new(&config.api_url).context("Invalid API URL")?;
    let gateway = HttpGateway::new(api).context("Failed to create HTTP client")?;

    Ok(SessionStore::open(gateway, storage(config)?, store_config(config)))
}

/// Open the persisted session without validating `--api-url`.
pub fn open_local_store(config: &ConfigArgs) -> Result<LocalStore> {
    Ok(SessionStore::open(Offline, storage(config)?, store_config(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use authkeep_core::error::Error;

    #[tokio::test]
    async fn offline_gateway_refuses_requests() {
        let err = Offline
            .post("token", &FormFields::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Connection { .. })
        ));
    }

    #[test]
    fn local_store_ignores_api_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ConfigArgs {
            api_url: "not a url".to_string(),
            timeout: 30,
            data_dir: Some(dir.path().to_path_buf()),
        };

        assert!(open_store(&config).is_err());
        let store = open_local_store(&config).unwrap();
        assert!(!store.is_logged_in());
    }
}
