//! Shared state for a single CLI invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;

use shelfguard_core::{ApiUrl, Authenticator, SessionStore};
use shelfguard_file::FileStorage;
use shelfguard_http::{ApiClient, HttpAuthService};

/// The configured API and the session persisted for it.
pub struct Context {
    api: ApiUrl,
    session_dir: PathBuf,
    store: SessionStore,
}

impl Context {
    /// Resolve configuration and open the persisted session.
    pub fn load(api: &str, session_dir: Option<PathBuf>) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        let session_dir = match session_dir {
            Some(dir) => dir,
            None => default_session_dir()?,
        };

        let store = SessionStore::open(FileStorage::new(&session_dir))
            .context("Failed to open session store")?;
        tracing::debug!(dir = %session_dir.display(), "Session store ready");

        Ok(Self {
            api,
            session_dir,
            store,
        })
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self.api.clone(), self.store.clone()).context("Failed to build HTTP client")
    }

    pub fn auth_service(&self) -> Result<HttpAuthService> {
        Ok(HttpAuthService::new(self.client()?))
    }

    pub fn authenticator(&self) -> Result<Authenticator<HttpAuthService>> {
        Ok(Authenticator::new(self.auth_service()?, self.store.clone()))
    }
}

fn default_session_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "shelfguard").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
