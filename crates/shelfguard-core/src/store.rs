//! Process-wide holder of the current credential.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::credential::{Credential, RefreshToken};
use crate::error::{Error, StorageError};
use crate::memory::MemoryStorage;
use crate::session::SessionState;
use crate::traits::SessionStorage;
use crate::Result;

/// Storage key the credential is persisted under.
pub const SESSION_KEY: &str = "session";

/// Persisted form of a [`Credential`].
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl From<&Credential> for StoredCredential {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token().as_str().to_string(),
            refresh_token: credential.refresh_token().map(|t| t.as_str().to_string()),
            expires_at: credential.expires_at(),
        }
    }
}

impl TryFrom<StoredCredential> for Credential {
    type Error = Error;

    fn try_from(stored: StoredCredential) -> Result<Self> {
        Ok(Credential::new(stored.access_token)?
            .with_refresh_token(stored.refresh_token.and_then(RefreshToken::new))
            .with_expiry(stored.expires_at))
    }
}

/// Holder of the current credential, backed by persistent storage.
///
/// The store is the only writer of the credential. Other components read
/// through [`SessionStore::get`] or [`SessionStore::snapshot`] once per
/// operation.
///
/// # Thread Safety
///
/// Stores are cheap to clone (they use internal `Arc`). The write lock is
/// held across persisting and publishing, so a reader never observes a
/// credential that is not yet durable, and a reader never sees half of a
/// concurrent `clear`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    storage: Box<dyn SessionStorage>,
    credential: RwLock<Option<Credential>>,
}

impl SessionStore {
    /// Open a store over `storage`, loading any persisted credential.
    ///
    /// A persisted value that cannot be decoded is discarded and the store
    /// starts unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub fn open(storage: impl SessionStorage + 'static) -> Result<Self> {
        let credential = load(&storage)?;
        debug!(present = credential.is_some(), "Session store opened");

        Ok(Self {
            inner: Arc::new(StoreInner {
                storage: Box::new(storage),
                credential: RwLock::new(credential),
            }),
        })
    }

    /// An empty store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                storage: Box::new(MemoryStorage::new()),
                credential: RwLock::new(None),
            }),
        }
    }

    /// Returns the current credential, if any.
    pub fn get(&self) -> Option<Credential> {
        self.inner
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current session state in a single read.
    pub fn snapshot(&self) -> SessionState {
        SessionState::new(self.get())
    }

    /// Store a credential, persisting it before returning.
    ///
    /// A [`Credential`] cannot hold a blank access token, so only storage
    /// can fail here.
    ///
    /// # Errors
    ///
    /// Fails with a storage error if the credential cannot be persisted; the
    /// previous credential is kept.
    pub fn set(&self, credential: Credential) -> Result<()> {
        let encoded = serde_json::to_string(&StoredCredential::from(&credential)).map_err(|e| {
            StorageError::Encode {
                key: SESSION_KEY.to_string(),
                message: e.to_string(),
            }
        })?;

        let mut current = self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.storage.write(SESSION_KEY, &encoded)?;
        *current = Some(credential);

        info!("Session credential stored");
        Ok(())
    }

    /// Remove any stored credential. Clearing an empty store is a no-op.
    ///
    /// The in-memory credential is dropped even if removing the persisted
    /// copy fails, so the process fails closed.
    pub fn clear(&self) -> Result<()> {
        let mut current = self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let had_credential = current.take().is_some();
        self.inner.storage.remove(SESSION_KEY)?;

        if had_credential {
            info!("Session credential cleared");
        }
        Ok(())
    }

    /// Remove the credential only if it is still `expected`.
    ///
    /// Compare and remove happen under the write lock, so a credential
    /// stored after `expected` was read is never discarded. Returns whether
    /// anything was removed.
    pub fn clear_if(&self, expected: &Credential) -> Result<bool> {
        let mut current = self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if current.as_ref() != Some(expected) {
            debug!("Stored credential changed, keeping it");
            return Ok(false);
        }

        current.take();
        self.inner.storage.remove(SESSION_KEY)?;
        info!("Session credential cleared");
        Ok(true)
    }

    /// Re-read the persisted credential, picking up writes made by another
    /// store over the same storage.
    pub fn reload(&self) -> Result<()> {
        let mut current = self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = load(self.inner.storage.as_ref())?;
        debug!(present = current.is_some(), "Session store reloaded");
        Ok(())
    }

    /// True if a credential is present and not expired.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// True if a credential is present and not expired at `now`.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.snapshot().is_authenticated_at(now)
    }
}

/// Load and decode the persisted credential, healing corrupted state.
fn load(storage: &dyn SessionStorage) -> Result<Option<Credential>> {
    let Some(raw) = storage.read(SESSION_KEY)? else {
        return Ok(None);
    };

    match decode(&raw) {
        Ok(credential) => Ok(Some(credential)),
        Err(err) => {
            warn!(error = %err, "Discarding unreadable session");
            if let Err(e) = storage.remove(SESSION_KEY) {
                warn!(error = %e, "Failed to remove unreadable session");
            }
            Ok(None)
        }
    }
}

fn decode(raw: &str) -> Result<Credential> {
    let stored: StoredCredential =
        serde_json::from_str(raw).map_err(|e| StorageError::Corrupted {
            key: SESSION_KEY.to_string(),
            message: e.to_string(),
        })?;

    Credential::try_from(stored).map_err(|e| {
        StorageError::Corrupted {
            key: SESSION_KEY.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("credential", &"[REDACTED]")
            .finish()
    }
}
