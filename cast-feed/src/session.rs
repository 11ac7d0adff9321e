use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The signed-in user as remembered between launches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub fid: u64,
    pub signer_uuid: Uuid,
    pub is_authenticated: bool,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCache {
    #[serde(default)]
    pub user: Option<UserSession>,
    #[serde(default)]
    pub dark_mode: bool,
}

/// JSON file holding the [`SessionCache`].
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache. A missing or unreadable file yields an empty cache.
    pub async fn load(&self) -> Result<SessionCache> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session cache at {:?}", self.path);
                return Ok(SessionCache::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(cache) => Ok(cache),
            Err(e) => {
                warn!("Ignoring corrupt session cache {:?}: {}", self.path, e);
                Ok(SessionCache::default())
            }
        }
    }

    /// Write the cache, replacing the file atomically.
    pub async fn save(&self, cache: &SessionCache) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(cache)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved session cache to {:?}", self.path);
        Ok(())
    }

    pub async fn store_user(&self, user: UserSession) -> Result<()> {
        let mut cache = self.load().await?;
        info!("Caching session for fid {}", user.fid);
        cache.user = Some(user);
        self.save(&cache).await
    }

    pub async fn retrieve_user(&self) -> Result<Option<UserSession>> {
        Ok(self.load().await?.user)
    }

    pub async fn remove_user(&self) -> Result<()> {
        let mut cache = self.load().await?;
        if cache.user.take().is_some() {
            info!("Cleared cached session");
        }
        self.save(&cache).await
    }

    /// Flip the dark-mode preference and return the new value.
    pub async fn toggle_dark_mode(&self) -> Result<bool> {
        let mut cache = self.load().await?;
        cache.dark_mode = !cache.dark_mode;
        self.save(&cache).await?;
        Ok(cache.dark_mode)
    }
}
