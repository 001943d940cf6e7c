//! Remote-assisted fallback — last resort when every strategy comes up dry.
//!
//! Hands off entirely: the configured extraction service is opened in a new
//! browsing context with the canonical document URL as a query parameter.
//! No in-process candidates are produced. The endpoint is supplied once by
//! the user and persisted for reuse across cycles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::notify::UserNotifier;
use crate::opener::ContextOpener;

/// Query parameter carrying the percent-encoded canonical document URL.
const DOC_URL_PARAM: &str = "docUrl";

/// Persistence for the fallback endpoint within a browsing profile.
pub trait EndpointStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, endpoint: &str) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredEndpoint {
    endpoint: String,
}

/// JSON-file store under the data directory.
pub struct FileEndpointStore {
    path: PathBuf,
}

impl FileEndpointStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("fallback-endpoint.json"),
        }
    }
}

impl EndpointStore for FileEndpointStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let stored: StoredEndpoint =
            serde_json::from_str(&raw).context("Malformed fallback endpoint store")?;
        Ok(Some(stored.endpoint))
    }

    fn save(&self, endpoint: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&StoredEndpoint {
            endpoint: endpoint.to_string(),
        })
        .context("Serialize fallback endpoint")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

pub struct RemoteFallback {
    store: Arc<dyn EndpointStore>,
    opener: Arc<dyn ContextOpener>,
    notifier: Arc<dyn UserNotifier>,
}

impl RemoteFallback {
    pub fn new(
        store: Arc<dyn EndpointStore>,
        opener: Arc<dyn ContextOpener>,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        Self {
            store,
            opener,
            notifier,
        }
    }

    /// Offer the remote extractor for a document nothing else could read.
    /// Returns whether the handoff happened.
    pub async fn offer(&self, canonical_url: &str) -> Result<bool> {
        let accepted = self
            .notifier
            .confirm("No links found. Open the remote link extractor for this document?");
        if !accepted {
            return Ok(false);
        }

        let endpoint = match self.store.load()? {
            Some(endpoint) => endpoint,
            None => {
                let Some(entered) = self.notifier.prompt("Link extractor endpoint URL") else {
                    return Ok(false);
                };
                self.store.save(&entered)?;
                entered
            }
        };

        let target = fallback_url(&endpoint, canonical_url)?;
        info!(endpoint = endpoint.as_str(), "Handing off to remote extractor");
        self.opener.open(&target).await?;
        Ok(true)
    }
}

/// `{endpoint}?docUrl={percent-encoded canonical URL}`.
fn fallback_url(endpoint: &str, canonical_url: &str) -> Result<String> {
    let mut target = url::Url::parse(endpoint).context("Invalid fallback endpoint URL")?;
    target
        .query_pairs_mut()
        .append_pair(DOC_URL_PARAM, canonical_url);
    Ok(target.into())
}
