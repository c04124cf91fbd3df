use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed asset id: the first 8 bytes of the SHA-256 of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Model,
    Texture,
    Sound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssetState {
    Pending,
    Ready { id: AssetId, bytes: u64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub kind: AssetKind,
    pub state: AssetState,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("asset was never requested: {0}")]
    NotRequested(String),
}

/// Readiness table for every asset the scene asked for, keyed by path.
///
/// Loading happens elsewhere; the loader reports back through
/// [`AssetStore::complete`] or [`AssetStore::fail`]. The table can be saved
/// as a JSON manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStore {
    entries: BTreeMap<String, AssetEntry>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as wanted. Requesting a known path changes nothing.
    pub fn request(&mut self, path: impl Into<String>, kind: AssetKind) {
        self.entries.entry(path.into()).or_insert(AssetEntry {
            kind,
            state: AssetState::Pending,
        });
    }

    /// Record the loaded bytes of `path`.
    pub fn complete(&mut self, path: &str, data: &[u8]) -> Result<AssetId, AssetError> {
        let entry = self
            .entries
            .get_mut(path)
            .ok_or_else(|| AssetError::NotRequested(path.to_string()))?;
        let id = AssetId::of(data);
        entry.state = AssetState::Ready {
            id,
            bytes: data.len() as u64,
        };
        tracing::debug!(path, %id, "asset ready");
        Ok(id)
    }

    /// Record that `path` could not be loaded.
    pub fn fail(&mut self, path: &str, reason: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(path) {
            let reason = reason.into();
            tracing::warn!(path, %reason, "asset failed to load");
            entry.state = AssetState::Failed { reason };
        }
    }

    /// Read every pending asset from under `root`. Files that cannot be read
    /// are marked failed. Returns how many became ready.
    pub fn load_pending_from(&mut self, root: impl AsRef<Path>) -> usize {
        let root = root.as_ref();
        let pending: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.state == AssetState::Pending)
            .map(|(path, _)| path.clone())
            .collect();
        let mut ready = 0;
        for path in pending {
            match std::fs::read(root.join(&path)) {
                Ok(data) => {
                    if self.complete(&path, &data).is_ok() {
                        ready += 1;
                    }
                }
                Err(e) => self.fail(&path, e.to_string()),
            }
        }
        ready
    }

    pub fn get(&self, path: &str) -> Option<&AssetEntry> {
        self.entries.get(path)
    }

    /// Content id of `path`, if it is ready.
    pub fn ready_id(&self, path: &str) -> Option<AssetId> {
        match self.entries.get(path)?.state {
            AssetState::Ready { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_ready(&self, path: &str) -> bool {
        self.ready_id(path).is_some()
    }

    pub fn is_failed(&self, path: &str) -> bool {
        matches!(
            self.entries.get(path).map(|e| &e.state),
            Some(AssetState::Failed { .. })
        )
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.state == AssetState::Pending)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetEntry)> {
        self.entries.iter().map(|(path, e)| (path.as_str(), e))
    }

    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}
