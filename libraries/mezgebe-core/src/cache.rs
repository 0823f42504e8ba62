//! Offline cache implementations
//!
//! Two stores share the [`OfflineCache`] contract:
//! - [`MemoryCache`]: process-local, for tests and ephemeral sessions
//! - [`DirectoryCache`]: one file per track under a root directory
//!
//! Playback never fails because of the cache. [`lookup_or_miss`] and
//! [`with_offline_copy`] log failures and fall back to the remote source.

use crate::error::{CoreError, Result};
use crate::traits::{CacheStats, OfflineCache};
use crate::types::{Track, TrackId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// File extension used for cached payloads
const CACHE_EXTENSION: &str = "mp3";

/// In-memory offline cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<TrackId, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfflineCache for MemoryCache {
    async fn get(&self, id: &TrackId) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn put(&self, id: &TrackId, bytes: Vec<u8>) -> Result<()> {
        self.entries.write().await.insert(id.clone(), bytes);
        Ok(())
    }

    async fn delete(&self, id: &TrackId) -> Result<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries.read().await;
        Ok(CacheStats {
            total_bytes: entries.values().map(|b| b.len() as u64).sum(),
            count: entries.len(),
        })
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Directory-backed offline cache
///
/// Each track lives at `<root>/<sanitised id>.mp3`, so a cached file can be
/// handed to the player as the track's local URI.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a track's cached file (which may not exist yet)
    pub fn path_for(&self, id: &TrackId) -> PathBuf {
        self.root
            .join(format!("{}.{}", sanitize_file_stem(id.as_str()), CACHE_EXTENSION))
    }

    /// Whether the track has a cached file
    pub async fn contains(&self, id: &TrackId) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(id)).await?)
    }

    async fn cached_files(&self) -> Result<Vec<PathBuf>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let is_payload = path
                .extension()
                .is_some_and(|ext| ext == CACHE_EXTENSION);
            if is_payload && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl OfflineCache for DirectoryCache {
    async fn get(&self, id: &TrackId) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, id: &TrackId, bytes: Vec<u8>) -> Result<()> {
        if bytes.is_empty() {
            return Err(CoreError::invalid_input(format!(
                "refusing to cache empty payload for track {}",
                id
            )));
        }

        tokio::fs::create_dir_all(&self.root).await?;

        // Write then rename so readers never observe a partial file
        let path = self.path_for(id);
        let partial = path.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &path).await?;

        tracing::debug!(track_id = %id, bytes = bytes.len(), "Cached track");
        Ok(())
    }

    async fn delete(&self, id: &TrackId) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        for path in self.cached_files().await? {
            stats.total_bytes += tokio::fs::metadata(&path).await?.len();
            stats.count += 1;
        }
        Ok(stats)
    }

    async fn clear(&self) -> Result<()> {
        let files = self.cached_files().await?;
        let count = files.len();
        for path in files {
            tokio::fs::remove_file(&path).await?;
        }
        tracing::info!(count, "Cleared offline cache at {}", self.root.display());
        Ok(())
    }
}

/// Read a track from the cache, treating any failure as a miss
pub async fn lookup_or_miss<C>(cache: &C, id: &TrackId) -> Option<Vec<u8>>
where
    C: OfflineCache + ?Sized,
{
    match cache.get(id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(track_id = %id, "Offline cache lookup failed: {}", e);
            None
        }
    }
}

/// Point the track at its cached file if the directory cache holds one
pub async fn with_offline_copy(cache: &DirectoryCache, track: Track) -> Track {
    match cache.contains(track.id()).await {
        Ok(true) => {
            let path = cache.path_for(track.id());
            track.with_local_uri(path.to_string_lossy())
        }
        Ok(false) => track,
        Err(e) => {
            tracing::warn!(track_id = %track.id(), "Offline cache check failed: {}", e);
            track
        }
    }
}

fn sanitize_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
