/// Collaborator traits consumed by the player and the server
use crate::error::Result;
use crate::types::{Month, Part, Track, TrackId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only catalog of months, parts and tracks
///
/// Pure and synchronous: lookups never fail, unknown ids give empty results.
pub trait CatalogProvider: Send + Sync {
    /// All months in calendar order
    fn months(&self) -> &[Month];

    /// Tracks of one part of one month (`part` is 1-based)
    fn list_tracks_for(&self, month: u32, part: u32) -> Vec<Track>;

    /// Case-insensitive substring search over track titles and month names
    fn search(&self, query: &str, limit: usize) -> Vec<Track>;

    /// Display name of a month
    fn month_name(&self, month: u32) -> Option<&str>;

    /// Parts of a month, empty if the month is unknown
    fn parts_for_month(&self, month: u32) -> &[Part] {
        self.months()
            .iter()
            .find(|m| m.id == month)
            .map(|m| m.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Number of parts in a month
    fn max_parts_in_month(&self, month: u32) -> usize {
        self.parts_for_month(month).len()
    }
}

/// Aggregate size of the offline cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_bytes: u64,
    pub count: usize,
}

/// Persistent store of downloaded track bytes keyed by track id
///
/// Callers treat every failure as a cache miss; see
/// [`lookup_or_miss`](crate::cache::lookup_or_miss).
#[async_trait]
pub trait OfflineCache: Send + Sync {
    /// Fetch the stored bytes for a track
    async fn get(&self, id: &TrackId) -> Result<Option<Vec<u8>>>;

    /// Store (or replace) the bytes for a track
    async fn put(&self, id: &TrackId, bytes: Vec<u8>) -> Result<()>;

    /// Remove a track; removing an absent track is not an error
    async fn delete(&self, id: &TrackId) -> Result<()>;

    /// Total bytes and item count
    async fn stats(&self) -> Result<CacheStats>;

    /// Evict everything
    async fn clear(&self) -> Result<()>;
}
