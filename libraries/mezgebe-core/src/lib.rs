//! Mezgebe Core
//!
//! Platform-agnostic domain types and collaborators shared by the player and
//! the server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `Month`, `Part`
//! - **Catalog**: the read-only `CatalogProvider` and its JSON-backed
//!   `StaticCatalog`
//! - **Offline Cache**: the `OfflineCache` trait with in-memory and
//!   directory-backed implementations
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use mezgebe_core::{CatalogProvider, StaticCatalog};
//!
//! let json = r#"[{"id": 1, "name": "Meskerem", "parts": [
//!     {"id": 1, "name": "Part 1", "songs": [
//!         {"id": "1", "title": "Song", "month": 1, "day": 1,
//!          "url": "https://example.org/song.mp3"}
//!     ]}
//! ]}]"#;
//!
//! let catalog = StaticCatalog::from_json_str(json).unwrap();
//! assert_eq!(catalog.list_tracks_for(1, 1).len(), 1);
//! assert_eq!(catalog.month_name(1), Some("Meskerem"));
//! ```

#![forbid(unsafe_code)]

pub mod cache;
pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

pub use cache::{lookup_or_miss, with_offline_copy, DirectoryCache, MemoryCache};
pub use catalog::{StaticCatalog, DEFAULT_SEARCH_LIMIT};
pub use error::{CoreError, Result};
pub use traits::{CacheStats, CatalogProvider, OfflineCache};
pub use types::{Month, MonthSummary, Part, Track, TrackId};
