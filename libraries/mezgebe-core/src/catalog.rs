//! JSON-backed static catalog

use crate::error::{CoreError, Result};
use crate::traits::CatalogProvider;
use crate::types::{Month, MonthSummary, Track};
use std::path::Path;

/// Default number of search hits
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Immutable catalog loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    months: Vec<Month>,
}

impl StaticCatalog {
    /// Build a catalog from months already in memory
    pub fn new(months: Vec<Month>) -> Self {
        Self { months }
    }

    /// Parse the catalog from a JSON array of months
    pub fn from_json_str(json: &str) -> Result<Self> {
        let months: Vec<Month> = serde_json::from_str(json)?;
        Ok(Self::new(months))
    }

    /// Load the catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            months = catalog.months.len(),
            tracks = catalog.all_tracks().count(),
            "Catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Every track, month by month, part by part
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.months
            .iter()
            .flat_map(|m| m.parts.iter())
            .flat_map(|p| p.songs.iter())
    }

    /// Month listing without songs
    pub fn summaries(&self) -> Vec<MonthSummary> {
        self.months.iter().map(MonthSummary::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl CatalogProvider for StaticCatalog {
    fn months(&self) -> &[Month] {
        &self.months
    }

    fn list_tracks_for(&self, month: u32, part: u32) -> Vec<Track> {
        let Some(month) = self.months.iter().find(|m| m.id == month) else {
            return Vec::new();
        };

        let Some(index) = (part as usize).checked_sub(1) else {
            return Vec::new();
        };

        month
            .parts
            .get(index)
            .map(|p| p.songs.clone())
            .unwrap_or_default()
    }

    fn search(&self, query: &str, limit: usize) -> Vec<Track> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.all_tracks()
            .filter(|track| {
                let month_name = self.month_name(track.month()).unwrap_or_default();
                format!("{} {}", track.title(), month_name)
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    fn month_name(&self, month: u32) -> Option<&str> {
        self.months
            .iter()
            .find(|m| m.id == month)
            .map(|m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Part;

    fn song(id: &str, title: &str, month: u32, part: u32) -> Track {
        Track::new(id, title, format!("https://example.org/{id}.mp3")).with_location(month, part)
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Month {
                id: 1,
                name: "Meskerem".to_string(),
                parts: vec![
                    Part {
                        id: 1,
                        name: "Part 1".to_string(),
                        songs: vec![song("1", "Enkutatash", 1, 1), song("2", "Meskel", 1, 1)],
                    },
                    Part {
                        id: 2,
                        name: "Part 2".to_string(),
                        songs: vec![song("3", "Yohannes", 1, 2)],
                    },
                ],
            },
            Month {
                id: 2,
                name: "Tikimt".to_string(),
                parts: vec![Part {
                    id: 1,
                    name: "Part 1".to_string(),
                    songs: vec![song("4", "Abune Aregawi", 2, 1)],
                }],
            },
        ])
    }

    #[test]
    fn list_tracks_is_one_based() {
        let catalog = catalog();
        assert_eq!(catalog.list_tracks_for(1, 1).len(), 2);
        assert_eq!(catalog.list_tracks_for(1, 2)[0].title(), "Yohannes");
        assert!(catalog.list_tracks_for(1, 0).is_empty());
        assert!(catalog.list_tracks_for(1, 3).is_empty());
        assert!(catalog.list_tracks_for(9, 1).is_empty());
    }

    #[test]
    fn search_matches_title_and_month_name() {
        let catalog = catalog();

        let by_title = catalog.search("meskel", DEFAULT_SEARCH_LIMIT);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id().as_str(), "2");

        // Month name matches every track of that month
        let by_month = catalog.search("TIKIMT", DEFAULT_SEARCH_LIMIT);
        assert_eq!(by_month.len(), 1);

        assert_eq!(catalog.search("e", 2).len(), 2);
        assert!(catalog.search("   ", 10).is_empty());
    }

    #[test]
    fn month_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.month_name(2), Some("Tikimt"));
        assert_eq!(catalog.month_name(3), None);
        assert_eq!(catalog.max_parts_in_month(1), 2);
        assert_eq!(catalog.max_parts_in_month(7), 0);
        assert_eq!(catalog.summaries()[0].part_count, 2);
        assert_eq!(catalog.all_tracks().count(), 4);
    }
}
