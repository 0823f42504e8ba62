/// Catalog hierarchy types (month → part → track)
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// A part within a month; each part holds an ordered list of songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub songs: Vec<Track>,
}

/// A month (or named season) of the calendar with its parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Month {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Month listing without the songs, for navigation screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub id: u32,
    pub name: String,
    pub part_count: usize,
}

impl From<&Month> for MonthSummary {
    fn from(month: &Month) -> Self {
        Self {
            id: month.id,
            name: month.name.clone(),
            part_count: month.parts.len(),
        }
    }
}
