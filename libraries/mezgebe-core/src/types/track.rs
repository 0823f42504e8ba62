/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// A single playable recording
///
/// Tracks are value objects: the builder-style `with_*` methods return a new
/// value and the identifier cannot change after construction. Field names on
/// the wire follow the catalog JSON (`url`, `day`, `localPath`, `duration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    id: TrackId,

    title: String,

    #[serde(rename = "url")]
    source_url: String,

    #[serde(default, rename = "localPath", skip_serializing_if = "Option::is_none")]
    local_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,

    #[serde(default)]
    month: u32,

    #[serde(default, rename = "day", alias = "part")]
    part_or_day: u32,

    /// Advisory only; the audio handle reports the real duration
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    duration_hint: Option<f64>,
}

impl Track {
    /// Create a track with the minimum needed for playback
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source_url: source_url.into(),
            local_uri: None,
            filename: None,
            month: 0,
            part_or_day: 0,
            duration_hint: None,
        }
    }

    /// Place the track in the catalog hierarchy
    #[must_use]
    pub fn with_location(mut self, month: u32, part_or_day: u32) -> Self {
        self.month = month;
        self.part_or_day = part_or_day;
        self
    }

    /// Attach the location of a cached offline copy
    #[must_use]
    pub fn with_local_uri(mut self, local_uri: impl Into<String>) -> Self {
        self.local_uri = Some(local_uri.into());
        self
    }

    /// Attach the original file name
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attach an advisory duration in seconds
    #[must_use]
    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.duration_hint = Some(seconds);
        self
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute URL of the remote audio file
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn local_uri(&self) -> Option<&str> {
        self.local_uri.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn part_or_day(&self) -> u32 {
        self.part_or_day
    }

    pub fn duration_hint(&self) -> Option<f64> {
        self.duration_hint
    }

    /// The source the player should load: a usable offline copy if there
    /// is one, otherwise the remote URL
    pub fn preferred_source(&self) -> &str {
        match self.local_uri.as_deref() {
            Some(local) if !local.trim().is_empty() => local,
            _ => &self.source_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_shape() {
        let json = r#"{
            "id": "7",
            "title": "Kidane Mihret",
            "filename": "kidane.mp3",
            "month": 2,
            "day": 3,
            "url": "https://www.ethiopianorthodox.org/kidane.mp3",
            "duration": 184.5
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id().as_str(), "7");
        assert_eq!(track.month(), 2);
        assert_eq!(track.part_or_day(), 3);
        assert_eq!(track.duration_hint(), Some(184.5));
        assert_eq!(track.local_uri(), None);
        assert_eq!(track.filename(), Some("kidane.mp3"));
    }

    #[test]
    fn preferred_source_uses_local_copy_when_present() {
        let track = Track::new("1", "A", "https://example.org/a.mp3");
        assert_eq!(track.preferred_source(), "https://example.org/a.mp3");

        let cached = track.clone().with_local_uri("offline/1.mp3");
        assert_eq!(cached.preferred_source(), "offline/1.mp3");

        // Blank local paths are not usable
        let blank = track.with_local_uri("  ");
        assert_eq!(blank.preferred_source(), "https://example.org/a.mp3");
    }
}
