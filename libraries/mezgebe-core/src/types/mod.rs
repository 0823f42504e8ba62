mod catalog;
mod ids;
mod track;

pub use catalog::{Month, MonthSummary, Part};
pub use ids::TrackId;
pub use track::Track;
