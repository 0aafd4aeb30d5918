//! Track entity model, loader DTO and report shapes.

use serde::Serialize;
use sqlx::FromRow;
use trackstat_core::types::DbId;

/// A row from the `tracks` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub track_name: String,
    pub artist: String,
    pub album: Option<String>,
    pub danceability: Option<f64>,
    pub tempo: Option<f64>,
}

/// DTO for inserting or updating a track by its natural key.
///
/// `track_name`, `artist` and `album` form the key; the numeric features
/// are overwritten on conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    pub track_name: String,
    pub artist: String,
    pub album: Option<String>,
    pub danceability: Option<f64>,
    pub tempo: Option<f64>,
}

impl NewTrack {
    /// The `(track_name, artist, album)` uniqueness key.
    pub fn natural_key(&self) -> (&str, &str, Option<&str>) {
        (&self.track_name, &self.artist, self.album.as_deref())
    }
}

/// One page of the filtered track listing.
#[derive(Debug, Clone, Serialize)]
pub struct TrackPage {
    pub items: Vec<Track>,
    /// Rows matching the filters, ignoring `limit`/`offset`.
    pub total: i64,
    pub next_offset: Option<i64>,
}

/// Track count for one artist.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ArtistCount {
    pub artist: String,
    pub count: i64,
}

/// Dataset-wide totals. Averages are `0.0` for an empty table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub total_tracks: i64,
    pub avg_danceability: f64,
    pub avg_tempo: f64,
}
