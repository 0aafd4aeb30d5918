//! Track catalog query parameters, validation and paging helpers.
//!
//! HTTP handlers deserialize query strings into [`TrackListParams`] /
//! [`TopArtistsParams`] and resolve them here; the repository layer only
//! ever sees an already-validated [`TrackQuery`].

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Paging limits
// ---------------------------------------------------------------------------

/// Default page size for the track listing.
pub const DEFAULT_TRACK_LIMIT: i64 = 50;

/// Largest page size the track listing accepts.
pub const MAX_TRACK_LIMIT: i64 = 500;

/// Default number of artists in the top-artists report.
pub const DEFAULT_TOP_ARTISTS_LIMIT: i64 = 10;

/// Largest number of artists the top-artists report accepts.
pub const MAX_TOP_ARTISTS_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sortable track columns (`?sort=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSort {
    Danceability,
    Tempo,
    TrackName,
}

impl TrackSort {
    /// Column name in the `tracks` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Danceability => "danceability",
            Self::Tempo => "tempo",
            Self::TrackName => "track_name",
        }
    }
}

/// Sort direction (`?order=`). Defaults to descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// List tracks
// ---------------------------------------------------------------------------

/// Raw query parameters for `GET /tracks`.
///
/// Field-level bounds are enforced by `validator`; cross-field rules
/// (finite numbers, `tempo_min <= tempo_max`) by [`validate_feature_bounds`].
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_feature_bounds"))]
pub struct TrackListParams {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    /// Substring matched against track name, artist or album.
    pub q: Option<String>,
    /// Substring matched against artist only.
    pub artist: Option<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_danceability: Option<f64>,
    pub tempo_min: Option<f64>,
    pub tempo_max: Option<f64>,
    pub sort: Option<TrackSort>,
    pub order: Option<SortOrder>,
}

fn validate_feature_bounds(params: &TrackListParams) -> Result<(), ValidationError> {
    let bounds = [params.min_danceability, params.tempo_min, params.tempo_max];
    if bounds.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ValidationError::new("non_finite")
            .with_message("numeric filters must be finite numbers".into()));
    }

    if let (Some(min), Some(max)) = (params.tempo_min, params.tempo_max) {
        if min > max {
            return Err(ValidationError::new("tempo_range").with_message(
                format!("tempo_min ({min}) must not exceed tempo_max ({max})").into(),
            ));
        }
    }

    Ok(())
}

/// Predicates applied to the `tracks` table. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFilter {
    pub text: Option<String>,
    pub artist: Option<String>,
    pub min_danceability: Option<f64>,
    pub tempo_min: Option<f64>,
    pub tempo_max: Option<f64>,
}

/// A validated track listing request with defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackQuery {
    pub filter: TrackFilter,
    /// `None` orders by `id` ascending.
    pub sort: Option<(TrackSort, SortOrder)>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for TrackQuery {
    fn default() -> Self {
        Self {
            filter: TrackFilter::default(),
            sort: None,
            limit: DEFAULT_TRACK_LIMIT,
            offset: 0,
        }
    }
}

impl TrackListParams {
    /// Validate the raw parameters and resolve defaults.
    pub fn into_query(self) -> Result<TrackQuery, CoreError> {
        self.validate()?;

        let order = self.order.unwrap_or_default();
        Ok(TrackQuery {
            filter: TrackFilter {
                text: non_blank(self.q),
                artist: non_blank(self.artist),
                min_danceability: self.min_danceability,
                tempo_min: self.tempo_min,
                tempo_max: self.tempo_max,
            },
            sort: self.sort.map(|column| (column, order)),
            limit: self.limit.unwrap_or(DEFAULT_TRACK_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Top artists
// ---------------------------------------------------------------------------

/// Raw query parameters for `GET /stats/top-artists`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TopArtistsParams {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl TopArtistsParams {
    /// Validate and return the effective limit.
    pub fn resolve_limit(&self) -> Result<i64, CoreError> {
        self.validate()?;
        Ok(self.limit.unwrap_or(DEFAULT_TOP_ARTISTS_LIMIT))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Offset of the page following `offset..offset + limit`, if any rows remain.
///
/// An offset so large that the sum overflows has no next page.
pub fn next_offset(offset: i64, limit: i64, total: i64) -> Option<i64> {
    offset.checked_add(limit).filter(|next| *next < total)
}

/// Build a `%term%` pattern for `ILIKE`, matching `%`, `_` and `\` literally.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
