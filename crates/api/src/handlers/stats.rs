//! Handlers for the read-only `/stats` reports.

use axum::extract::State;
use axum::Json;
use trackstat_core::catalog::TopArtistsParams;
use trackstat_db::models::track::{ArtistCount, TrackSummary};
use trackstat_db::repositories::TrackRepo;

use crate::error::AppResult;
use crate::query::ApiQuery;
use crate::state::AppState;

/// GET /api/stats/top-artists?limit=
///
/// Artists by descending track count across the whole table.
pub async fn top_artists(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TopArtistsParams>,
) -> AppResult<Json<Vec<ArtistCount>>> {
    let limit = params.resolve_limit()?;
    let artists = TrackRepo::top_artists(&state.pool, limit).await?;
    Ok(Json(artists))
}

/// GET /api/stats/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<TrackSummary>> {
    let summary = TrackRepo::summary(&state.pool).await?;
    Ok(Json(summary))
}
