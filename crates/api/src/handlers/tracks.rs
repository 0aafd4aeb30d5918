//! Handlers for the `/tracks` resource.

use axum::extract::State;
use axum::Json;
use trackstat_core::catalog::TrackListParams;
use trackstat_db::models::track::TrackPage;
use trackstat_db::repositories::TrackRepo;

use crate::error::AppResult;
use crate::query::ApiQuery;
use crate::state::AppState;

/// GET /api/tracks?limit=&offset=&q=&artist=&min_danceability=&tempo_min=&tempo_max=&sort=&order=
///
/// One filtered, sorted page of tracks with the filtered total.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TrackListParams>,
) -> AppResult<Json<TrackPage>> {
    let query = params.into_query()?;
    tracing::debug!(?query, "Listing tracks");

    let page = TrackRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}
