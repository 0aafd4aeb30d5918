pub mod health;
pub mod stats;
pub mod tracks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /tracks                 list (filter, sort, paginate)
/// /stats/top-artists      artists by track count
/// /stats/summary          totals and averages
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tracks", tracks::router())
        .nest("/stats", stats::router())
}
