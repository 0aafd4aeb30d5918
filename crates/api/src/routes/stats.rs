//! Route definitions for catalog statistics.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats`.
///
/// ```text
/// GET  /top-artists   -> top_artists
/// GET  /summary       -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/top-artists", get(stats::top_artists))
        .route("/summary", get(stats::summary))
}
