#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use trackstat_api::config::ServerConfig;
use trackstat_api::router::build_app_router;
use trackstat_api::state::AppState;
use trackstat_db::models::track::NewTrack;
use trackstat_db::repositories::TrackRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState { pool }, &test_config())
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn new_track(
    name: &str,
    artist: &str,
    album: Option<&str>,
    danceability: Option<f64>,
    tempo: Option<f64>,
) -> NewTrack {
    NewTrack {
        track_name: name.to_string(),
        artist: artist.to_string(),
        album: album.map(str::to_string),
        danceability,
        tempo,
    }
}

/// Insert rows through the repository, as the loader would.
pub async fn seed(pool: &PgPool, rows: &[NewTrack]) {
    let mut tx = pool.begin().await.unwrap();
    TrackRepo::upsert_batch(&mut tx, rows).await.unwrap();
    tx.commit().await.unwrap();
}

/// Six tracks over three artists, inserted in id order 1..=6.
pub fn catalog() -> Vec<NewTrack> {
    vec![
        new_track("One Dance", "Drake", Some("Views"), Some(0.79), Some(104.0)),
        new_track("Hotline Bling", "Drake", Some("Views"), Some(0.89), Some(135.0)),
        new_track("God's Plan", "Drake", Some("Scorpion"), Some(0.75), Some(77.0)),
        new_track("Umbrella", "Rihanna", Some("Good Girl Gone Bad"), Some(0.58), Some(174.0)),
        new_track("Work", "Rihanna", None, None, Some(92.0)),
        new_track("Halo", "Beyonce", Some("I Am... Sasha Fierce"), Some(0.51), None),
    ]
}
