//! Integration tests for the CSV loader against a real database:
//! - Column alias resolution and row normalization end to end
//! - Idempotent re-loads and `replace` semantics
//! - Failures leave the table untouched

use std::path::PathBuf;

use assert_matches::assert_matches;
use sqlx::PgPool;
use tempfile::TempDir;
use trackstat_core::catalog::TrackQuery;
use trackstat_db::models::track::{NewTrack, Track};
use trackstat_db::repositories::TrackRepo;
use trackstat_loader::{load_csv, load_tracks, LoadError, LoadOptions, ParsedCsv};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SPOTIFY_CSV: &str = "\
Unnamed: 0,track_id,artists,album_name,track_name,popularity,danceability,tempo
0,id0,\"['Drake', 'Rihanna']\",Views,Too Good,70,0.794,117.996
1,id1,Drake,Views,One Dance,90,0.792,103.967
2,id2,Adele,,Hello,85,0.481,78.0
3,id3,,Nameless,Ghost Track,10,0.5,100.0
4,id4,Adele,25,,40,0.4,90.0
5,id5,Adele,25,   ,40,0.4,90.0
";

const CANONICAL_CSV: &str = "\
track_name,artist,album,danceability,tempo
Umbrella,Rihanna,Good Girl Gone Bad,0.583,174.028
Halo,Beyonce,,0.508,not-a-number
";

/// Write `contents` to a fresh CSV in `dir` and return its path.
fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

async fn all_tracks(pool: &PgPool) -> Vec<Track> {
    let query = TrackQuery {
        limit: 500,
        ..Default::default()
    };
    TrackRepo::list(pool, &query).await.unwrap().items
}

async fn track_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn replace() -> LoadOptions {
    LoadOptions {
        replace: true,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Mapping and normalization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn spotify_export_loads_normalized_rows(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);

    let report = load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();

    assert_eq!(report.alias_set, "spotify-tracks-dataset");
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.rows_dropped, 3);
    assert_eq!(report.rows_merged, 0);
    assert_eq!(report.rows_loaded, 3);

    let tracks = all_tracks(&pool).await;
    assert_eq!(tracks.len(), 3);

    assert_eq!(tracks[0].track_name, "Too Good");
    assert_eq!(tracks[0].artist, "Drake");
    assert_eq!(tracks[0].album.as_deref(), Some("Views"));
    assert_eq!(tracks[0].danceability, Some(0.794));
    assert_eq!(tracks[0].tempo, Some(117.996));

    assert_eq!(tracks[2].track_name, "Hello");
    assert_eq!(tracks[2].album, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unparseable_numbers_are_stored_as_null(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "canonical.csv", CANONICAL_CSV);

    let report = load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();
    assert_eq!(report.alias_set, "canonical");

    let tracks = all_tracks(&pool).await;
    let halo = tracks.iter().find(|t| t.track_name == "Halo").unwrap();
    assert_eq!(halo.danceability, Some(0.508));
    assert_eq!(halo.tempo, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mixed_alias_headers_load(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "mixed.csv",
        "name,artist,album,danceability,tempo\n\
         Halo,Beyonce,I Am... Sasha Fierce,0.508,79.9\n",
    );

    let report = load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();

    assert_eq!(report.alias_set, "name-artist-album");
    assert_eq!(report.rows_loaded, 1);
    let tracks = all_tracks(&pool).await;
    assert_eq!(tracks[0].track_name, "Halo");
    assert_eq!(tracks[0].album.as_deref(), Some("I Am... Sasha Fierce"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn in_file_duplicates_merge_last_wins(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "dupes.csv",
        "track_name,artist,album,danceability,tempo\n\
         Song,Artist,,0.1,100\n\
         Other,Artist,,0.2,110\n\
         Song,Artist,,0.9,140\n",
    );

    let report = load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_merged, 1);
    assert_eq!(report.rows_loaded, 2);

    let tracks = all_tracks(&pool).await;
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].track_name, "Song");
    assert_eq!(tracks[0].danceability, Some(0.9));
    assert_eq!(tracks[0].tempo, Some(140.0));
}

// ---------------------------------------------------------------------------
// Re-loading
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reloading_the_same_file_is_idempotent(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);

    load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();
    let first = all_tracks(&pool).await;

    load_csv(&pool, &path, &LoadOptions::default()).await.unwrap();
    let second = all_tracks(&pool).await;

    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reload_overwrites_numeric_features(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let before = write_csv(
        &dir,
        "before.csv",
        "track_name,artist,album,danceability,tempo\nSong,Artist,Album,0.1,100\n",
    );
    let after = write_csv(
        &dir,
        "after.csv",
        "track_name,artist,album,danceability,tempo\nSong,Artist,Album,0.7,\n",
    );

    load_csv(&pool, &before, &LoadOptions::default()).await.unwrap();
    load_csv(&pool, &after, &LoadOptions::default()).await.unwrap();

    let tracks = all_tracks(&pool).await;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, 1);
    assert_eq!(tracks[0].danceability, Some(0.7));
    assert_eq!(tracks[0].tempo, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_keeps_only_the_latest_file(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let spotify = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);
    let canonical = write_csv(&dir, "canonical.csv", CANONICAL_CSV);

    load_csv(&pool, &spotify, &replace()).await.unwrap();
    load_csv(&pool, &canonical, &replace()).await.unwrap();

    let tracks = all_tracks(&pool).await;
    let ids: Vec<i64> = tracks.iter().map(|t| t.id).collect();
    let names: Vec<&str> = tracks.iter().map(|t| t.track_name.as_str()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(names, vec!["Umbrella", "Halo"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn small_batches_load_every_row(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);
    let options = LoadOptions {
        replace: false,
        batch_size: 2,
    };

    let report = load_csv(&pool, &path, &options).await.unwrap();

    assert_eq!(report.rows_loaded, 3);
    assert_eq!(track_count(&pool).await, 3);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unmapped_headers_write_nothing(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let good = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);
    let bad = write_csv(&dir, "bad.csv", "title,performer,bpm\nSong,Artist,120\n");
    load_csv(&pool, &good, &LoadOptions::default()).await.unwrap();

    let err = load_csv(&pool, &bad, &replace()).await.unwrap_err();

    assert_matches!(err, LoadError::ColumnMapping { .. });
    assert_eq!(track_count(&pool).await, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_file_is_an_io_error(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    let err = load_csv(&pool, &path, &LoadOptions::default()).await.unwrap_err();

    assert_matches!(err, LoadError::Io { path: ref p, .. } if *p == path);
    assert_eq!(track_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_batch_size_is_rejected(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);
    let options = LoadOptions {
        replace: false,
        batch_size: 0,
    };

    let err = load_csv(&pool, &path, &options).await.unwrap_err();

    assert_matches!(err, LoadError::Config(_));
    assert_eq!(track_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_batch_rolls_back_the_whole_load(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let good = write_csv(&dir, "spotify.csv", SPOTIFY_CSV);
    load_csv(&pool, &good, &LoadOptions::default()).await.unwrap();

    // The second batch violates the non-empty artist constraint.
    let row = |name: &str, artist: &str| NewTrack {
        track_name: name.into(),
        artist: artist.into(),
        album: None,
        danceability: None,
        tempo: None,
    };
    let parsed = ParsedCsv {
        alias_set: "canonical",
        rows: vec![row("Fine", "Artist"), row("Broken", "")],
        rows_read: 2,
        rows_dropped: 0,
    };
    let options = LoadOptions {
        replace: true,
        batch_size: 1,
    };

    let err = load_tracks(&pool, parsed, &options).await.unwrap_err();

    assert_matches!(err, LoadError::Database(_));
    let names: Vec<String> = all_tracks(&pool)
        .await
        .into_iter()
        .map(|t| t.track_name)
        .collect();
    assert_eq!(names, vec!["Too Good", "One Dance", "Hello"]);
}
