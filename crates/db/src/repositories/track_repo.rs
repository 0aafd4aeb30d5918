//! Repository for the `tracks` table.

use sqlx::{PgPool, Postgres, Transaction};
use trackstat_core::catalog::{
    contains_pattern, next_offset, SortOrder, TrackFilter, TrackQuery, TrackSort,
};

use crate::models::track::{ArtistCount, NewTrack, Track, TrackPage, TrackSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, track_name, artist, album, danceability, tempo";

/// Provides catalog reads and loader writes for tracks.
pub struct TrackRepo;

impl TrackRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch one page of tracks matching `query`, plus the filtered total.
    ///
    /// Count and page run in a single read-only snapshot so `total` is
    /// consistent with `items` even while a load is in progress.
    pub async fn list(pool: &PgPool, query: &TrackQuery) -> Result<TrackPage, sqlx::Error> {
        let filter = &query.filter;
        let (where_clause, param_idx) = filter_conditions(filter);
        let limit_idx = param_idx + 1;
        let offset_idx = param_idx + 2;

        let text_pattern = filter.text.as_deref().map(contains_pattern);
        let artist_pattern = filter.artist.as_deref().map(contains_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM tracks {where_clause}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM tracks {where_clause} {} \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            order_clause(query.sort)
        );

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref pattern) = text_pattern {
            count_q = count_q.bind(pattern);
        }
        if let Some(ref pattern) = artist_pattern {
            count_q = count_q.bind(pattern);
        }
        if let Some(min) = filter.min_danceability {
            count_q = count_q.bind(min);
        }
        if let Some(min) = filter.tempo_min {
            count_q = count_q.bind(min);
        }
        if let Some(max) = filter.tempo_max {
            count_q = count_q.bind(max);
        }
        let total = count_q.fetch_one(&mut *tx).await?;

        let mut page_q = sqlx::query_as::<_, Track>(&page_sql);
        if let Some(ref pattern) = text_pattern {
            page_q = page_q.bind(pattern);
        }
        if let Some(ref pattern) = artist_pattern {
            page_q = page_q.bind(pattern);
        }
        if let Some(min) = filter.min_danceability {
            page_q = page_q.bind(min);
        }
        if let Some(min) = filter.tempo_min {
            page_q = page_q.bind(min);
        }
        if let Some(max) = filter.tempo_max {
            page_q = page_q.bind(max);
        }
        let items = page_q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(total, returned = items.len(), "Listed tracks");
        Ok(TrackPage {
            items,
            total,
            next_offset: next_offset(query.offset, query.limit, total),
        })
    }

    /// Artists ranked by track count, ties broken by artist name ascending.
    pub async fn top_artists(pool: &PgPool, limit: i64) -> Result<Vec<ArtistCount>, sqlx::Error> {
        sqlx::query_as::<_, ArtistCount>(
            "SELECT artist, COUNT(*) AS count \
             FROM tracks \
             GROUP BY artist \
             ORDER BY COUNT(*) DESC, artist ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Row count and feature averages over non-null values.
    pub async fn summary(pool: &PgPool) -> Result<TrackSummary, sqlx::Error> {
        let (total_tracks, avg_danceability, avg_tempo): (i64, Option<f64>, Option<f64>) =
            sqlx::query_as("SELECT COUNT(*), AVG(danceability), AVG(tempo) FROM tracks")
                .fetch_one(pool)
                .await?;

        Ok(TrackSummary {
            total_tracks,
            avg_danceability: avg_danceability.unwrap_or(0.0),
            avg_tempo: avg_tempo.unwrap_or(0.0),
        })
    }

    // -----------------------------------------------------------------------
    // Loader writes
    // -----------------------------------------------------------------------

    /// Remove every track and reset the id sequence.
    pub async fn truncate(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE TABLE tracks RESTART IDENTITY")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Insert `rows`, overwriting the numeric features of rows whose
    /// natural key already exists.
    ///
    /// `rows` must not repeat a natural key: PostgreSQL refuses to update
    /// the same row twice within one statement.
    ///
    /// Returns the number of rows inserted or updated.
    pub async fn upsert_batch(
        tx: &mut Transaction<'_, Postgres>,
        rows: &[NewTrack],
    ) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let track_names: Vec<String> = rows.iter().map(|r| r.track_name.clone()).collect();
        let artists: Vec<String> = rows.iter().map(|r| r.artist.clone()).collect();
        let albums: Vec<Option<String>> = rows.iter().map(|r| r.album.clone()).collect();
        let danceability: Vec<Option<f64>> = rows.iter().map(|r| r.danceability).collect();
        let tempo: Vec<Option<f64>> = rows.iter().map(|r| r.tempo).collect();

        let result = sqlx::query(
            "INSERT INTO tracks (track_name, artist, album, danceability, tempo) \
             SELECT * FROM UNNEST($1::TEXT[], $2::TEXT[], $3::TEXT[], $4::FLOAT8[], $5::FLOAT8[]) \
             ON CONFLICT ON CONSTRAINT uq_tracks_natural_key \
             DO UPDATE SET danceability = EXCLUDED.danceability, tempo = EXCLUDED.tempo",
        )
        .bind(&track_names)
        .bind(&artists)
        .bind(&albums)
        .bind(&danceability)
        .bind(&tempo)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Query building
// ---------------------------------------------------------------------------

/// Build the `WHERE` clause for `filter`, returning it with the number of
/// placeholders used. Values are bound by the caller in the same order:
/// text pattern, artist pattern, min danceability, tempo min, tempo max.
fn filter_conditions(filter: &TrackFilter) -> (String, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_idx: usize = 0;

    if filter.text.is_some() {
        param_idx += 1;
        conditions.push(format!(
            "(track_name ILIKE ${param_idx} OR artist ILIKE ${param_idx} OR album ILIKE ${param_idx})"
        ));
    }
    if filter.artist.is_some() {
        param_idx += 1;
        conditions.push(format!("artist ILIKE ${param_idx}"));
    }
    if filter.min_danceability.is_some() {
        param_idx += 1;
        conditions.push(format!("danceability >= ${param_idx}"));
    }
    if filter.tempo_min.is_some() {
        param_idx += 1;
        conditions.push(format!("tempo >= ${param_idx}"));
    }
    if filter.tempo_max.is_some() {
        param_idx += 1;
        conditions.push(format!("tempo <= ${param_idx}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, param_idx)
}

/// `ORDER BY` clause. Column names come from [`TrackSort`], never from input.
///
/// NULL features sort last in both directions; `id` breaks ties.
fn order_clause(sort: Option<(TrackSort, SortOrder)>) -> String {
    match sort {
        Some((column, order)) => format!(
            "ORDER BY {} {} NULLS LAST, id ASC",
            column.column(),
            order.as_sql()
        ),
        None => "ORDER BY id ASC".to_string(),
    }
}
