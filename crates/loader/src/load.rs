//! CSV parsing and the transactional load run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use trackstat_db::models::track::NewTrack;
use trackstat_db::repositories::TrackRepo;
use trackstat_db::DbPool;

use crate::columns::resolve_columns;
use crate::error::LoadError;
use crate::normalize::{merge_duplicates, normalize_record};

/// Rows per upsert statement unless overridden.
pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Truncate `tracks` (and reset ids) before inserting.
    pub replace: bool,
    /// Rows per upsert statement. Must be at least 1.
    pub batch_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            replace: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Normalized contents of one CSV file, ready to load.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub alias_set: &'static str,
    pub rows: Vec<NewTrack>,
    /// Data records read, excluding the header row.
    pub rows_read: usize,
    /// Records discarded for a missing track name or artist.
    pub rows_dropped: usize,
}

/// Outcome of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub alias_set: &'static str,
    pub rows_read: usize,
    pub rows_dropped: usize,
    /// Rows folded into a later row with the same natural key.
    pub rows_merged: usize,
    /// Rows inserted or updated.
    pub rows_loaded: u64,
}

/// Resolve headers and normalize every record from `reader`.
pub fn parse_csv<R: Read>(reader: R) -> Result<ParsedCsv, LoadError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv.headers()?.clone();
    let header_names: Vec<&str> = headers.iter().collect();
    let map = resolve_columns(&header_names)?;
    tracing::info!(alias_set = map.alias_set, "Resolved CSV columns");

    let mut rows = Vec::new();
    let mut rows_read = 0;
    let mut rows_dropped = 0;

    for record in csv.records() {
        let record = record?;
        rows_read += 1;
        match normalize_record(&map, &record) {
            Some(track) => rows.push(track),
            None => rows_dropped += 1,
        }
    }

    Ok(ParsedCsv {
        alias_set: map.alias_set,
        rows,
        rows_read,
        rows_dropped,
    })
}

/// [`parse_csv`] over the file at `path`.
pub fn parse_csv_file(path: &Path) -> Result<ParsedCsv, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(file)
}

/// Write `parsed` to the `tracks` table.
///
/// The optional truncate and every batch share one transaction; on error
/// nothing is committed.
pub async fn load_tracks(
    pool: &DbPool,
    parsed: ParsedCsv,
    options: &LoadOptions,
) -> Result<LoadReport, LoadError> {
    if options.batch_size == 0 {
        return Err(LoadError::Config("batch size must be at least 1".into()));
    }

    if parsed.rows_dropped > 0 {
        tracing::warn!(
            rows_dropped = parsed.rows_dropped,
            "Dropped rows missing a track name or artist"
        );
    }

    let (rows, rows_merged) = merge_duplicates(parsed.rows);
    if rows_merged > 0 {
        tracing::info!(rows_merged, "Merged rows repeating a track key");
    }

    let mut tx = pool.begin().await?;

    if options.replace {
        TrackRepo::truncate(&mut tx).await?;
        tracing::info!("Truncated tracks table");
    }

    let mut rows_loaded = 0;
    let mut processed = 0;
    for batch in rows.chunks(options.batch_size) {
        rows_loaded += TrackRepo::upsert_batch(&mut tx, batch).await?;
        processed += batch.len();
        tracing::info!(processed, total = rows.len(), "Upserted batch");
    }

    tx.commit().await?;

    let report = LoadReport {
        alias_set: parsed.alias_set,
        rows_read: parsed.rows_read,
        rows_dropped: parsed.rows_dropped,
        rows_merged,
        rows_loaded,
    };
    tracing::info!(rows_loaded, rows_read = report.rows_read, "Load complete");
    Ok(report)
}

/// Parse the file at `path`, then load it.
///
/// Parsing finishes before any database work starts, so a malformed or
/// unmappable file leaves the table untouched.
pub async fn load_csv(
    pool: &DbPool,
    path: &Path,
    options: &LoadOptions,
) -> Result<LoadReport, LoadError> {
    let parsed = parse_csv_file(path)?;
    load_tracks(pool, parsed, options).await
}
