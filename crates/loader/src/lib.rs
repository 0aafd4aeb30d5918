//! Bulk CSV loader for the `tracks` table.
//!
//! A load is two phases: [`parse_csv_file`] maps and normalizes every
//! record without touching the database, then [`load_tracks`] upserts the
//! surviving rows in batches inside one transaction.

pub mod columns;
pub mod error;
pub mod load;
pub mod normalize;

pub use error::LoadError;
pub use load::{
    load_csv, load_tracks, parse_csv, parse_csv_file, LoadOptions, LoadReport, ParsedCsv,
    DEFAULT_BATCH_SIZE,
};
