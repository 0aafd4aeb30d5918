//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (reads) or an open transaction (bulk writes) as the
//! first argument.

pub mod track_repo;

pub use track_repo::TrackRepo;
