//! Domain types and pure logic for the track catalog.
//!
//! No database, no async, no I/O. The repository, HTTP and loader crates
//! all build on the types defined here.

pub mod catalog;
pub mod error;
pub mod types;
