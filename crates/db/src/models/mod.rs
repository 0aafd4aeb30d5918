//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Input DTOs for writes
//! - Serializable report shapes built from aggregate queries

pub mod track;
