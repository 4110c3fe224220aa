//! Database access layer
//!
//! SQL text lives in [`queries`]; [`traits::RelationRepository`] is the seam the
//! browsing service reads through.

pub mod queries;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the main trait
pub use traits::{DatabaseError, RelationRepository};
