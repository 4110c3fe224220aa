//! Validation and quoting of untrusted SQL identifiers
//!
//! SQLite has no placeholder syntax for identifiers, so table, view and column
//! names have to be spliced into SQL text. Every externally supplied name goes
//! through [`ensure_valid`] first and through [`quote`] when it is embedded.
//! Values (limits, offsets, catalog lookups) are never handled here; they are
//! bound as statement parameters.

use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SAFE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("identifier pattern is valid"));

/// An identifier wrapped in double quotes, ready to be embedded in SQL text
///
/// Only [`quote`] constructs this type, so a `QuotedIdentifier` in a query
/// builder signature means the quoting step already happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotedIdentifier(String);

impl QuotedIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotedIdentifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl PartialEq<&str> for QuotedIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Returns true if the identifier is non-blank and only contains ASCII
/// letters, digits and underscores
pub fn is_valid(identifier: &str) -> bool {
    !identifier.trim().is_empty() && SAFE_IDENTIFIER.is_match(identifier)
}

/// Fail with [`Error::InvalidIdentifier`] unless the identifier is safe
pub fn ensure_valid(identifier: &str) -> Result<&str> {
    if is_valid(identifier) {
        Ok(identifier)
    } else {
        Err(Error::InvalidIdentifier {
            name: identifier.to_string(),
        })
    }
}

/// Quote an identifier (table or column name) for SQLite
///
/// SQLite uses double quotes for identifiers. Embedded double quotes are
/// doubled, so the result is well-formed for any input string.
pub fn quote(identifier: &str) -> QuotedIdentifier {
    QuotedIdentifier(format!("\"{}\"", identifier.replace('"', "\"\"")))
}
