//! Typed identifier wrappers.
//!
//! Article and user identifiers are opaque strings chosen by the callers and
//! are stored exactly as given. The only rules are that they are not blank,
//! carry no surrounding whitespace and fit the store's key columns.

use crate::{PlauditError, PlauditResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Longest identifier accepted, in bytes.
pub const MAX_ID_LEN: usize = 255;

fn parse_id(kind: &str, raw: &str) -> PlauditResult<String> {
    if raw.trim().is_empty() {
        return Err(PlauditError::validation(format!("{kind} must not be blank")));
    }
    if raw.trim() != raw {
        return Err(PlauditError::validation(format!(
            "{kind} must not start or end with whitespace"
        )));
    }
    if raw.len() > MAX_ID_LEN {
        return Err(PlauditError::validation(format!(
            "{kind} must be at most {MAX_ID_LEN} bytes"
        )));
    }
    Ok(raw.to_string())
}

/// Identifier of a likeable article.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Parses an article ID.
    pub fn parse(raw: &str) -> PlauditResult<Self> {
        parse_id("article id", raw).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of the user recording a like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parses a user ID.
    pub fn parse(raw: &str) -> PlauditResult<Self> {
        parse_id("user id", raw).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
