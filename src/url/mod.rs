//! URL handling module for Crawl-Watch
//!
//! This module gates what may be submitted to the backend. A [`TaskSeed`]
//! can only be built from input that passes [`is_valid_seed`], so holding
//! one is proof the seed was checked.

mod validator;

use crate::{UrlResult, ValidationError};
use serde::Serialize;
use std::fmt;
use url::Url;

// Re-export main functions
pub use validator::{check_seed, is_valid_seed};

/// The user-supplied starting URL of a crawl task
///
/// Immutable once constructed. The stored form is the trimmed input exactly
/// as the user typed it; [`TaskSeed::to_url`] gives the absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskSeed(String);

impl TaskSeed {
    /// Validates `input` and wraps it as a seed
    ///
    /// # Examples
    ///
    /// ```
    /// use crawl_watch::url::TaskSeed;
    ///
    /// let seed = TaskSeed::parse(" https://example.com ").unwrap();
    /// assert_eq!(seed.as_str(), "https://example.com");
    ///
    /// assert!(TaskSeed::parse("ftp://example.com").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        check_seed(input).map_err(|reason| ValidationError {
            input: input.to_string(),
            reason,
        })?;

        Ok(Self(input.trim().to_string()))
    }

    /// Returns the seed as submitted
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the absolute form of the seed (`http://` added if no scheme was given)
    pub fn to_url(&self) -> UrlResult<Url> {
        validator::absolute_url(&self.0)
    }
}

impl fmt::Display for TaskSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskSeed {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
