//! Issue keys linking local scenarios to remote catalog records
//!
//! An issue key is the sync join key. It is carried on a scenario as a tag
//! of the form `@PROJ-123`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ISSUE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*-[0-9]+$").expect("issue key pattern is valid"));

/// External issue identifier such as `ABC-123`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    /// Extract an issue key from a scenario tag (`@ABC-1` → `ABC-1`)
    ///
    /// Returns `None` for tags that do not carry a key.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.strip_prefix('@').and_then(|raw| raw.parse().ok())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for IssueKey {
    type Err = InvalidIssueKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if ISSUE_KEY.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidIssueKey(s.to_string()))
        }
    }
}

impl TryFrom<String> for IssueKey {
    type Error = InvalidIssueKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> Self {
        key.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rejected issue key text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an issue key: '{0}'")]
pub struct InvalidIssueKey(pub String);
