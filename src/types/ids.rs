//! Newtype wrappers for domain identifiers.
//!
//! These types keep commit ids and remote names from being mixed up with
//! arbitrary strings flowing through the git adapter.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a valid hex commit id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid SHA: {0:?}")]
pub struct InvalidSha(pub String);

/// A git commit SHA (40 or 64 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha(String);

impl Sha {
    /// Parses a full-length hex SHA, ignoring surrounding whitespace.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, InvalidSha> {
        let s = s.as_ref().trim();
        let valid_len = s.len() == 40 || s.len() == 64;
        if valid_len && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Sha(s.to_ascii_lowercase()))
        } else {
            Err(InvalidSha(s.to_string()))
        }
    }

    /// Returns the SHA as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short (7-character) version of the SHA for display.
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for Sha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two remotes a feature branch can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKind {
    /// The shared upstream repository.
    Origin,
    /// The operator's personal fork of `origin`.
    Fork,
}

impl RemoteKind {
    /// The git remote name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RemoteKind::Origin => "origin",
            RemoteKind::Fork => "fork",
        }
    }

    pub fn is_fork(&self) -> bool {
        matches!(self, RemoteKind::Fork)
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(RemoteKind::Origin),
            "fork" => Ok(RemoteKind::Fork),
            other => Err(other.to_string()),
        }
    }
}
