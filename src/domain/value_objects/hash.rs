//! Hash Value Objects
//!
//! Three hashes flow through a deploy:
//!
//! - `RevisionHash` names a release directory (`code/{hash}`)
//! - `StaticHash` names a content-addressed static link (`{prefix}{hash}`)
//! - `ContentHash` is the SHA-256 of a single file, used for checksum sync
//!
//! Revision and static hashes come from version control and are opaque to
//! the engine, but they end up as path components, so both are validated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as a hash identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("hash is empty")]
    Empty,
    #[error("hash '{0}' contains characters not allowed in a path component")]
    InvalidCharacters(String),
    #[error("hash '{0}' may not start with '.'")]
    LeadingDot(String),
}

fn validate_component(raw: &str) -> Result<String, HashError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HashError::Empty);
    }
    if trimmed.starts_with('.') {
        return Err(HashError::LeadingDot(trimmed.to_string()));
    }
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid {
        return Err(HashError::InvalidCharacters(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Identifier of a code revision, used verbatim as the release directory name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionHash(String);

impl RevisionHash {
    /// Parse a revision hash; surrounding whitespace (e.g. from `git log`) is dropped
    pub fn parse(raw: &str) -> Result<Self, HashError> {
        validate_component(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RevisionHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RevisionHash> for String {
    fn from(value: RevisionHash) -> Self {
        value.0
    }
}

impl AsRef<str> for RevisionHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a static-asset tree version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StaticHash(String);

impl StaticHash {
    pub fn parse(raw: &str) -> Result<Self, HashError> {
        validate_component(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the content-addressed link for this version
    pub fn link_name(&self, cache_prefix: &str) -> String {
        format!("{}{}", cache_prefix, self.0)
    }
}

impl fmt::Display for StaticHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StaticHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StaticHash> for String {
    fn from(value: StaticHash) -> Self {
        value.0
    }
}

/// SHA-256 of file content, formatted `sha256:<hex>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub const PREFIX: &'static str = "sha256:";

    pub fn from_bytes(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Hash a file by streaming it through the digest
    pub fn from_file(path: &std::path::Path) -> std::io::Result<Self> {
        use sha2::{Digest, Sha256};
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        Ok(Self(format!("{}{:x}", Self::PREFIX, hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
