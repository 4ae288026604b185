//! Split a catalog url (`owner/repo@ref`) into its repository key and owner.

use crate::error::LookupError;

/// `owner/repo` key used to join against the download index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoKey {
    key: String,
    owner_len: usize,
}

impl RepoKey {
    /// Full `owner/repo` key.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Segment before the first `/`.
    pub fn owner(&self) -> &str {
        &self.key[..self.owner_len]
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

/// Key is everything before the first `@`; owner is the key up to its first `/`.
/// A url without `@`, without `/` in the key, or with an empty owner or repo name is rejected.
pub fn parse_repo_key(url: Option<&str>) -> Result<RepoKey, LookupError> {
    let url = url.map(str::trim).filter(|u| !u.is_empty()).ok_or(LookupError::MissingUrl)?;
    let (key, _git_ref) = url
        .split_once('@')
        .ok_or_else(|| LookupError::MissingRef(url.to_string()))?;
    let (owner, repo) = key
        .split_once('/')
        .ok_or_else(|| LookupError::MalformedKey(url.to_string()))?;
    if owner.is_empty() || repo.is_empty() {
        return Err(LookupError::MalformedKey(url.to_string()));
    }
    Ok(RepoKey {
        key: key.to_string(),
        owner_len: owner.len(),
    })
}
