// GitHub repository access built on the dispatcher and the content cache
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::RepoClient;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Entry returned by the contents API for a single file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// Response of the git blobs API
#[derive(Debug, Deserialize)]
pub struct BlobResponse {
    pub sha: String,
    pub content: String,
    pub encoding: String,
}

/// Subset of the commits API response used for file metadata
#[derive(Debug, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
    pub author: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub author: CommitSignature,
}

#[derive(Debug, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UserRef {
    pub login: String,
}
