// Repository client: file reads through the backoff dispatcher and the cache
// Author: kelexine (https://github.com/kelexine)

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use tracing::debug;

use super::{BlobResponse, CommitEntry, ContentEntry};
use crate::cache::{ContentCache, FileContent, FileMetadata};
use crate::dispatch::Api;
use crate::error::{ApiError, Result};
use crate::http::ApiRequest;
use crate::preview::{get_preview_status, PreviewStatus};

/// Reads files of one repository (`owner/name`).
///
/// File bodies and metadata are cached by blob SHA, so a file is only
/// downloaded again after its content changes.
#[derive(Clone)]
pub struct RepoClient {
    api: Api,
    cache: ContentCache,
    repo: String,
}

impl RepoClient {
    pub fn new(api: Api, cache: ContentCache, repo: impl Into<String>) -> Self {
        Self {
            api,
            cache,
            repo: repo.into(),
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    fn repo_url(&self, path: &str) -> String {
        format!("/repos/{}/{}", self.repo, path.trim_start_matches('/'))
    }

    /// Look up the contents entry (and blob SHA) of a file at `git_ref`.
    pub async fn file_info(&self, path: &str, git_ref: &str) -> Result<ContentEntry> {
        let request = ApiRequest::new(self.repo_url(&format!("contents/{}", path.trim_start_matches('/'))))
            .param("ref", git_ref);
        let entry: ContentEntry = self.api.request_json(request).await?;
        if entry.entry_type != "file" {
            return Err(ApiError::Fetch(format!("{} is a {}, not a file", path, entry.entry_type)));
        }
        Ok(entry)
    }

    /// Read a file, serving it from the cache when its blob was seen before.
    pub async fn read_file(&self, path: &str, git_ref: &str, is_text: bool) -> Result<FileContent> {
        let entry = self.file_info(path, git_ref).await?;
        debug!("{} resolved to blob {}", entry.path, entry.sha);
        self.cache
            .read_file(Some(entry.sha.as_str()), || self.fetch_blob(&entry.sha, is_text), is_text)
            .await
    }

    /// Last author and change date of a file, cached by blob SHA.
    pub async fn read_file_metadata(&self, path: &str, git_ref: &str) -> Result<FileMetadata> {
        let entry = self.file_info(path, git_ref).await?;
        self.cache
            .read_file_metadata(&entry.sha, || self.fetch_metadata(path, git_ref))
            .await
    }

    /// Download and decode a blob.
    pub async fn fetch_blob(&self, sha: &str, is_text: bool) -> Result<FileContent> {
        let blob: BlobResponse = self
            .api
            .request_json(self.repo_url(&format!("git/blobs/{}", sha)))
            .await?;
        if blob.encoding != "base64" {
            return Err(ApiError::Fetch(format!(
                "Unsupported blob encoding {} for {}",
                blob.encoding, blob.sha
            )));
        }

        // GitHub wraps base64 content at 60 columns
        let encoded: String = blob.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ApiError::Fetch(format!("Invalid base64 in blob {}: {}", blob.sha, e)))?;

        if is_text {
            let text = String::from_utf8(bytes)
                .map_err(|e| ApiError::Fetch(format!("Blob {} is not UTF-8: {}", blob.sha, e)))?;
            Ok(FileContent::Text(text))
        } else {
            Ok(FileContent::Blob(Bytes::from(bytes)))
        }
    }

    /// Author and date of the latest commit touching `path` on `git_ref`.
    pub async fn fetch_metadata(&self, path: &str, git_ref: &str) -> Result<FileMetadata> {
        let request = ApiRequest::new(self.repo_url("commits"))
            .param("path", path)
            .param("sha", git_ref)
            .param("per_page", "1");
        let commits: Vec<CommitEntry> = self.api.request_json(request).await?;
        let latest = commits
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Fetch(format!("No commits found for {}", path)))?;

        debug!("Latest commit for {} is {}", path, latest.sha);
        Ok(FileMetadata {
            author: latest
                .author
                .map(|user| user.login)
                .unwrap_or(latest.commit.author.name),
            updated_on: latest.commit.author.date,
        })
    }

    /// Deploy preview status reported on `git_ref` under `context`.
    pub async fn preview_status(&self, git_ref: &str, context: &str) -> Result<Option<PreviewStatus>> {
        let statuses: Vec<PreviewStatus> = self
            .api
            .request_json(self.repo_url(&format!("commits/{}/statuses", git_ref)))
            .await?;
        Ok(get_preview_status(&statuses, context).cloned())
    }
}
