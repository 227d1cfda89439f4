// Branch and content-key naming for editorial workflow entries
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ApiError, Result};

/// Prefix of every branch the CMS creates for an unpublished entry.
pub const CMS_BRANCH_PREFIX: &str = "cms";

/// A content key split into its collection and slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentKey {
    pub collection: String,
    pub slug: String,
}

/// `<collection>/<slug>`
pub fn generate_content_key(collection: &str, slug: &str) -> String {
    format!("{}/{}", collection, slug)
}

/// Split at the first `/`. The slug may itself contain slashes.
pub fn parse_content_key(content_key: &str) -> Result<ContentKey> {
    let (collection, slug) = content_key
        .split_once('/')
        .ok_or_else(|| ApiError::InvalidContentKey(content_key.to_string()))?;

    Ok(ContentKey {
        collection: collection.to_string(),
        slug: slug.to_string(),
    })
}

/// `cms/<content key>`
pub fn branch_from_content_key(content_key: &str) -> String {
    format!("{}/{}", CMS_BRANCH_PREFIX, content_key)
}

/// Strip the `cms/` prefix. Branches without it are returned unchanged.
pub fn content_key_from_branch(branch: &str) -> &str {
    branch
        .strip_prefix(CMS_BRANCH_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(branch)
}

pub fn is_cms_branch(branch: &str) -> bool {
    branch
        .strip_prefix(CMS_BRANCH_PREFIX)
        .is_some_and(|rest| rest.starts_with('/'))
}
