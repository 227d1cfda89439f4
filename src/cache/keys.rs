// Cache key naming. These strings are shared with other clients of the same
// store and must not change.
// Author: kelexine (https://github.com/kelexine)

pub const CACHE_NAMESPACE: &str = "gh";

/// `gh.<id>`
pub fn text_key(id: &str) -> String {
    format!("{}.{}", CACHE_NAMESPACE, id)
}

/// `gh.<id>.blob`
pub fn blob_key(id: &str) -> String {
    format!("{}.{}.blob", CACHE_NAMESPACE, id)
}

/// `gh.<id>.meta`
pub fn metadata_key(id: &str) -> String {
    format!("{}.{}.meta", CACHE_NAMESPACE, id)
}

pub fn file_key(id: &str, is_text: bool) -> String {
    if is_text {
        text_key(id)
    } else {
        blob_key(id)
    }
}
