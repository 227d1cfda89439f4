// Deploy preview status lookup
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// State of a commit status, collapsed to what the editor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    Success,
    #[serde(other)]
    Other,
}

/// A commit status reported by a deploy integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewStatus {
    pub context: String,
    pub target_url: Option<String>,
    pub state: PreviewState,
}

/// First status whose context equals `preview_context`.
pub fn get_preview_status<'a>(
    statuses: &'a [PreviewStatus],
    preview_context: &str,
) -> Option<&'a PreviewStatus> {
    statuses
        .iter()
        .find(|status| status.context == preview_context)
}
