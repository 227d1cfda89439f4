// ghcms - Request backoff and read-through caching for a Git-hosting CMS backend
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod github;
pub mod http;
pub mod metrics;
pub mod naming;
pub mod preview;
pub mod sync;
pub mod utils;
