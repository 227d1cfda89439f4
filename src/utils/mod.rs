//! Utility functions and helpers for ghcms.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and token sanitizing for log output.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
