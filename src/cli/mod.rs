// CLI module for ghcms
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;

/// ghcms - read repository files through the backoff dispatcher and content cache
#[derive(Parser, Debug)]
#[command(name = "ghcms", version, about, long_about = None)]
pub struct Args {
    /// Repository as `owner/name`
    #[arg(long)]
    pub repo: String,

    /// File path inside the repository
    #[arg(long)]
    pub path: String,

    /// Branch, tag or commit to read from
    #[arg(long = "git-ref", default_value = "main")]
    pub git_ref: String,

    /// Read the file as binary and print its size instead of its text
    #[arg(long)]
    pub binary: bool,

    /// Print the last author and change date instead of the content
    #[arg(long)]
    pub meta: bool,

    /// Print the deploy preview status for this context on `--git-ref`
    #[arg(long)]
    pub preview_context: Option<String>,

    /// Access token (overrides the config file)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Keep the cache in memory for this run only
    #[arg(long)]
    pub no_persist: bool,

    /// Dump Prometheus metrics to stderr before exiting
    #[arg(long)]
    pub metrics: bool,
}
