//! GitHub Actions runner environment.
//!
//! Action inputs arrive as `INPUT_<NAME>` environment variables. Everything
//! the run needs is collected once, up front, into an [`ActionContext`] that
//! is passed down instead of reading the environment ad hoc.

use crate::error::{JobcastError, Result};

/// Everything jobcast reads from the runner environment.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Path to the filter/display YAML config (`config` input).
    pub config_path: String,
    /// Path to the Slack presentation YAML (`slack_info` input).
    pub slack_info_path: String,
    /// Upper-cased job status (`status` input, required).
    pub status: String,
    /// JSON-encoded step outcomes (`steps` input), `{}` when absent.
    pub steps_json: String,
    /// Target channel override (`channel` input), empty when absent.
    pub channel: String,
    /// Message override (`message` input), empty when absent.
    pub message: String,
    /// Whether to attach author metadata (`show_author` input, `"true"` only).
    pub show_author: bool,
    /// Destination webhook (`SLACK_WEBHOOK_URL`). `None` means skip sending.
    pub webhook_url: Option<String>,
    /// Job identifier (`GITHUB_JOB`).
    pub job_name: String,
}

impl ActionContext {
    /// Collect inputs from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Collect inputs through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let input = |name: &str| -> Option<String> {
            lookup(&input_var(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let status = input("status")
            .ok_or_else(|| JobcastError::Input("Required input 'status' is missing".into()))?;

        Ok(Self {
            config_path: input("config").unwrap_or_default(),
            slack_info_path: input("slack_info").unwrap_or_default(),
            status: status.to_uppercase(),
            steps_json: input("steps").unwrap_or_else(|| "{}".into()),
            channel: input("channel").unwrap_or_default(),
            message: input("message").unwrap_or_default(),
            show_author: input("show_author").as_deref() == Some("true"),
            webhook_url: lookup("SLACK_WEBHOOK_URL").filter(|v| !v.is_empty()),
            job_name: lookup("GITHUB_JOB").unwrap_or_default(),
        })
    }
}

/// Environment variable name carrying the given action input.
fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}
