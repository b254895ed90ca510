//! # Jobcast
//! CI notification step: composes a status message for a finished workflow
//! job and delivers it to a Slack incoming webhook.
//!
//! Inputs arrive through the GitHub Actions mechanism (`INPUT_*` variables
//! plus `SLACK_WEBHOOK_URL` and `GITHUB_JOB`). Without a webhook URL the run
//! logs a skip and succeeds; any other failure sets a failed run status.

use anyhow::Result;
use jobcast_core::config::{NotifyConfig, SlackInfo, load_yaml_or_default};
use jobcast_core::github::ActionContext;
use jobcast_core::steps::{decode_steps, filter_steps};
use jobcast_slack::{JobNotification, SlackWebhook};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        // workflow error annotation, then a failing exit status
        println!("::error::{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let ctx = ActionContext::from_env()?;

    let mut config: NotifyConfig = load_yaml_or_default(&ctx.config_path, "config");
    let slack_info: SlackInfo = load_yaml_or_default(&ctx.slack_info_path, "slack info");
    config.show_author = ctx.show_author;

    let outcomes = decode_steps(&ctx.steps_json)?;
    let steps = filter_steps(outcomes, &config.filter.steps);

    let Some(url) = &ctx.webhook_url else {
        tracing::info!("No SLACK_WEBHOOK_URL secret configured. Skip.");
        return Ok(());
    };

    let notification = JobNotification {
        job_name: ctx.job_name.clone(),
        status: ctx.status.clone(),
        steps,
        channel: ctx.channel.clone(),
        message: ctx.message.clone(),
    };
    SlackWebhook::new(url).send(&notification, &config, &slack_info).await?;
    tracing::debug!("Sent to Slack.");
    Ok(())
}
