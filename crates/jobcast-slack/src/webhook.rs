//! Slack webhook channel — composes the status attachment and sends it.

use jobcast_core::config::{NotifyConfig, SlackInfo};
use jobcast_core::error::{JobcastError, Result};
use jobcast_core::steps::StepOutcomes;
use serde::Serialize;

/// One job's worth of status to report.
#[derive(Debug, Clone)]
pub struct JobNotification {
    pub job_name: String,
    /// Upper-cased status string (SUCCESS, FAILURE, CANCELLED, ...).
    pub status: String,
    /// Already filtered by the configured allow-list.
    pub steps: StepOutcomes,
    /// Channel override, empty to use the webhook's default.
    pub channel: String,
    /// Message override, empty to use the generated headline.
    pub message: String,
}

/// Incoming-webhook payload (legacy attachment schema).
#[derive(Debug, Serialize)]
struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<String>,
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    color: String,
    fallback: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<Field>,
    ts: i64,
}

#[derive(Debug, Serialize)]
struct Field {
    title: String,
    value: String,
    short: bool,
}

/// Slack attachment color for an upper-cased job status.
fn status_color(status: &str) -> &'static str {
    match status {
        "SUCCESS" => "good",
        "FAILURE" => "danger",
        "CANCELLED" => "warning",
        _ => "#808080",
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn build_payload(
    notification: &JobNotification,
    config: &NotifyConfig,
    info: &SlackInfo,
) -> Payload {
    let headline = if notification.job_name.is_empty() {
        notification.status.clone()
    } else {
        format!("{}: {}", notification.job_name, notification.status)
    };
    let text = non_empty(&notification.message).unwrap_or_else(|| headline.clone());

    let (author_name, author_icon) = if config.show_author {
        (info.username.clone(), info.icon_url.clone())
    } else {
        (None, None)
    };

    let fields = notification
        .steps
        .iter()
        .map(|(name, outcome)| Field {
            title: name.clone(),
            value: outcome.clone(),
            short: true,
        })
        .collect();

    Payload {
        channel: non_empty(&notification.channel),
        username: info.username.clone(),
        icon_url: info.icon_url.clone(),
        attachments: vec![Attachment {
            color: status_color(&notification.status).to_string(),
            fallback: headline,
            text,
            author_name,
            author_icon,
            footer: info.footer.clone(),
            fields,
            ts: chrono::Utc::now().timestamp(),
        }],
    }
}

/// Slack incoming-webhook sender. One POST per run, no retry.
pub struct SlackWebhook {
    url: String,
    client: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Compose the payload and POST it. A transport error or non-success
    /// response status fails the run.
    pub async fn send(
        &self,
        notification: &JobNotification,
        config: &NotifyConfig,
        info: &SlackInfo,
    ) -> Result<()> {
        let payload = build_payload(notification, config, info);
        tracing::debug!(
            "Posting status for job '{}' ({} steps)",
            notification.job_name,
            notification.steps.len()
        );

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| JobcastError::Webhook(format!("Slack webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobcastError::Webhook(format!(
                "Slack webhook returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn notification(steps: &[(&str, &str)]) -> JobNotification {
        JobNotification {
            job_name: "build-and-test".into(),
            status: "FAILURE".into(),
            steps: steps
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            channel: String::new(),
            message: String::new(),
        }
    }

    #[test]
    fn test_color_by_status() {
        assert_eq!(status_color("SUCCESS"), "good");
        assert_eq!(status_color("FAILURE"), "danger");
        assert_eq!(status_color("CANCELLED"), "warning");
        assert_eq!(status_color("TIMED_OUT"), "#808080");
    }

    #[test]
    fn test_payload_steps_become_fields_in_order() {
        let note = notification(&[("build", "success"), ("test", "failure")]);
        let payload = build_payload(&note, &NotifyConfig::default(), &SlackInfo::default());
        let json = serde_json::to_value(&payload).unwrap();
        let fields = json["attachments"][0]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["title"], "build");
        assert_eq!(fields[1]["title"], "test");
        assert_eq!(fields[1]["value"], "failure");
    }

    #[test]
    fn test_payload_channel_and_message_overrides() {
        let mut note = notification(&[]);
        note.channel = "#ci-alerts".into();
        note.message = "nightly run".into();
        let payload = build_payload(&note, &NotifyConfig::default(), &SlackInfo::default());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["channel"], "#ci-alerts");
        assert_eq!(json["attachments"][0]["text"], "nightly run");
        // fallback keeps the generated headline
        assert_eq!(json["attachments"][0]["fallback"], "build-and-test: FAILURE");
    }

    #[test]
    fn test_payload_defaults_omit_channel_and_author() {
        let payload = build_payload(
            &notification(&[]),
            &NotifyConfig::default(),
            &SlackInfo::default(),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("channel").is_none());
        assert!(json["attachments"][0].get("author_name").is_none());
        assert_eq!(json["attachments"][0]["text"], "build-and-test: FAILURE");
    }

    #[test]
    fn test_show_author_attaches_slack_info() {
        let info = SlackInfo {
            username: Some("ci-bot".into()),
            icon_url: Some("https://example.com/icon.png".into()),
            footer: Some("jobcast".into()),
        };
        let config = NotifyConfig {
            show_author: true,
            ..Default::default()
        };
        let note = notification(&[]);

        let json = serde_json::to_value(build_payload(&note, &config, &info)).unwrap();
        assert_eq!(json["attachments"][0]["author_name"], "ci-bot");
        assert_eq!(
            json["attachments"][0]["author_icon"],
            "https://example.com/icon.png"
        );
        assert_eq!(json["attachments"][0]["footer"], "jobcast");

        let config = NotifyConfig::default();
        let json = serde_json::to_value(build_payload(&note, &config, &info)).unwrap();
        assert!(json["attachments"][0].get("author_name").is_none());
        assert!(json["attachments"][0].get("author_icon").is_none());
    }

    /// Minimal one-shot HTTP server: reads the request, replies with the
    /// given status line, and returns what it read.
    async fn one_shot_server(
        listener: tokio::net::TcpListener,
        status_line: &'static str,
    ) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 64 * 1024];
        let mut total = 0;
        loop {
            let n = socket.read(&mut buf[total..]).await.unwrap();
            total += n;
            let text = String::from_utf8_lossy(&buf[..total]);
            if n == 0 || (text.contains("\r\n\r\n") && text.trim_end().ends_with('}')) {
                break;
            }
        }
        let response =
            format!("{status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok");
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&buf[..total]).to_string()
    }

    #[tokio::test]
    async fn test_send_posts_json_and_accepts_success() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(one_shot_server(listener, "HTTP/1.1 200 OK"));

        let hook = SlackWebhook::new(format!("http://{addr}/services/T/B/X"));
        let note = notification(&[("test", "failure")]);
        hook.send(&note, &NotifyConfig::default(), &SlackInfo::default())
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /services/T/B/X"));
        assert!(request.contains("\"test\""));
        assert!(request.contains("\"failure\""));
    }

    #[tokio::test]
    async fn test_send_fails_on_server_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(one_shot_server(listener, "HTTP/1.1 500 Internal Server Error"));

        let hook = SlackWebhook::new(format!("http://{addr}/"));
        let err = hook
            .send(
                &notification(&[]),
                &NotifyConfig::default(),
                &SlackInfo::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JobcastError::Webhook(_)));
        assert!(err.to_string().contains("500"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_fails_on_refused_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let hook = SlackWebhook::new(format!("http://{addr}/"));
        let err = hook
            .send(
                &notification(&[]),
                &NotifyConfig::default(),
                &SlackInfo::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JobcastError::Webhook(_)));
    }
}
