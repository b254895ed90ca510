//! # Jobcast Slack
//! Slack incoming-webhook delivery: composes one attachment-style payload
//! from a job notification and POSTs it to the webhook URL.

pub mod webhook;

pub use webhook::{JobNotification, SlackWebhook};
