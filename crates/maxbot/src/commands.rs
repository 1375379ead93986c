// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maxbot subscriptions` and `maxbot config`.

use std::fmt::Write as _;

use clap::Subcommand;
use maxbot_client::MaxApi;
use maxbot_config::MaxbotConfig;
use maxbot_core::MaxbotError;
use maxbot_core::types::requests::Subscription;

/// Placeholder printed instead of the bot token.
const REDACTED: &str = "[REDACTED]";

#[derive(Subcommand, Debug)]
pub enum SubscriptionAction {
    /// List registered webhook subscriptions.
    List,
    /// Subscribe a webhook URL.
    Add {
        url: String,
        /// Update type to deliver. Repeat for several; omit for all.
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,
    },
    /// Remove the subscription of a webhook URL.
    Remove { url: String },
}

pub async fn run_subscriptions(
    config: &MaxbotConfig,
    action: SubscriptionAction,
) -> Result<(), MaxbotError> {
    let api = MaxApi::from_config(config)?;
    let output = execute_subscriptions(&api, action).await?;
    print!("{output}");
    Ok(())
}

async fn execute_subscriptions(
    api: &MaxApi,
    action: SubscriptionAction,
) -> Result<String, MaxbotError> {
    let subscriptions = api.subscriptions();
    match action {
        SubscriptionAction::List => Ok(format_subscriptions(&subscriptions.list().await?)),
        SubscriptionAction::Add { url, types } => {
            let result = subscriptions.subscribe(&url, &types).await?;
            Ok(format_result("subscribed", &url, result.success, result.message))
        }
        SubscriptionAction::Remove { url } => {
            let result = subscriptions.unsubscribe(&url).await?;
            Ok(format_result("unsubscribed", &url, result.success, result.message))
        }
    }
}

fn format_subscriptions(list: &[Subscription]) -> String {
    if list.is_empty() {
        return "no subscriptions\n".to_string();
    }
    let mut out = String::new();
    for sub in list {
        let types = match &sub.update_types {
            Some(types) if !types.is_empty() => types.join(","),
            _ => "all".to_string(),
        };
        let _ = writeln!(out, "{}\ttypes={}\tsince={}", sub.url, types, sub.time);
    }
    out
}

fn format_result(verb: &str, url: &str, success: bool, message: Option<String>) -> String {
    match (success, message) {
        (true, _) => format!("{verb} {url}\n"),
        (false, Some(message)) => format!("not {verb} {url}: {message}\n"),
        (false, None) => format!("not {verb} {url}\n"),
    }
}

/// The resolved configuration as TOML, with the token redacted.
pub fn render_config(config: &MaxbotConfig) -> Result<String, MaxbotError> {
    let mut redacted = config.clone();
    if redacted.api.token.is_some() {
        redacted.api.token = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&redacted)
        .map_err(|e| MaxbotError::Config(format!("failed to render configuration: {e}")))
}
