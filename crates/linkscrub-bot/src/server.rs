//! Webhook server: receives Telegram updates, scrubs URLs, redelivers.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use linkscrub_core::config::ScrubConfig;
use linkscrub_core::pipeline;
use linkscrub_core::probe::CurlProbe;
use linkscrub_core::rules::RuleStore;

use crate::gate::{self, GateDecision};
use crate::telegram::{escape_html, Message, TelegramClient, Update};

/// Per-process state handed to every webhook call.
pub struct AppState {
    pub cfg: ScrubConfig,
    pub rules: RuleStore,
    pub probe: CurlProbe,
    pub client: TelegramClient,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(cfg: ScrubConfig, client: TelegramClient) -> Result<()> {
    let addr = cfg.listen_addr.clone();
    let state = Arc::new(AppState {
        rules: cfg.rule_store(),
        probe: cfg.probe(),
        cfg,
        client,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app(state))
        .await
        .context("server stopped")
}

async fn liveness() -> &'static str {
    "linkscrub is running\n"
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(update): Json<Update>,
) -> (StatusCode, Json<serde_json::Value>) {
    match handle_update(&state, update).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))),
        Err(err) => {
            tracing::error!("webhook failed: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false })),
            )
        }
    }
}

async fn handle_update(state: &Arc<AppState>, update: Update) -> Result<()> {
    // Non-message updates and non-text messages are acknowledged silently.
    let Some(message) = update.message() else {
        return Ok(());
    };
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    let decision = gate::gate(message, &state.cfg.allowed_users, &state.cfg.allowed_groups);
    if decision == GateDecision::Ignore {
        return Ok(());
    }

    let scrubbed = {
        let state = Arc::clone(state);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            pipeline::scrub_text(&text, &state.rules, &state.probe, state.cfg.max_hops)
        })
        .await
        .context("scrub task panicked")?
    };
    // Untouched text means nothing to redeliver.
    let Some(cleaned) = scrubbed else {
        return Ok(());
    };

    match decision {
        GateDecision::Private => deliver_private(state, message, &cleaned).await,
        GateDecision::Group => deliver_group(state, message, &cleaned).await,
        GateDecision::Ignore => Ok(()),
    }
}

async fn deliver_private(state: &AppState, message: &Message, cleaned: &str) -> Result<()> {
    let from = message.from.as_ref().context("gated message lost its sender")?;
    match state.cfg.target_group_id {
        Some(group) => {
            let text = format!(
                "Forwarded from {}:\n\n{}",
                from.html_mention(),
                escape_html(cleaned)
            );
            state.client.send_message(group, &text, Some("HTML")).await?;
            state
                .client
                .send_message(message.chat.id, "Processed and sent to group.", None)
                .await?;
        }
        None => {
            state
                .client
                .send_message(message.chat.id, cleaned, None)
                .await?;
        }
    }
    Ok(())
}

async fn deliver_group(state: &AppState, message: &Message, cleaned: &str) -> Result<()> {
    let from = message.from.as_ref().context("gated message lost its sender")?;
    let text = format!("{}:\n{}", from.html_mention(), escape_html(cleaned));
    state
        .client
        .send_message(message.chat.id, &text, Some("HTML"))
        .await?;

    // Deletion needs admin rights the bot may not have; not fatal.
    if let Err(err) = state
        .client
        .delete_message(message.chat.id, message.message_id)
        .await
    {
        tracing::warn!("could not delete original message: {err:#}");
    }
    Ok(())
}
