//! Telegram Bot API types and client.
//!
//! Plain `reqwest` against the Bot API; no bot-framework crate. The bot
//! token comes from the environment, never from the config file.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "LINKSCRUB_BOT_TOKEN";

/// Incoming webhook payload (the subset this bot acts on).
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
}

impl Update {
    /// The message this update carries, edited or not.
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref().or(self.edited_message.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// "First Last (@username)", each part HTML-escaped.
    pub fn display_name(&self) -> String {
        let mut name = escape_html(&self.first_name);
        if let Some(last) = self.last_name.as_deref().filter(|s| !s.is_empty()) {
            name.push(' ');
            name.push_str(&escape_html(last));
        }
        if let Some(username) = self.username.as_deref().filter(|s| !s.is_empty()) {
            name.push_str(&format!(" (@{})", escape_html(username)));
        }
        name
    }

    /// Bold profile link in Telegram's HTML dialect.
    pub fn html_mention(&self) -> String {
        format!(
            "<b><a href=\"tg://user?id={}\">{}</a></b>",
            self.id,
            self.display_name()
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Thin Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Reads the bot token from [`TOKEN_ENV`].
    pub fn from_env() -> Result<Self> {
        let token =
            std::env::var(TOKEN_ENV).with_context(|| format!("{TOKEN_ENV} is not set"))?;
        Ok(Self::new(token))
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.token, method)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;
        let status = resp.status();
        let value: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("telegram {method} returned a non-JSON body"))?;
        if !status.is_success() || value["ok"].as_bool() != Some(true) {
            let desc = value["description"].as_str().unwrap_or("unknown error");
            anyhow::bail!("telegram {method} failed ({status}): {desc}");
        }
        Ok(value)
    }

    /// Validates the token and returns the bot username.
    pub async fn get_me(&self) -> Result<String> {
        let value = self.call("getMe", serde_json::json!({})).await?;
        Ok(value["result"]["username"]
            .as_str()
            .unwrap_or("unknown")
            .to_string())
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<()> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = serde_json::json!(mode);
        }
        self.call("sendMessage", body).await.map(|_| ())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        self.call(
            "deleteMessage",
            serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
            }),
        )
        .await
        .map(|_| ())
    }

    /// Points the Bot API at `url` for message and edited-message updates.
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        self.call(
            "setWebhook",
            serde_json::json!({
                "url": url,
                "allowed_updates": ["message", "edited_message"],
            }),
        )
        .await
        .map(|_| ())
    }
}
