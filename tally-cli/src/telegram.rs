//! Minimal Telegram Bot API client: long-poll `getUpdates` and `sendMessage`
//! with reply keyboards.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tally_core::{Controls, ConversationId, MessagingGateway, Reply};

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    /// Absent for stickers, photos and other non-text messages
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    /// `{api_base}/bot{token}`; never logged
    endpoint: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str, poll_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(poll_timeout + Duration::from_secs(15))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        })
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        #[derive(Serialize)]
        struct Req {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            timeout: u64,
            allowed_updates: [&'static str; 1],
        }

        self.call(
            "getUpdates",
            &Req {
                offset,
                timeout: timeout_secs,
                allowed_updates: ["message"],
            },
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str, markup: Option<Value>) -> Result<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            chat_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<Value>,
        }

        let _: Message = self
            .call(
                "sendMessage",
                &Req {
                    chat_id,
                    text,
                    reply_markup: markup,
                },
            )
            .await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> Result<T> {
        let resp = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("telegram {method} request"))?;

        let status = resp.status();
        let out: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("parse telegram {method} response ({status})"))?;

        parse_response(method, out)
    }
}

fn parse_response<T>(method: &str, out: ApiResponse<T>) -> Result<T> {
    if !out.ok {
        bail!(
            "telegram {method} failed: {} {}",
            out.error_code.unwrap_or_default(),
            out.description.unwrap_or_default()
        );
    }
    out.result
        .with_context(|| format!("telegram {method} returned no result"))
}

/// Render a controls hint as a Bot API `reply_markup` object.
pub fn reply_markup(controls: &Controls) -> Option<Value> {
    match controls {
        Controls::Keep => None,
        Controls::Clear => Some(json!({ "remove_keyboard": true })),
        Controls::Options { .. } => {
            let keyboard: Vec<Vec<Value>> = controls
                .rows()
                .unwrap_or_default()
                .into_iter()
                .map(|row| row.into_iter().map(|text| json!({ "text": text })).collect())
                .collect();
            Some(json!({ "keyboard": keyboard, "resize_keyboard": true }))
        }
    }
}

#[async_trait]
impl MessagingGateway for TelegramClient {
    async fn send(&self, conversation: ConversationId, reply: &Reply) -> Result<()> {
        self.send_message(conversation.0, &reply.text, reply_markup(&reply.controls))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_for_kind_keyboard() {
        let markup = reply_markup(&Reply::greeting().controls).unwrap();
        assert_eq!(
            markup,
            json!({
                "keyboard": [[{ "text": "доход" }, { "text": "расход" }]],
                "resize_keyboard": true
            })
        );
    }

    #[test]
    fn test_markup_clear_and_keep() {
        assert_eq!(
            reply_markup(&Controls::Clear),
            Some(json!({ "remove_keyboard": true }))
        );
        assert_eq!(reply_markup(&Controls::Keep), None);
    }

    #[test]
    fn test_parse_updates_payload() {
        let raw = json!({
            "ok": true,
            "result": [
                { "update_id": 7, "message": { "message_id": 1, "chat": { "id": 99, "type": "private" }, "text": "доход" } },
                { "update_id": 8, "message": { "message_id": 2, "chat": { "id": 99, "type": "private" }, "sticker": {} } },
                { "update_id": 9, "edited_message": {} }
            ]
        });
        let out: ApiResponse<Vec<Update>> = serde_json::from_value(raw).unwrap();
        let updates = parse_response("getUpdates", out).unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("доход"));
        assert!(updates[1].message.as_ref().unwrap().text.is_none());
        assert!(updates[2].message.is_none());
    }

    #[test]
    fn test_api_error_surfaces_description() {
        let raw = json!({ "ok": false, "error_code": 401, "description": "Unauthorized" });
        let out: ApiResponse<Vec<Update>> = serde_json::from_value(raw).unwrap();
        let err = parse_response("getUpdates", out).unwrap_err();
        assert!(err.to_string().contains("401 Unauthorized"));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let c = TelegramClient::new("http://localhost:8081/", "123:abc", Duration::from_secs(1)).unwrap();
        assert_eq!(c.endpoint, "http://localhost:8081/bot123:abc");
    }
}
