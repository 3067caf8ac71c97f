//! PC-advisor chat backed by a Gemini-style `generateContent` endpoint.
//!
//! Upstream failures never become HTTP errors: the response carries
//! `success: false` and a message instead.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ChatConfig;
use crate::db::{now_timestamp, ChatMessage, ChatRequest, ChatResponse, ChatTurn, DbPool};

/// Number of stored exchanges returned by [`ChatClient::history`]
pub const HISTORY_LIMIT: i64 = 50;

const ADVISOR_PREAMBLE: &str = "\
Bạn là chuyên gia tư vấn cấu hình PC và linh kiện máy tính lâu năm, am hiểu CPU, GPU, RAM, \
SSD, HDD, PSU, mainboard, case, tản nhiệt, màn hình và gear.
Bạn nắm rõ máy gaming, workstation, cấu hình giá rẻ và cao cấp, ép xung, độ tương thích \
giữa các linh kiện và hiệu năng thực tế.
Luôn trả lời bằng tiếng Việt, chuyên nghiệp và dễ hiểu.
Cách trả lời: một câu chào ngắn, sau đó đi thẳng vào vấn đề với tối đa 6 gạch đầu dòng.
Nếu câu hỏi không liên quan tới PC hoặc không thể trả lời đầy đủ trong giới hạn, chỉ trả lời \
đúng câu: 'Nội dung này không thể trả lời cho user'.
Khi được nhờ build PC, liệt kê cấu hình đề xuất gồm CPU, Mainboard, RAM, GPU, SSD, PSU, \
Case/Tản nhiệt và giá ước tính.
";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chưa cấu hình API key cho dịch vụ AI (chat.api_key)")]
    MissingApiKey,

    #[error("Tin nhắn không được để trống")]
    EmptyMessage,

    #[error("Lỗi kết nối tới dịch vụ AI: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dịch vụ AI trả về lỗi {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Phản hồi từ AI không có nội dung")]
    EmptyReply,
}

pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
    db: DbPool,
}

impl ChatClient {
    pub fn new(config: ChatConfig, db: DbPool) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config, db })
    }

    /// Answer a chat message. Failures are reported inside the response.
    pub async fn chat(&self, req: ChatRequest) -> ChatResponse {
        let message = req.message.clone().unwrap_or_default();

        match self.ask(&message, &req.chat_history).await {
            Ok(reply) => {
                info!(
                    "Chat request processed for user {}",
                    req.user_id.as_deref().unwrap_or("anonymous")
                );
                self.store_exchange(req.user_id.as_deref(), &message, &reply)
                    .await;
                ChatResponse {
                    message,
                    response: reply,
                    user_id: req.user_id,
                    timestamp: now_timestamp(),
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                ChatResponse {
                    message,
                    response: String::new(),
                    user_id: req.user_id,
                    timestamp: now_timestamp(),
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn ask(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ChatError::MissingApiKey)?;
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let url = format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(history, message) }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        let payload: Value = response.json().await?;
        extract_text(&payload).ok_or(ChatError::EmptyReply)
    }

    /// Persist a successful exchange. Storage failures are only logged.
    async fn store_exchange(&self, user_id: Option<&str>, message: &str, reply: &str) {
        let user_id: Option<i64> = user_id.and_then(|id| id.trim().parse().ok());

        let result = sqlx::query(
            "INSERT INTO chat_messages (user_id, message, response, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(message)
        .bind(reply)
        .bind(now_timestamp())
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            error!("Failed to store chat message: {}", e);
        }
    }

    /// Latest stored exchanges, newest first, optionally for one user
    pub async fn history(&self, user_id: Option<i64>) -> Result<Vec<ChatMessage>, sqlx::Error> {
        match user_id {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT * FROM chat_messages WHERE user_id = ? ORDER BY id DESC LIMIT ?",
                )
                .bind(user_id)
                .bind(HISTORY_LIMIT)
                .fetch_all(&self.db)
                .await
            }
            None => {
                sqlx::query_as("SELECT * FROM chat_messages ORDER BY id DESC LIMIT ?")
                    .bind(HISTORY_LIMIT)
                    .fetch_all(&self.db)
                    .await
            }
        }
    }
}

/// Full prompt: advisor preamble, prior turns, then the new message
pub fn build_prompt(history: &[ChatTurn], message: &str) -> String {
    let mut prompt = String::from(ADVISOR_PREAMBLE);
    prompt.push('\n');

    if !history.is_empty() {
        prompt.push_str("Lịch sử cuộc trò chuyện:\n");
        for turn in history {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("Người dùng: {}\n", message));
    prompt
}

/// Reply text at `candidates[0].content.parts[0].text`
pub fn extract_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(String::from)
}
