/// 企业微信 WebHook 客户端
///
/// 只负责把一条文本 POST 出去，排队与合并由 `Notifier` 处理
use crate::error::NotifyError;
use crate::utils::logging::truncate_text;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// 消息投递通道
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// 投递一条（可能已合并的）文本消息
    async fn deliver(&self, content: &str) -> Result<(), NotifyError>;
}

/// 企业微信机器人客户端
pub struct WorkWxClient {
    http: reqwest::Client,
    webhook: String,
}

impl WorkWxClient {
    pub fn new(webhook: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook: webhook.into(),
        }
    }

    /// 构建文本消息的请求体
    pub fn build_payload(content: &str) -> Value {
        json!({
            "msgtype": "text",
            "text": { "content": content },
        })
    }
}

#[async_trait]
impl MessageSink for WorkWxClient {
    async fn deliver(&self, content: &str) -> Result<(), NotifyError> {
        let payload = Self::build_payload(content);
        debug!("推送 WebHook 消息: {}", truncate_text(content, 200));

        let result: Value = self
            .http
            .post(&self.webhook)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        debug!("推送结果: {}", result);

        // 企业微信返回 {"errcode":0,"errmsg":"ok"}
        match result.get("errcode").and_then(|v| v.as_i64()) {
            Some(code) if code != 0 => Err(NotifyError::BadResponse {
                code,
                message: result
                    .get("errmsg")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            }),
            _ => Ok(()),
        }
    }
}
