/// 自动过码平台客户端
///
/// 封装提交验证码和查询进度两个接口
use crate::error::VerifyError;
use crate::models::{CaptchaChallenge, CaptchaStatus};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 过码平台接口
#[async_trait]
pub trait CaptchaApi: Send + Sync {
    /// 提交验证码参数，返回平台分配的 uuid
    async fn submit(&self, challenge: &CaptchaChallenge) -> Result<String, VerifyError>;

    /// 按 uuid 查询过码进度
    async fn check(&self, uuid: &str) -> Result<CaptchaStatus, VerifyError>;
}

/// 过码平台 HTTP 客户端
pub struct CaptchaClient {
    http: reqwest::Client,
    base_url: String,
}

impl CaptchaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, VerifyError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("pcrjjc2/1.0.0")
            .build()
            .map_err(VerifyError::failed)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)], timeout: Option<Duration>) -> Result<Value, VerifyError> {
        let mut request = self.http.get(url).query(query);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let body = request
            .send()
            .await
            .map_err(VerifyError::failed)?
            .bytes()
            .await
            .map_err(VerifyError::failed)?;

        // 平台的 Content-Type 不可靠，按字节解析
        serde_json::from_slice(&body).map_err(VerifyError::failed)
    }
}

#[async_trait]
impl CaptchaApi for CaptchaClient {
    async fn submit(&self, challenge: &CaptchaChallenge) -> Result<String, VerifyError> {
        let url = format!("{}/geetest_renew", self.base_url);
        let query = [
            ("captcha_type", "1"),
            ("challenge", challenge.challenge.as_str()),
            ("gt", challenge.gt.as_str()),
            ("userid", challenge.userid.as_str()),
            ("gs", "1"),
        ];

        let data = self.get_json(&url, &query, Some(Duration::from_secs(5))).await?;
        debug!("过码提交结果: {}", data);

        match data.get("uuid") {
            Some(Value::String(uuid)) if !uuid.is_empty() => Ok(uuid.clone()),
            Some(Value::Number(uuid)) => Ok(uuid.to_string()),
            _ => Err(VerifyError::failed(format!("提交后未返回 uuid: {}", data))),
        }
    }

    async fn check(&self, uuid: &str) -> Result<CaptchaStatus, VerifyError> {
        let url = format!("{}/check/{}", self.base_url, uuid);
        let data = self.get_json(&url, &[], None).await?;
        debug!("过码进度: {}", data);
        Ok(CaptchaStatus::from_json(&data))
    }
}
