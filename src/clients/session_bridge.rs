/// 游戏会话服务客户端
///
/// 游戏 SDK 运行在独立的本地服务中，这里通过 JSON 接口驱动它登录和调用 API
use crate::error::SessionError;
use crate::infrastructure::{GameSession, LoginHooks};
use crate::models::{CaptchaChallenge, ProfileInfo, ProfileReply};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// 单次登录中最多接受的验证码轮数
const MAX_CAPTCHA_ROUNDS: usize = 3;

/// 账号信息
#[derive(Clone, Serialize)]
pub struct Account {
    pub platform: u8,
    pub channel: u8,
    pub account: String,
    pub password: String,
}

impl Account {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            platform: 2,
            channel: 1,
            account: account.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("platform", &self.platform)
            .field("channel", &self.channel)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// 登录接口响应
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LoginReply {
    Ok,
    Captcha(CaptchaChallenge),
    Error { message: String },
}

/// API 调用接口响应
#[derive(Debug, Deserialize)]
struct CallApiReply {
    data: Option<Value>,
    error: Option<String>,
    #[serde(default)]
    session_invalidated: bool,
}

/// 会话服务客户端
pub struct BridgeSession {
    http: reqwest::Client,
    base_url: String,
    account: Account,
    logged_in: bool,
}

impl BridgeSession {
    pub fn new(base_url: impl Into<String>, account: Account) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account,
            logged_in: false,
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Value, SessionError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        self.http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SessionError::transport(endpoint, e))?
            .json()
            .await
            .map_err(|e| SessionError::transport(endpoint, e))
    }

    async fn post_login<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<LoginReply, SessionError> {
        let value = self.post(endpoint, body).await?;
        serde_json::from_value(value).map_err(|e| SessionError::transport(endpoint, e))
    }

    /// 从 API 响应中解析用户信息
    fn parse_profile(reply: CallApiReply) -> Result<ProfileInfo, SessionError> {
        if let Some(message) = reply.error {
            return Err(if reply.session_invalidated {
                SessionError::Invalidated(message)
            } else {
                SessionError::from_message(message)
            });
        }
        let data = reply
            .data
            .ok_or_else(|| SessionError::Query("API 返回为空".to_string()))?;
        let profile: ProfileReply =
            serde_json::from_value(data).map_err(|e| SessionError::Query(format!("用户信息解析失败: {}", e)))?;
        Ok(profile.user_info)
    }
}

#[async_trait]
impl GameSession for BridgeSession {
    fn should_login(&self) -> bool {
        !self.logged_in
    }

    async fn login(&mut self, hooks: &dyn LoginHooks) -> Result<(), SessionError> {
        debug!("登录账号: {:?}", self.account);
        let mut reply = self.post_login("login", &self.account).await?;

        for _ in 0..MAX_CAPTCHA_ROUNDS {
            match reply {
                LoginReply::Ok => {
                    self.logged_in = true;
                    return Ok(());
                }
                LoginReply::Error { message } => {
                    hooks.report_error(&message).await;
                    return Err(SessionError::Login(message));
                }
                LoginReply::Captcha(challenge) => {
                    let token = hooks
                        .verify_captcha(challenge)
                        .await
                        .map_err(|e| SessionError::Login(e.to_string()))?;
                    reply = self.post_login("login/validate", &token).await?;
                }
            }
        }

        match reply {
            LoginReply::Ok => {
                self.logged_in = true;
                Ok(())
            }
            _ => Err(SessionError::Login("验证码次数过多".to_string())),
        }
    }

    async fn query_profile(&mut self, user_id: i64) -> Result<ProfileInfo, SessionError> {
        let body = json!({
            "api": "/profile/get_profile",
            "params": { "target_viewer_id": user_id },
        });
        let value = self.post("callapi", &body).await?;
        let reply: CallApiReply =
            serde_json::from_value(value).map_err(|e| SessionError::transport("callapi", e))?;

        let result = Self::parse_profile(reply);
        if matches!(result, Err(SessionError::Invalidated(_))) {
            self.logged_in = false;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(value: Value) -> CallApiReply {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_profile_success() {
        let profile = BridgeSession::parse_profile(reply(json!({
            "data": {"user_info": {"user_name": "佩可", "arena_rank": 12, "grand_arena_rank": 34}}
        })))
        .unwrap();
        assert_eq!(profile.user_name, "佩可");
        assert_eq!(profile.arena_rank, 12);
        assert_eq!(profile.grand_arena_rank, 34);
    }

    #[test]
    fn test_parse_profile_invalidated_flag_and_marker() {
        let err = BridgeSession::parse_profile(reply(json!({
            "error": "session expired", "session_invalidated": true
        })))
        .unwrap_err();
        assert!(err.is_invalidated());

        let err = BridgeSession::parse_profile(reply(json!({"error": "请回到标题界面"}))).unwrap_err();
        assert!(err.is_invalidated());

        let err = BridgeSession::parse_profile(reply(json!({"error": "timeout"}))).unwrap_err();
        assert!(matches!(err, SessionError::Query(_)));
    }

    #[test]
    fn test_login_reply_tags() {
        let r: LoginReply = serde_json::from_value(json!({"status": "ok"})).unwrap();
        assert!(matches!(r, LoginReply::Ok));

        let r: LoginReply =
            serde_json::from_value(json!({"status": "captcha", "gt": "g", "challenge": "c", "userid": "u"})).unwrap();
        assert!(matches!(r, LoginReply::Captcha(ref c) if c.userid == "u"));

        let r: LoginReply = serde_json::from_value(json!({"status": "error", "message": "密码错误"})).unwrap();
        assert!(matches!(r, LoginReply::Error { ref message } if message == "密码错误"));
    }

    #[test]
    fn test_account_debug_hides_password() {
        let account = Account::new("user", "secret");
        assert!(!format!("{:?}", account).contains("secret"));
    }
}
