//! 游戏会话 - 基础设施层
//!
//! 持有唯一的游戏会话，只暴露"登录"和"查询"两种能力

use async_trait::async_trait;

use crate::error::{SessionError, VerifyError};
use crate::models::{CaptchaChallenge, CaptchaToken, ProfileInfo};

/// 登录过程中会话回调调用方的钩子
#[async_trait]
pub trait LoginHooks: Send + Sync {
    /// 会话要求过验证码时调用
    async fn verify_captcha(&self, challenge: CaptchaChallenge) -> Result<CaptchaToken, VerifyError>;

    /// 会话认证失败时调用
    async fn report_error(&self, message: &str);
}

/// 游戏会话
///
/// 职责：
/// - 持有登录态
/// - 登录时按需通过 `LoginHooks` 请求过码
/// - 查询单个用户的信息
/// - 不认识排名缓存，不处理重试
#[async_trait]
pub trait GameSession: Send {
    /// 当前是否需要（重新）登录
    fn should_login(&self) -> bool;

    /// 执行一次登录
    async fn login(&mut self, hooks: &dyn LoginHooks) -> Result<(), SessionError>;

    /// 查询用户信息
    ///
    /// 会话已失效时必须返回 `SessionError::Invalidated`
    async fn query_profile(&mut self, user_id: i64) -> Result<ProfileInfo, SessionError>;
}
