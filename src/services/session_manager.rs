//! 登录管理服务 - 业务能力层
//!
//! 持有游戏会话，负责在需要时（重新）登录，登录中遇到验证码时交给 `CaptchaSolver`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument::WithSubscriber;
use tracing::subscriber::NoSubscriber;
use tracing::{warn, Dispatch};

use crate::error::{AppResult, VerifyError};
use crate::infrastructure::{GameSession, LoginHooks};
use crate::models::{CaptchaChallenge, CaptchaToken};
use crate::services::captcha_solver::CaptchaSolver;
use crate::services::notifier::Notifier;

/// 登录管理服务
///
/// 职责：
/// - 判断是否需要登录并执行登录
/// - 登录期间屏蔽会话自身的日志（其中包含账号信息）
/// - 不处理重试，登录失败直接返回给调用方
pub struct SessionManager {
    session: Box<dyn GameSession>,
    solver: CaptchaSolver,
    notifier: Arc<Notifier>,
}

impl SessionManager {
    pub fn new(session: Box<dyn GameSession>, solver: CaptchaSolver, notifier: Arc<Notifier>) -> Self {
        Self {
            session,
            solver,
            notifier,
        }
    }

    /// 确保已登录
    pub async fn ensure_logged_in(&mut self) -> AppResult<()> {
        while self.session.should_login() {
            self.notifier.send_delayed("登录中").await?;

            // 钩子里的过码流程仍然使用当前的日志订阅者
            let hooks = SolverHooks {
                solver: &self.solver,
                notifier: &self.notifier,
                dispatch: tracing::dispatcher::get_default(|d| d.clone()),
            };

            self.session
                .login(&hooks)
                .with_subscriber(NoSubscriber::default())
                .await?;

            self.notifier.send_now("登录成功").await?;
        }
        Ok(())
    }

    /// 已登录的会话，用于查询
    pub fn session_mut(&mut self) -> &mut dyn GameSession {
        self.session.as_mut()
    }
}

/// 登录钩子：验证码交给过码服务，认证失败推送通知
struct SolverHooks<'a> {
    solver: &'a CaptchaSolver,
    notifier: &'a Notifier,
    dispatch: Dispatch,
}

#[async_trait]
impl<'a> LoginHooks for SolverHooks<'a> {
    async fn verify_captcha(&self, challenge: CaptchaChallenge) -> Result<CaptchaToken, VerifyError> {
        self.solver
            .solve(&challenge)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn report_error(&self, message: &str) {
        let result = self
            .notifier
            .send_now(&format!("登录失败：{}", message))
            .with_subscriber(self.dispatch.clone())
            .await;
        if let Err(e) = result {
            warn!("登录失败通知推送失败: {}", e);
        }
    }
}
