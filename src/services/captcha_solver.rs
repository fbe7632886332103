//! 自动过码服务 - 业务能力层
//!
//! 只负责把一次验证码挑战变成 validate 凭证，不关心登录流程
//!
//! ## 协议
//! 1. 提交 gt / challenge / userid，拿到 uuid
//! 2. 按 uuid 轮询进度（每次尝试最多 10 次）：
//!    - `queue_num`：排队中，等待 `min(queue_num, 3) * 10` 秒
//!    - `in running`：过码中，等待 5 秒
//!    - `fail` / `url invalid`：放弃本次尝试，重新提交
//!    - 携带 `validate`：成功
//! 3. 最多尝试 3 次，仍未成功则超时

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::CaptchaApi;
use crate::error::VerifyError;
use crate::models::{CaptchaChallenge, CaptchaStatus, CaptchaTask, CaptchaToken};
use crate::services::notifier::{Notifier, Priority};

/// 最多提交次数
pub const MAX_ATTEMPTS: usize = 3;
/// 每次提交后最多查询进度的次数
pub const MAX_POLLS: usize = 10;
/// 排队等待的计算上限（位置超过 3 按 3 算）
const QUEUE_WAIT_CAP: u64 = 3;
/// 排队中每个位置等待的秒数
const QUEUE_WAIT_UNIT_SECS: u64 = 10;
/// 过码运行中的等待时间
const RUNNING_WAIT: Duration = Duration::from_secs(5);

/// 根据排队位置计算等待时间，最长 30 秒
pub fn queue_wait(queue_num: u64) -> Duration {
    Duration::from_secs(queue_num.min(QUEUE_WAIT_CAP) * QUEUE_WAIT_UNIT_SECS)
}

/// 自动过码服务
pub struct CaptchaSolver {
    api: Arc<dyn CaptchaApi>,
    notifier: Arc<Notifier>,
}

impl CaptchaSolver {
    pub fn new(api: Arc<dyn CaptchaApi>, notifier: Arc<Notifier>) -> Self {
        Self { api, notifier }
    }

    /// 过码
    ///
    /// 成功时立即返回，不再进行剩余的尝试
    pub async fn solve(&self, challenge: &CaptchaChallenge) -> Result<CaptchaToken, VerifyError> {
        for attempt in 1..=MAX_ATTEMPTS {
            self.notify(&format!("PCR登录验证：自动过码第{}次尝试", attempt), Priority::Low)
                .await;

            let uuid = self.api.submit(challenge).await?;
            debug!("过码任务已提交: uuid={}", uuid);

            let mut task = CaptchaTask::new(challenge.clone(), uuid);
            if let Some(token) = self.poll(&mut task).await? {
                return Ok(token);
            }

            info!("第 {} 次过码未成功 (状态: {:?})", attempt, task.state);
        }

        self.notify("登录验证：自动过码超时", Priority::High).await;
        Err(VerifyError::Timeout {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// 轮询一次过码任务，失败或查询次数用尽时返回 `None`
    async fn poll(&self, task: &mut CaptchaTask) -> Result<Option<CaptchaToken>, VerifyError> {
        for poll in 1..=MAX_POLLS {
            let status = self.api.check(&task.uuid).await?;
            debug!("过码进度 ({}/{}): {:?}", poll, MAX_POLLS, status);

            if let Some(state) = status.state() {
                task.state = state;
            }

            match status {
                CaptchaStatus::Queued(queue) => {
                    task.queue_position = Some(queue);
                    let wait = queue_wait(queue);
                    self.notify(
                        &format!(
                            "登录验证：自动过码队列中\n当前位置：{}，等待{}秒",
                            queue,
                            wait.as_secs()
                        ),
                        Priority::Low,
                    )
                    .await;
                    sleep(wait).await;
                }
                CaptchaStatus::Running => {
                    task.queue_position = None;
                    self.notify("登录验证：自动过码运行中", Priority::Low).await;
                    sleep(RUNNING_WAIT).await;
                }
                CaptchaStatus::Failed | CaptchaStatus::Invalid => {
                    self.notify("登录验证：自动过码失败", Priority::High).await;
                    return Ok(None);
                }
                CaptchaStatus::Validated(token) => {
                    self.notify("登录验证：自动过码成功", Priority::Low).await;
                    return Ok(Some(token));
                }
                CaptchaStatus::Unknown(reply) => {
                    warn!("无法识别的过码进度响应: {}", reply);
                }
            }
        }

        debug!("uuid={} 查询次数用尽 (状态: {:?})", task.uuid, task.state);
        Ok(None)
    }

    /// 推送失败不影响过码流程
    async fn notify(&self, message: &str, priority: Priority) {
        if let Err(e) = self.notifier.send(message, priority).await {
            warn!("过码进度推送失败: {}", e);
        }
    }
}
