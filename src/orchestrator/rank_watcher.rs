//! 排名监听循环 - 编排层
//!
//! ## 状态
//!
//! ```text
//! LoggingIn ──登录成功──▶ Polling ──上报错误达到阈值──▶ LoggingIn
//!     │  ▲                   │
//!     └──┘ 登录失败，3 秒后重试 └──停止信号──▶ Stopped
//! ```
//!
//! ## 错误处理
//!
//! - 单次查询失败先计数，连续失败 3 次才推送通知，并记一次上报错误
//! - 上报错误累计 3 次，或会话已失效，结束本轮轮询并重新登录
//! - 登录失败不设上限，每 3 秒重试一次

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::NotifyError;
use crate::models::RankCache;
use crate::services::{Notifier, SessionManager};
use crate::workflow::{CheckOutcome, RankCheck};

/// 查询错误与上报错误的阈值
pub const ERROR_THRESHOLD: u32 = 3;
/// 两轮查询之间的间隔
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// 登录失败后的重试间隔，以及轮询结束后重新登录前的等待
pub const LOGIN_RETRY_DELAY: Duration = Duration::from_secs(3);

/// 监听状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    LoggingIn,
    Polling,
    Stopped,
}

/// 错误计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCounters {
    /// 连续查询失败次数，任意一次查询成功即清零
    pub query_error_count: u32,
    /// 本次登录期间的上报次数
    pub notify_error_count: u32,
}

impl ErrorCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 上报次数达到阈值，需要重新登录
    pub fn escalated(&self) -> bool {
        self.notify_error_count >= ERROR_THRESHOLD
    }
}

/// 排名监听器
///
/// 唯一持有排名缓存、错误计数和停止信号
pub struct RankWatcher {
    sessions: SessionManager,
    notifier: Arc<Notifier>,
    cache: RankCache,
    counters: ErrorCounters,
    stop: CancellationToken,
    state: WatchState,
    login_cycles: usize,
}

impl RankWatcher {
    pub fn new(sessions: SessionManager, notifier: Arc<Notifier>, cache: RankCache, stop: CancellationToken) -> Self {
        Self {
            sessions,
            notifier,
            cache,
            counters: ErrorCounters::default(),
            stop,
            state: WatchState::LoggingIn,
            login_cycles: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn cache(&self) -> &RankCache {
        &self.cache
    }

    pub fn counters(&self) -> ErrorCounters {
        self.counters
    }

    /// 成功登录的次数
    pub fn login_cycles(&self) -> usize {
        self.login_cycles
    }

    /// 持续监听，直到收到停止信号
    ///
    /// 停止信号只在每轮循环开始时检查；正在进行的网络请求总会完成，
    /// 等待中的间隔则会被立即打断
    pub async fn run(&mut self) {
        info!("pcrclient: jjc watcher");
        info!("pcrclient: server starting...");

        while !self.stop.is_cancelled() {
            self.state = WatchState::LoggingIn;

            if let Err(e) = self.sessions.ensure_logged_in().await {
                self.notify_now(&format!("登录异常：{}", e)).await;
                pause(&self.stop, LOGIN_RETRY_DELAY).await;
                continue;
            }

            self.login_cycles += 1;
            self.counters.reset();
            self.state = WatchState::Polling;
            info!("第 {} 次登录成功，开始监听 {} 个用户", self.login_cycles, self.cache.len());

            if let Err(e) = self.poll_until_escalated().await {
                error!("workwx error: {}", e);
            }

            pause(&self.stop, LOGIN_RETRY_DELAY).await;
        }

        self.state = WatchState::Stopped;
        info!("pcrclient: server stopped!");
    }

    /// 登录后的查询循环，上报错误达到阈值或收到停止信号时返回
    async fn poll_until_escalated(&mut self) -> Result<(), NotifyError> {
        while !self.stop.is_cancelled() && !self.counters.escalated() {
            self.poll_cycle().await?;
            pause(&self.stop, POLL_INTERVAL).await;
        }

        if self.counters.escalated() {
            warn!("上报错误达到 {} 次，重新登录", ERROR_THRESHOLD);
        }
        Ok(())
    }

    /// 按注册顺序检查一遍所有用户，返回本轮是否存在排名变动
    pub async fn poll_cycle(&mut self) -> Result<bool, NotifyError> {
        let mut rank_changed = false;

        for index in 0..self.cache.len() {
            let result = RankCheck::run(self.sessions.session_mut(), &mut self.cache, index).await;

            match result {
                Ok(outcome) => {
                    self.counters.reset();
                    if let CheckOutcome::Changed { message } = outcome {
                        rank_changed = true;
                        // 变动提醒先缓存，所有用户查完后统一发送
                        self.notifier.send_delayed(&message).await?;
                    }
                }
                Err(e) if e.is_invalidated() => {
                    warn!("会话已失效，立即重新登录: {}", e);
                    self.counters.notify_error_count = ERROR_THRESHOLD;
                    break;
                }
                Err(e) => {
                    self.counters.query_error_count += 1;
                    if self.counters.query_error_count < ERROR_THRESHOLD {
                        debug!(
                            "查询失败 ({}/{}): {}",
                            self.counters.query_error_count, ERROR_THRESHOLD, e
                        );
                        continue;
                    }

                    self.counters.query_error_count = 0;
                    self.counters.notify_error_count += 1;
                    self.notifier.send_now(&format!("用户信息查询失败：{}", e)).await?;
                    break;
                }
            }
        }

        if rank_changed {
            self.notifier.send_now("监听用户存在排名变动").await?;
        }

        Ok(rank_changed)
    }

    async fn notify_now(&self, message: &str) {
        if let Err(e) = self.notifier.send_now(message).await {
            error!("workwx error: {}", e);
        }
    }
}

/// 等待指定时间，收到停止信号时提前返回
async fn pause(stop: &CancellationToken, duration: Duration) {
    tokio::select! {
        _ = sleep(duration) => {}
        _ = stop.cancelled() => {}
    }
}
