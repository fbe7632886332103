//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载监听列表、创建各个客户端与服务
//! 2. **启动通知**：推送"启动中"消息
//! 3. **运行监听**：把停止信号交给 `RankWatcher`，直到停止

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::clients::{Account, BridgeSession, CaptchaClient, WorkWxClient};
use crate::config::Config;
use crate::models::{load_watch_ids, RankCache};
use crate::orchestrator::rank_watcher::RankWatcher;
use crate::services::{CaptchaSolver, Notifier, SessionManager};

/// 应用主结构
pub struct App {
    notifier: Arc<Notifier>,
    watcher: RankWatcher,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, stop: CancellationToken) -> Result<Self> {
        log_startup(&config);

        let watch_ids = load_watch_ids(Path::new(&config.pcr_watch_path)).await?;
        if watch_ids.is_empty() {
            anyhow::bail!("监听列表为空: {}", config.pcr_watch_path);
        }
        log_watch_list(&watch_ids);

        let notifier = Arc::new(Notifier::new(Arc::new(WorkWxClient::new(&config.workwx_webhook))));

        let captcha_api = CaptchaClient::new(&config.captcha_api_base_url)?;
        let solver = CaptchaSolver::new(Arc::new(captcha_api), notifier.clone());

        let account = Account::new(&config.pcr_username, &config.pcr_userpass);
        let session = BridgeSession::new(&config.session_bridge_url, account);
        let sessions = SessionManager::new(Box::new(session), solver, notifier.clone());

        let watcher = RankWatcher::new(sessions, notifier.clone(), RankCache::new(watch_ids), stop);

        Ok(Self { notifier, watcher })
    }

    /// 运行应用主逻辑，收到停止信号后返回
    pub async fn run(mut self) -> Result<()> {
        self.notifier.send_now("竞技场击剑，启动中").await?;

        self.watcher.run().await;

        info!("{}", "=".repeat(60));
        info!("监听已停止，共登录 {} 次", self.watcher.login_cycles());
        info!("{}", "=".repeat(60));
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 竞技场排名监听");
    info!("🔐 过码平台: {}", config.captcha_api_base_url);
    info!("🎮 会话服务: {}", config.session_bridge_url);
    info!("{}", "=".repeat(60));
}

fn log_watch_list(ids: &[i64]) {
    info!("✓ 找到 {} 个待监听的用户", ids.len());
    for id in ids {
        info!("  - {}", id);
    }
}
