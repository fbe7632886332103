//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 读取监听列表，创建客户端与服务
//! - 推送启动通知，运行监听直到停止
//!
//! ### `rank_watcher` - 排名监听循环
//! - 登录 / 轮询 / 重新登录的状态机
//! - 持有排名缓存、错误计数和停止信号
//! - 决定何时重试、何时上报、何时重新登录
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! rank_watcher (遍历 RankCache)
//!     ↓
//! workflow::RankCheck (处理单个用户)
//!     ↓
//! services (notifier / captcha_solver / session_manager)
//!     ↓
//! clients + infrastructure (WebHook / 过码平台 / 游戏会话)
//! ```

pub mod app;
pub mod rank_watcher;

pub use app::App;
pub use rank_watcher::{ErrorCounters, RankWatcher, WatchState};
