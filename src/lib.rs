//! # PCR Rank Watch
//!
//! 监听竞技场排名变动，并通过企业微信机器人推送提醒
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有唯一的游戏会话，只暴露"登录 / 查询"能力
//! - `clients/` - WebHook、过码平台、会话服务的 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `Notifier` - 缓存低优先级消息，合并推送
//! - `CaptchaSolver` - 轮询过码平台，拿到 validate
//! - `SessionManager` - 按需登录，登录中遇到验证码交给 `CaptchaSolver`
//!
//! ### ③ 流程层（Workflow）
//! - `RankCheck` - 单个用户的查询与排名对比
//!
//! ### ④ 编排层（Orchestration）
//! - `RankWatcher` - 登录 / 轮询 / 重新登录状态机，负责重试与上报
//! - `App` - 应用初始化与运行

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{GameSession, LoginHooks};
pub use models::{RankCache, WatchedUser};
pub use orchestrator::{App, RankWatcher, WatchState};
pub use services::{CaptchaSolver, Notifier, Priority, SessionManager};
pub use workflow::{CheckOutcome, RankCheck};
