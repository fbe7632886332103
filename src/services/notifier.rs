//! 消息推送服务 - 业务能力层
//!
//! 企业微信 WebHook 限速 20 次/分钟，低优先级的进度消息先缓存，
//! 等到高优先级消息出现时合并成一次推送

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::clients::MessageSink;
use crate::error::NotifyError;

/// 消息优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// 仅进入缓存队列，暂不发送
    Low,
    /// 连同缓存队列一起立即发送
    High,
}

/// 消息推送服务
///
/// 职责：
/// - 给每条消息加上时间和标记
/// - 缓存低优先级消息
/// - 高优先级消息触发合并推送
pub struct Notifier {
    sink: Arc<dyn MessageSink>,
    pending: Mutex<VecDeque<String>>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// 发送消息
    ///
    /// 高优先级时按 FIFO 取出所有缓存消息，本条消息追加在最后，以空行连接后一次推送。
    /// 返回时缓存队列必定为空（推送失败时缓存消息随之丢弃）
    pub async fn send(&self, message: &str, priority: Priority) -> Result<(), NotifyError> {
        info!("workwx: {}", message);

        let message = Self::decorate(message);

        let content = {
            let mut pending = self.lock_pending();
            if priority == Priority::Low {
                pending.push_back(message);
                return Ok(());
            }
            let mut messages: Vec<String> = pending.drain(..).collect();
            messages.push(message);
            messages.join("\n\n")
        };

        self.sink.deliver(&content).await
    }

    /// 缓存一条低优先级消息
    pub async fn send_delayed(&self, message: &str) -> Result<(), NotifyError> {
        self.send(message, Priority::Low).await
    }

    /// 立即推送（连同缓存）
    pub async fn send_now(&self, message: &str) -> Result<(), NotifyError> {
        self.send(message, Priority::High).await
    }

    /// 当前缓存的消息数量
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // 锁内不会 panic，中毒时直接沿用内部数据
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 增加时间和标记
    fn decorate(message: &str) -> String {
        format!(
            "{}\n【PCR】{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            message
        )
    }
}
