//! 测试用的消息接收端

use std::sync::Mutex;

use async_trait::async_trait;

use crate::clients::MessageSink;
use crate::error::NotifyError;

/// 记录每一次推送内容
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<String>>,
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn deliver(&self, content: &str) -> Result<(), NotifyError> {
        self.delivered.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

/// 每次推送都返回企业微信限频错误
#[derive(Default)]
pub struct FailingSink {
    pub attempts: Mutex<Vec<String>>,
}

#[async_trait]
impl MessageSink for FailingSink {
    async fn deliver(&self, content: &str) -> Result<(), NotifyError> {
        self.attempts.lock().unwrap().push(content.to_string());
        Err(NotifyError::BadResponse {
            code: 45009,
            message: "api freq out of limit".to_string(),
        })
    }
}
