use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 自动过码错误
    #[error("过码错误: {0}")]
    Verify(#[from] VerifyError),
    /// 游戏会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 消息推送错误
    #[error("推送错误: {0}")]
    Notify(#[from] NotifyError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 自动过码错误
#[derive(Debug, Error)]
pub enum VerifyError {
    /// 过码平台请求或响应异常
    #[error("自动过码失败: {reason}")]
    Failed { reason: String },
    /// 3 次尝试均未拿到 validate
    #[error("自动过码超时 (已尝试 {attempts} 次)")]
    Timeout { attempts: usize },
}

/// 游戏会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 登录失败（认证失败、过码失败等）
    #[error("登录失败: {0}")]
    Login(String),
    /// 会话被强制返回标题界面，必须重新登录
    #[error("会话已失效: {0}")]
    Invalidated(String),
    /// 单次查询失败
    #[error("查询失败: {0}")]
    Query(String),
    /// 与会话服务通信失败
    #[error("会话通信失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 返回标题界面的错误文本标记
pub const RETURN_TO_TITLE_MARKER: &str = "回到标题界面";

impl SessionError {
    /// 将会话返回的错误文本归类
    ///
    /// 只有文本可用时，包含"回到标题界面"的消息视为会话失效
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(RETURN_TO_TITLE_MARKER) {
            SessionError::Invalidated(message)
        } else {
            SessionError::Query(message)
        }
    }

    pub fn is_invalidated(&self) -> bool {
        matches!(self, SessionError::Invalidated(_))
    }
}

/// 消息推送错误
#[derive(Debug, Error)]
pub enum NotifyError {
    /// 请求 WebHook 失败
    #[error("WebHook 请求失败: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// WebHook 返回非 0 错误码
    #[error("WebHook 返回错误: errcode={code}, errmsg={message}")]
    BadResponse { code: i64, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl SessionError {
    /// 创建会话通信错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SessionError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

impl VerifyError {
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        VerifyError::Failed {
            reason: reason.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_detects_return_to_title() {
        let err = SessionError::from_message("连接中断，即将回到标题界面");
        assert!(err.is_invalidated());

        let err = SessionError::from_message("服务器繁忙");
        assert!(!err.is_invalidated());
        assert!(matches!(err, SessionError::Query(_)));
    }

    #[test]
    fn test_app_error_wraps_source_message() {
        let err: AppError = VerifyError::Timeout { attempts: 3 }.into();
        assert_eq!(err.to_string(), "过码错误: 自动过码超时 (已尝试 3 次)");
    }
}
