use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 企业微信机器人 WebHook 地址
    pub workwx_webhook: String,
    /// 游戏账号
    pub pcr_username: String,
    /// 游戏密码
    pub pcr_userpass: String,
    /// 监听用户ID列表文件（JSON 或 TOML）
    pub pcr_watch_path: String,
    /// 自动过码平台地址
    pub captcha_api_base_url: String,
    /// 游戏会话服务地址（承载 SDK 的本地服务）
    pub session_bridge_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workwx_webhook: String::new(),
            pcr_username: String::new(),
            pcr_userpass: String::new(),
            pcr_watch_path: "pcr_watch.json".to_string(),
            captcha_api_base_url: "https://pcrd.tencentbot.top".to_string(),
            session_bridge_url: "http://127.0.0.1:8040".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            workwx_webhook: required_var("WORKWX_WEBHOOK")?,
            pcr_username: required_var("PCR_USERNAME")?,
            pcr_userpass: required_var("PCR_USERPASS")?,
            pcr_watch_path: required_var("PCR_WATCH_PATH")?,
            captcha_api_base_url: std::env::var("CAPTCHA_API_BASE_URL").unwrap_or(default.captcha_api_base_url),
            session_bridge_url: std::env::var("SESSION_BRIDGE_URL").unwrap_or(default.session_bridge_url),
            verbose_logging: parse_var("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        })
    }
}

fn required_var(var_name: &str) -> Result<String, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::EnvVarNotFound {
            var_name: var_name.to_string(),
        }),
    }
}

fn parse_var<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    let Ok(value) = std::env::var(var_name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 环境变量是进程级共享状态，相关断言放在同一个测试里
    #[test]
    fn test_from_env_required_and_optional_vars() {
        std::env::remove_var("WORKWX_WEBHOOK");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { ref var_name } if var_name == "WORKWX_WEBHOOK"));

        std::env::set_var("WORKWX_WEBHOOK", "https://example.invalid/hook");
        std::env::set_var("PCR_USERNAME", "user");
        std::env::set_var("PCR_USERPASS", "pass");
        std::env::set_var("PCR_WATCH_PATH", "watch.json");
        std::env::set_var("VERBOSE_LOGGING", "yes");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));

        std::env::set_var("VERBOSE_LOGGING", "true");
        std::env::remove_var("CAPTCHA_API_BASE_URL");
        let config = Config::from_env().unwrap();
        assert!(config.verbose_logging);
        assert_eq!(config.pcr_watch_path, "watch.json");
        assert_eq!(config.captcha_api_base_url, "https://pcrd.tencentbot.top");
    }
}
