//! 登录验证码相关数据

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 会话提供的验证码参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaChallenge {
    pub gt: String,
    pub challenge: String,
    pub userid: String,
}

/// 过码成功后回传给会话的凭证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaToken {
    pub challenge: String,
    pub gt_user_id: String,
    pub validate: String,
}

/// 过码任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaState {
    Queued,
    Running,
    Failed,
    Invalid,
    Validated,
}

/// 一次过码任务（平台分配 uuid 后创建，结束即丢弃）
#[derive(Debug, Clone)]
pub struct CaptchaTask {
    pub challenge: CaptchaChallenge,
    pub uuid: String,
    pub queue_position: Option<u64>,
    pub state: CaptchaState,
}

impl CaptchaTask {
    pub fn new(challenge: CaptchaChallenge, uuid: String) -> Self {
        Self {
            challenge,
            uuid,
            queue_position: None,
            state: CaptchaState::Queued,
        }
    }
}

/// 过码平台查询接口的一次响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptchaStatus {
    /// 排队中，附带当前位置
    Queued(u64),
    /// 正在过码
    Running,
    /// 过码失败（"fail"）
    Failed,
    /// 平台认为参数无效（"url invalid"）
    Invalid,
    /// 过码成功
    Validated(CaptchaToken),
    /// 无法识别的响应
    Unknown(JsonValue),
}

impl CaptchaStatus {
    /// 解析查询接口返回的 JSON
    ///
    /// `queue_num` 可能是数字也可能是字符串；`info` 为字符串或携带 validate 的对象
    pub fn from_json(value: &JsonValue) -> Self {
        if let Some(queue) = value.get("queue_num").and_then(parse_queue_num) {
            return CaptchaStatus::Queued(queue);
        }

        match value.get("info") {
            Some(JsonValue::String(info)) => match info.as_str() {
                "fail" => CaptchaStatus::Failed,
                "url invalid" => CaptchaStatus::Invalid,
                "in running" => CaptchaStatus::Running,
                _ => CaptchaStatus::Unknown(value.clone()),
            },
            Some(info) if info.get("validate").is_some() => {
                match serde_json::from_value::<CaptchaToken>(info.clone()) {
                    Ok(token) => CaptchaStatus::Validated(token),
                    Err(_) => CaptchaStatus::Unknown(value.clone()),
                }
            }
            _ => CaptchaStatus::Unknown(value.clone()),
        }
    }

    pub fn state(&self) -> Option<CaptchaState> {
        match self {
            CaptchaStatus::Queued(_) => Some(CaptchaState::Queued),
            CaptchaStatus::Running => Some(CaptchaState::Running),
            CaptchaStatus::Failed => Some(CaptchaState::Failed),
            CaptchaStatus::Invalid => Some(CaptchaState::Invalid),
            CaptchaStatus::Validated(_) => Some(CaptchaState::Validated),
            CaptchaStatus::Unknown(_) => None,
        }
    }
}

fn parse_queue_num(value: &JsonValue) -> Option<u64> {
    let queue = match value {
        JsonValue::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    // 0 与缺省等价
    (queue > 0).then_some(queue)
}
