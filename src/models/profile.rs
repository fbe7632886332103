use serde::Deserialize;

/// 用户信息（`/profile/get_profile` 返回的 `user_info`）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileInfo {
    pub user_name: String,
    /// 普通竞技场排名
    pub arena_rank: i64,
    /// 公主竞技场排名
    pub grand_arena_rank: i64,
}

/// 查询接口的完整响应
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileReply {
    pub user_info: ProfileInfo,
}
