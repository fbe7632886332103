//! 排名检查流程 - 流程层
//!
//! 定义"一个用户"的查询与对比：查询 → 对比缓存 → 生成变动消息 → 更新缓存

use tracing::debug;

use crate::error::SessionError;
use crate::infrastructure::GameSession;
use crate::models::{RankCache, RankDelta};

/// 单个用户的检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 两个竞技场排名均无变动
    Unchanged,
    /// 有变动，附带变动提醒
    Changed { message: String },
}

/// 排名检查流程
///
/// - 不持有会话，也不持有缓存
/// - 不处理重试与通知，只返回结果
pub struct RankCheck;

impl RankCheck {
    /// 检查缓存中第 `index` 个用户
    ///
    /// 只有在成功查询且存在变动时才会更新缓存
    pub async fn run(
        session: &mut dyn GameSession,
        cache: &mut RankCache,
        index: usize,
    ) -> Result<CheckOutcome, SessionError> {
        let Some(user) = cache.get(index).cloned() else {
            return Ok(CheckOutcome::Unchanged);
        };

        let profile = session.query_profile(user.id).await?;
        let deltas = user.diff(profile.arena_rank, profile.grand_arena_rank);

        if deltas.is_empty() {
            debug!("用户 {} 排名无变动", user.id);
            return Ok(CheckOutcome::Unchanged);
        }

        let message = build_change_message(&profile.user_name, &deltas);
        cache.update(index, profile.arena_rank, profile.grand_arena_rank);

        Ok(CheckOutcome::Changed { message })
    }
}

/// 生成排名变动提醒
///
/// ```text
/// 排名变动：佩可
/// 普通竞技场（ ↑ 5 ）：100 ➜ 95
/// ```
pub fn build_change_message(user_name: &str, deltas: &[RankDelta]) -> String {
    let mut message = format!("排名变动：{}", user_name);
    for delta in deltas {
        message.push_str(&format!(
            "\n{}（ {} {} ）：{} ➜ {}",
            delta.board.label(),
            delta.arrow(),
            delta.delta().abs(),
            delta.old_rank,
            delta.new_rank
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::LoginHooks;
    use crate::models::{ProfileInfo, RankBoard};
    use async_trait::async_trait;

    struct FixedSession {
        reply: Result<ProfileInfo, &'static str>,
        queried: Vec<i64>,
    }

    #[async_trait]
    impl GameSession for FixedSession {
        fn should_login(&self) -> bool {
            false
        }

        async fn login(&mut self, _: &dyn LoginHooks) -> Result<(), SessionError> {
            Ok(())
        }

        async fn query_profile(&mut self, user_id: i64) -> Result<ProfileInfo, SessionError> {
            self.queried.push(user_id);
            self.reply.clone().map_err(SessionError::from_message)
        }
    }

    fn session(jjc: i64, pjjc: i64) -> FixedSession {
        FixedSession {
            reply: Ok(ProfileInfo {
                user_name: "佩可".into(),
                arena_rank: jjc,
                grand_arena_rank: pjjc,
            }),
            queried: Vec::new(),
        }
    }

    #[test]
    fn test_build_change_message_both_boards() {
        let deltas = [
            RankDelta {
                board: RankBoard::Jjc,
                old_rank: 100,
                new_rank: 95,
            },
            RankDelta {
                board: RankBoard::Pjjc,
                old_rank: 50,
                new_rank: 61,
            },
        ];
        assert_eq!(
            build_change_message("佩可", &deltas),
            "排名变动：佩可\n普通竞技场（ ↑ 5 ）：100 ➜ 95\n公主竞技场（ ↓ 11 ）：50 ➜ 61"
        );
    }

    #[tokio::test]
    async fn test_unchanged_ranks_leave_cache_untouched() {
        let mut cache = RankCache::new([7]).with_ranks(7, 100, 50);
        let mut session = session(100, 50);

        let outcome = RankCheck::run(&mut session, &mut cache, 0).await.unwrap();

        assert_eq!(outcome, CheckOutcome::Unchanged);
        assert_eq!(session.queried, vec![7]);
        assert_eq!(cache.find(7).unwrap().last_jjc_rank, 100);
        assert_eq!(cache.find(7).unwrap().last_pjjc_rank, 50);
    }

    #[tokio::test]
    async fn test_changed_jjc_updates_cache() {
        let mut cache = RankCache::new([7]).with_ranks(7, 100, 50);
        let mut session = session(95, 50);

        let outcome = RankCheck::run(&mut session, &mut cache, 0).await.unwrap();

        let CheckOutcome::Changed { message } = outcome else {
            panic!("应该检测到排名变动");
        };
        assert_eq!(message, "排名变动：佩可\n普通竞技场（ ↑ 5 ）：100 ➜ 95");
        assert!(!message.contains("公主竞技场"));
        let user = cache.find(7).unwrap();
        assert_eq!((user.last_jjc_rank, user.last_pjjc_rank), (95, 50));
    }

    #[tokio::test]
    async fn test_query_error_keeps_cache() {
        let mut cache = RankCache::new([7]).with_ranks(7, 100, 50);
        let mut session = FixedSession {
            reply: Err("即将回到标题界面"),
            queried: Vec::new(),
        };

        let err = RankCheck::run(&mut session, &mut cache, 0).await.unwrap_err();

        assert!(err.is_invalidated());
        assert_eq!(cache.find(7).unwrap().last_jjc_rank, 100);
    }
}
