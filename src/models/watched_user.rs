//! 监听用户与排名缓存

/// 竞技场类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBoard {
    /// 普通竞技场（JJC）
    Jjc,
    /// 公主竞技场（PJJC）
    Pjjc,
}

impl RankBoard {
    pub fn label(&self) -> &'static str {
        match self {
            RankBoard::Jjc => "普通竞技场",
            RankBoard::Pjjc => "公主竞技场",
        }
    }
}

/// 单个竞技场的排名变动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankDelta {
    pub board: RankBoard,
    pub old_rank: i64,
    pub new_rank: i64,
}

impl RankDelta {
    /// 旧排名减新排名，正数表示名次上升
    pub fn delta(&self) -> i64 {
        self.old_rank - self.new_rank
    }

    pub fn arrow(&self) -> &'static str {
        if self.delta() < 0 {
            "↓"
        } else {
            "↑"
        }
    }
}

/// 监听用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedUser {
    pub id: i64,
    pub last_jjc_rank: i64,
    pub last_pjjc_rank: i64,
}

impl WatchedUser {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            last_jjc_rank: 0,
            last_pjjc_rank: 0,
        }
    }

    /// 与新排名比较，返回发生变动的竞技场
    pub fn diff(&self, new_jjc_rank: i64, new_pjjc_rank: i64) -> Vec<RankDelta> {
        let mut deltas = Vec::new();
        if self.last_jjc_rank != new_jjc_rank {
            deltas.push(RankDelta {
                board: RankBoard::Jjc,
                old_rank: self.last_jjc_rank,
                new_rank: new_jjc_rank,
            });
        }
        if self.last_pjjc_rank != new_pjjc_rank {
            deltas.push(RankDelta {
                board: RankBoard::Pjjc,
                old_rank: self.last_pjjc_rank,
                new_rank: new_pjjc_rank,
            });
        }
        deltas
    }
}

/// 排名缓存
///
/// 按注册顺序保存所有监听用户，用户集合在启动后固定，只有排名会被更新
#[derive(Debug, Clone, Default)]
pub struct RankCache {
    users: Vec<WatchedUser>,
}

impl RankCache {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut users: Vec<WatchedUser> = Vec::new();
        for id in ids {
            if !users.iter().any(|u| u.id == id) {
                users.push(WatchedUser::new(id));
            }
        }
        Self { users }
    }

    /// 预置排名（用于恢复状态）
    pub fn with_ranks(mut self, id: i64, jjc_rank: i64, pjjc_rank: i64) -> Self {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
            user.last_jjc_rank = jjc_rank;
            user.last_pjjc_rank = pjjc_rank;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WatchedUser> {
        self.users.get(index)
    }

    pub fn find(&self, id: i64) -> Option<&WatchedUser> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedUser> {
        self.users.iter()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.users.iter().map(|u| u.id).collect()
    }

    pub fn update(&mut self, index: usize, jjc_rank: i64, pjjc_rank: i64) {
        if let Some(user) = self.users.get_mut(index) {
            user.last_jjc_rank = jjc_rank;
            user.last_pjjc_rank = pjjc_rank;
        }
    }
}
