pub mod captcha;
pub mod loaders;
pub mod profile;
pub mod watched_user;

pub use captcha::{CaptchaChallenge, CaptchaState, CaptchaStatus, CaptchaTask, CaptchaToken};
pub use loaders::load_watch_ids;
pub use profile::{ProfileInfo, ProfileReply};
pub use watched_user::{RankBoard, RankCache, RankDelta, WatchedUser};
