pub mod rank_check;

pub use rank_check::{build_change_message, CheckOutcome, RankCheck};
