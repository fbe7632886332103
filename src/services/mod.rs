pub mod captcha_solver;
pub mod notifier;
pub mod session_manager;

pub use captcha_solver::CaptchaSolver;
pub use notifier::{Notifier, Priority};
pub use session_manager::SessionManager;
