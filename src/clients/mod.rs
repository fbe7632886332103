pub mod captcha_client;
pub mod session_bridge;
pub mod workwx_client;

pub use captcha_client::{CaptchaApi, CaptchaClient};
pub use session_bridge::{Account, BridgeSession};
pub use workwx_client::{MessageSink, WorkWxClient};
