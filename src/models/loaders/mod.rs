pub mod watch_loader;

pub use watch_loader::load_watch_ids;
