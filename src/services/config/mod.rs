// 設定管理機能

pub mod implementations;
pub mod profile;

pub use implementations::{DefaultEngineConfig, DEFAULT_POLL_INTERVAL};
pub use profile::RunProfile;
