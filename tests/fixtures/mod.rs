// テストユーティリティとモック実装
// 統合テスト共通のモジュール実装と入力ツリーのヘルパー

#![allow(dead_code)]

pub mod mocks;
pub mod test_data;

// 公開API
pub use mocks::*;
pub use test_data::*;
