//! 単語帳 JSON の訳語修正ツール
//!
//! 修正内容は順序付きのパッチ計画ファイルとして外部化し、
//! 1 つの汎用パッチャで全単語帳に適用します。

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils {
    pub mod config;
    pub mod env;
}

pub use error::{DeckError, PatcherError, PlanError, Result};
