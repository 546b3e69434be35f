//! 統一エラーハンドリング
//!
//! 単語帳ファイル単位のエラー (`DeckError`)、パッチ計画のエラー (`PlanError`)、
//! それらをまとめるクレート全体のエラー型 (`PatcherError`) を定義します。

use std::{io, path::PathBuf};
use thiserror::Error;

/// 単語帳ファイル 1 件の処理で発生するエラー
#[derive(Debug, Error)]
pub enum DeckError {
    /// ファイルが存在しない・読めない・書けない
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON として解釈できない
    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `cards` が無い、カードに `english` が無い等
    #[error("unexpected deck layout: {0}")]
    Schema(String),
}

impl DeckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DeckError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DeckError::Parse {
            path: path.into(),
            source,
        }
    }
}

/// パッチ計画ファイルのエラー
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("cannot read patch plan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed patch plan {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid patch plan: {0}")]
    Invalid(String),

    /// `--only` で指定されたパッチセットが存在しない (requested, available)
    #[error("unknown patch set `{0}` (available: {1})")]
    UnknownSet(String, String),
}

/// deck_patcher 全体で使用する統一エラー型
#[derive(Debug, Error)]
pub enum PatcherError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Configuration initialization error: {0}")]
    ConfigInitError(String),
}

/// 統一Result型エイリアス
pub type Result<T> = std::result::Result<T, PatcherError>;

impl PatcherError {
    /// エラーがユーザーアクション（ファイル修正・引数修正）で解決可能かどうか
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PatcherError::Plan(_)
                | PatcherError::ConfigInitError(_)
                | PatcherError::Deck(DeckError::Schema(_) | DeckError::Parse { .. })
        )
    }
}
