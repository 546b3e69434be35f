//! グローバル環境変数設定
//!
//! プロセス起動時に一度だけ初期化し、以降はどこからでもアクセス可能。

use crate::error::{PatcherError, Result};
use once_cell::sync::OnceCell;
use std::{env, path::PathBuf, sync::Arc};

/// グローバル環境変数設定
static ENV_CONFIG: OnceCell<Arc<EnvConfig>> = OnceCell::new();

pub const DECK_DIR_VAR: &str = "DECK_PATCHER_DECK_DIR";
pub const PLAN_VAR: &str = "DECK_PATCHER_PLAN";
pub const ENV_PATH_VAR: &str = "DECK_PATCHER_ENV_PATH";

/// 環境変数設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// 単語帳ディレクトリ
    pub deck_dir: Option<PathBuf>,
    /// パッチ計画ファイル
    pub plan_path: Option<PathBuf>,
    /// 環境変数ファイルのパス
    pub env_path: Option<PathBuf>,
}

impl EnvConfig {
    /// 環境変数から設定を読み取る（グローバルには登録しない）
    pub fn from_env() -> Result<Self> {
        Ok(EnvConfig {
            deck_dir: read_path_var(DECK_DIR_VAR)?,
            plan_path: read_path_var(PLAN_VAR)?,
            env_path: read_path_var(ENV_PATH_VAR)?,
        })
    }

    /// 環境変数から設定を初期化
    ///
    /// 既に初期化済みの場合は何もせずOkを返す。
    pub fn init() -> Result<()> {
        if ENV_CONFIG.get().is_some() {
            return Ok(());
        }
        let config = Self::from_env()?;
        let _ = ENV_CONFIG.set(Arc::new(config));
        Ok(())
    }

    /// 設定を取得。未初期化なら空の設定を返す。
    pub fn get() -> Arc<EnvConfig> {
        ENV_CONFIG.get().cloned().unwrap_or_default()
    }
}

fn read_path_var(name: &str) -> Result<Option<PathBuf>> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(PathBuf::from(v))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(PatcherError::ConfigInitError(format!(
            "{name} is not valid unicode"
        ))),
    }
}
