use crate::utils::config::EnvConfig;
use std::path::PathBuf;

pub const DEFAULT_DECK_DIR: &str = "decks";
pub const PLAN_FILE_NAME: &str = "patches.json";

/// 実行時に使う単語帳ディレクトリと計画ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatcherConfig {
    pub deck_dir: PathBuf,
    pub plan_path: PathBuf,
}

impl PatcherConfig {
    /// CLI 引数 > 環境変数 > 既定値 の順で決定
    pub fn resolve(deck_dir: Option<PathBuf>, plan_path: Option<PathBuf>) -> Self {
        Self::resolve_with(&EnvConfig::get(), deck_dir, plan_path)
    }

    pub fn resolve_with(
        env: &EnvConfig,
        deck_dir: Option<PathBuf>,
        plan_path: Option<PathBuf>,
    ) -> Self {
        let deck_dir = deck_dir
            .or_else(|| env.deck_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DECK_DIR));
        // 計画ファイルは既定で単語帳と同じディレクトリに置く
        let plan_path = plan_path
            .or_else(|| env.plan_path.clone())
            .unwrap_or_else(|| deck_dir.join(PLAN_FILE_NAME));
        Self {
            deck_dir,
            plan_path,
        }
    }

    pub fn deck_path(&self, file: &str) -> PathBuf {
        self.deck_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PatcherConfig::resolve_with(&EnvConfig::default(), None, None);
        assert_eq!(cfg.deck_dir, PathBuf::from("decks"));
        assert_eq!(cfg.plan_path, PathBuf::from("decks").join("patches.json"));
    }

    #[test]
    fn plan_follows_deck_dir() {
        let cfg =
            PatcherConfig::resolve_with(&EnvConfig::default(), Some("Resources/Decks".into()), None);
        assert_eq!(cfg.plan_path, PathBuf::from("Resources/Decks/patches.json"));
    }

    #[test]
    fn cli_wins_over_env() {
        let env = EnvConfig {
            deck_dir: Some("from_env".into()),
            plan_path: Some("env_plan.json".into()),
            env_path: None,
        };

        let cfg = PatcherConfig::resolve_with(&env, Some("from_cli".into()), None);
        assert_eq!(cfg.deck_dir, PathBuf::from("from_cli"));
        assert_eq!(cfg.plan_path, PathBuf::from("env_plan.json"));

        let cfg = PatcherConfig::resolve_with(&env, None, None);
        assert_eq!(cfg.deck_dir, PathBuf::from("from_env"));
        assert_eq!(cfg.deck_path("a.json"), PathBuf::from("from_env").join("a.json"));
    }
}
