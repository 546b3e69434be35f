//! 結合テスト共通ヘルパ
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const JUNIOR_HIGH_1: &str = r#"{
  "version": "1.2.0",
  "name": "中学1年",
  "cards": [
    {
      "english": "bike",
      "japanese": "自転車",
      "partOfSpeech": "名詞"
    },
    {
      "english": "hat",
      "japanese": "帽子",
      "partOfSpeech": "名詞"
    },
    {
      "english": "kind",
      "japanese": "親切な",
      "partOfSpeech": "形容詞"
    }
  ]
}"#;

pub const JUNIOR_HIGH_2: &str = r#"{
  "version": "1.3.0",
  "name": "中学2年",
  "cards": [
    {
      "english": "well",
      "japanese": "よく",
      "partOfSpeech": "副詞"
    },
    {
      "english": "well",
      "japanese": "健康な",
      "partOfSpeech": "形容詞"
    },
    {
      "english": "healthy",
      "japanese": "健康な"
    },
    {
      "english": "most",
      "japanese": "ほとんど"
    }
  ]
}"#;

/// 単語帳を置いた一時ディレクトリ
pub struct DeckDir {
    pub dir: TempDir,
}

impl DeckDir {
    pub fn new(decks: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        for (name, body) in decks {
            fs::write(dir.path().join(name), body).expect("write deck");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).expect("read deck")
    }

    pub fn json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(name)).expect("parse deck")
    }

    pub fn write(&self, name: &str, body: &str) {
        fs::write(self.file(name), body).expect("write file");
    }
}

/// リポジトリ同梱のパッチ計画
pub fn bundled_plan_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("decks/patches.json")
}
