//! JSON ファイル版 DeckRepository 実装
use crate::domain::deck::{Deck, DeckRepository};
use crate::error::DeckError;
use serde_json::Value;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// 単語帳 JSON の読み書き
///
/// 書き出しはインデント 2・非 ASCII をエスケープしない形式で、
/// `<name>.json.tmp` に書いてから rename で置き換えます。
#[derive(Debug, Clone, Default)]
pub struct JsonFileDeckRepo;

impl JsonFileDeckRepo {
    pub fn new() -> Self {
        Self
    }

    fn tmp_path(path: &Path) -> PathBuf {
        path.with_extension("json.tmp")
    }
}

fn write_then_rename(tmp: &Path, path: &Path, body: &[u8]) -> io::Result<()> {
    let mut f = fs::File::create(tmp)?;
    f.write_all(body)?;
    f.sync_all()?;
    fs::rename(tmp, path)
}

/// 単語帳を保存時と同じ形式の文字列にする
pub fn to_pretty_string(deck: &Deck) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(deck)
}

impl DeckRepository for JsonFileDeckRepo {
    fn load(&self, path: &Path) -> Result<Deck, DeckError> {
        let text = fs::read_to_string(path).map_err(|e| DeckError::io(path, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| DeckError::parse(path, e))?;
        Deck::from_value(value)
    }

    fn save(&self, path: &Path, deck: &Deck) -> Result<(), DeckError> {
        let body = to_pretty_string(deck).map_err(|e| DeckError::parse(path, e))?;
        let tmp = Self::tmp_path(path);
        if let Err(e) = write_then_rename(&tmp, path, body.as_bytes()) {
            // 元ファイルは rename 成功まで置き換わらない
            let _ = fs::remove_file(&tmp);
            return Err(DeckError::io(path, e));
        }
        Ok(())
    }
}
