//! 単語帳（Deck）とカードの読み取りビュー、リポジトリ抽象 – ドメイン層
//!
//! 単語帳は JSON オブジェクトのまま保持します。`version` / `cards` 以外の
//! キーやカードの未知フィールドも、元の順序のまま書き戻されます。

use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const VERSION_KEY: &str = "version";
pub const CARDS_KEY: &str = "cards";
pub const ENGLISH_KEY: &str = "english";
pub const JAPANESE_KEY: &str = "japanese";
pub const PART_OF_SPEECH_KEY: &str = "partOfSpeech";

/// 1 つの単語帳ファイルの内容
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    root: Map<String, Value>,
}

/// カード 1 件の読み取りビュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card<'a> {
    /// `cards` 内の位置（0-based）
    pub index: usize,
    pub english: &'a str,
    /// 文字列でない・存在しない場合は `None`
    pub japanese: Option<&'a str>,
    pub part_of_speech: Option<&'a str>,
}

impl<'a> Card<'a> {
    /// `cards[index]` の JSON 値からビューを作る。`english` が無いカードはスキーマ違反。
    pub fn from_value(index: usize, value: &'a Value) -> Result<Self, DeckError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DeckError::Schema(format!("card #{index} is not an object")))?;
        let english = obj
            .get(ENGLISH_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DeckError::Schema(format!("card #{index} has no string `{ENGLISH_KEY}` field"))
            })?;
        Ok(Card {
            index,
            english,
            japanese: obj.get(JAPANESE_KEY).and_then(Value::as_str),
            part_of_speech: obj.get(PART_OF_SPEECH_KEY).and_then(Value::as_str),
        })
    }
}

impl Deck {
    /// JSON 値から単語帳を作る。トップレベルはオブジェクトでなければならない。
    pub fn from_value(value: Value) -> Result<Self, DeckError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DeckError::Schema(format!(
                "top level must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// 現在のバージョン。文字列以外が入っている場合はその JSON 表記を返す。
    pub fn version(&self) -> Option<String> {
        self.root.get(VERSION_KEY).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// `version` を無条件に置き換え、以前の値を返します。
    ///
    /// 新しいバージョンが大きいかどうかは検証しません。
    pub fn bump_version(&mut self, new_version: &str) -> Option<String> {
        let previous = self.version();
        match self.root.get_mut(VERSION_KEY) {
            Some(slot) => *slot = Value::String(new_version.to_owned()),
            None => {
                self.root
                    .insert(VERSION_KEY.to_owned(), Value::String(new_version.to_owned()));
            }
        }
        previous
    }

    /// `cards` 配列。存在しない・配列でない場合はスキーマ違反。
    pub fn cards(&self) -> Result<&Vec<Value>, DeckError> {
        match self.root.get(CARDS_KEY) {
            Some(Value::Array(cards)) => Ok(cards),
            Some(other) => Err(DeckError::Schema(format!(
                "`{CARDS_KEY}` must be an array, found {}",
                json_kind(other)
            ))),
            None => Err(DeckError::Schema(format!("missing `{CARDS_KEY}` field"))),
        }
    }

    pub(crate) fn cards_mut(&mut self) -> Result<&mut Vec<Value>, DeckError> {
        match self.root.get_mut(CARDS_KEY) {
            Some(Value::Array(cards)) => Ok(cards),
            Some(_) => Err(DeckError::Schema(format!("`{CARDS_KEY}` must be an array"))),
            None => Err(DeckError::Schema(format!("missing `{CARDS_KEY}` field"))),
        }
    }

    /// 全カードのビュー
    pub fn card_views(&self) -> Result<Vec<Card<'_>>, DeckError> {
        self.cards()?
            .iter()
            .enumerate()
            .map(|(i, v)| Card::from_value(i, v))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 単語帳永続化 I/F
pub trait DeckRepository {
    fn load(&self, path: &Path) -> Result<Deck, DeckError>;
    fn save(&self, path: &Path, deck: &Deck) -> Result<(), DeckError>;
}
