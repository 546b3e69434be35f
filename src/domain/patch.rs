//! 訳語の修正テーブルと、それを単語帳へ適用するレコードパッチャ
//!
//! パッチャ自体は I/O を行いません。読み込み・書き戻しは
//! [`DeckRepository`](super::deck::DeckRepository) の実装が担当します。

use super::deck::{Card, Deck, JAPANESE_KEY};
use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// 品詞を限定した修正
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SenseCorrection {
    pub japanese: String,
    /// `None` ならどの品詞にも適用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

/// 1 つの英単語に対する置換後の訳語
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replacement {
    /// 全ての語義に適用
    Plain(String),
    Sense(SenseCorrection),
    Senses(Vec<SenseCorrection>),
}

impl Replacement {
    /// カードの品詞に対して適用すべき訳語を返す。
    ///
    /// 品詞が一致する修正を優先し、無ければ品詞指定なしの修正を使う。
    pub fn resolve(&self, part_of_speech: Option<&str>) -> Option<&str> {
        match self {
            Replacement::Plain(s) => Some(s.as_str()),
            Replacement::Sense(sense) => sense_matches(sense, part_of_speech),
            Replacement::Senses(senses) => senses
                .iter()
                .find(|s| {
                    s.part_of_speech.is_some() && s.part_of_speech.as_deref() == part_of_speech
                })
                .or_else(|| senses.iter().find(|s| s.part_of_speech.is_none()))
                .map(|s| s.japanese.as_str()),
        }
    }
}

fn sense_matches<'r>(sense: &'r SenseCorrection, part_of_speech: Option<&str>) -> Option<&'r str> {
    match sense.part_of_speech.as_deref() {
        None => Some(sense.japanese.as_str()),
        Some(tag) if Some(tag) == part_of_speech => Some(sense.japanese.as_str()),
        Some(_) => None,
    }
}

impl From<&str> for Replacement {
    fn from(s: &str) -> Self {
        Replacement::Plain(s.to_owned())
    }
}

impl From<String> for Replacement {
    fn from(s: String) -> Self {
        Replacement::Plain(s)
    }
}

/// 英単語 → 置換後訳語 の修正テーブル（記述順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CorrectionTable {
    entries: Vec<(String, Replacement)>,
    index: HashMap<String, usize>,
}

impl CorrectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加 or 置換
    pub fn insert(&mut self, english: impl Into<String>, replacement: impl Into<Replacement>) {
        let english = english.into();
        let replacement = replacement.into();
        match self.index.get(&english) {
            Some(&i) => self.entries[i].1 = replacement,
            None => {
                self.index.insert(english.clone(), self.entries.len());
                self.entries.push((english, replacement));
            }
        }
    }

    pub fn get(&self, english: &str) -> Option<&Replacement> {
        self.get_key_value(english).map(|(_, r)| r)
    }

    pub fn get_key_value(&self, english: &str) -> Option<(&str, &Replacement)> {
        self.index
            .get(english)
            .map(|&i| (self.entries[i].0.as_str(), &self.entries[i].1))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Replacement)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, R: Into<Replacement>> FromIterator<(K, R)> for CorrectionTable {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut table = CorrectionTable::new();
        for (k, r) in iter {
            table.insert(k, r);
        }
        table
    }
}

impl TryFrom<Map<String, Value>> for CorrectionTable {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut table = CorrectionTable::new();
        for (english, value) in map {
            let replacement: Replacement = serde_json::from_value(value)?;
            table.insert(english, replacement);
        }
        Ok(table)
    }
}

impl Serialize for CorrectionTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, r) in &self.entries {
            map.serialize_entry(k, r)?;
        }
        map.end()
    }
}

/// 書き換えられたカード 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChange {
    pub index: usize,
    pub english: String,
    pub part_of_speech: Option<String>,
    pub before: String,
    pub after: String,
}

/// パッチ適用結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// カード順
    pub changes: Vec<CardChange>,
    /// 単語帳に存在しなかった修正キー（エラーではない）
    pub unmatched: Vec<String>,
}

impl PatchOutcome {
    /// 少なくとも 1 枚のカードの訳語が実際に変わったか
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// 修正テーブルを単語帳に適用します。
///
/// `english` がテーブルのキーに一致し、品詞指定がある場合は `partOfSpeech` も
/// 一致したカードの `japanese` を置き換えます。現在値と同じ訳語への置換は
/// 変更として数えません。
pub fn patch(deck: &mut Deck, corrections: &CorrectionTable) -> Result<PatchOutcome, DeckError> {
    patch_where(deck, corrections, |_| true)
}

/// [`patch`] に追加の絞り込み条件を付けたもの
///
/// 検証（スキーマ確認）は全カードについて書き換え前に行うため、
/// エラー時に単語帳が中途半端に変更されることはありません。
pub fn patch_where<F>(
    deck: &mut Deck,
    corrections: &CorrectionTable,
    filter: F,
) -> Result<PatchOutcome, DeckError>
where
    F: Fn(&Card<'_>) -> bool,
{
    let mut changes = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for card in deck.card_views()? {
        let Some((key, replacement)) = corrections.get_key_value(card.english) else {
            continue;
        };
        seen.insert(key);
        let Some(after) = replacement.resolve(card.part_of_speech) else {
            continue;
        };
        if !filter(&card) {
            continue;
        }
        let before = card.japanese.ok_or_else(|| {
            DeckError::Schema(format!(
                "card #{} ({}) has no string `{JAPANESE_KEY}` field",
                card.index, card.english
            ))
        })?;
        if before == after {
            continue;
        }
        changes.push(CardChange {
            index: card.index,
            english: card.english.to_owned(),
            part_of_speech: card.part_of_speech.map(str::to_owned),
            before: before.to_owned(),
            after: after.to_owned(),
        });
    }

    let unmatched = corrections
        .keys()
        .filter(|k| !seen.contains(k))
        .map(str::to_owned)
        .collect();

    let cards = deck.cards_mut()?;
    for change in &changes {
        if let Some(slot) = cards
            .get_mut(change.index)
            .and_then(Value::as_object_mut)
            .and_then(|card| card.get_mut(JAPANESE_KEY))
        {
            *slot = Value::String(change.after.clone());
        }
    }

    Ok(PatchOutcome { changes, unmatched })
}

// === Unit tests ==========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deck(value: Value) -> Deck {
        Deck::from_value(value).unwrap()
    }

    fn table<const N: usize>(pairs: [(&str, &str); N]) -> CorrectionTable {
        pairs.into_iter().collect()
    }

    #[test]
    fn bike_is_rewritten() {
        let mut d = deck(json!({
            "version": "1.2.0",
            "cards": [{"english": "bike", "japanese": "自転車"}]
        }));

        let outcome = patch(&mut d, &table([("bike", "自転車(bike)")])).unwrap();

        assert!(outcome.changed());
        assert_eq!(
            d.into_value(),
            json!({
                "version": "1.2.0",
                "cards": [{"english": "bike", "japanese": "自転車(bike)"}]
            })
        );
    }

    /// テーブルにあって単語帳に無いキーは無視される
    #[test]
    fn unmatched_key_changes_nothing() {
        let original = json!({
            "version": "1.2.0",
            "cards": [{"english": "bike", "japanese": "自転車"}]
        });
        let mut d = deck(original.clone());

        let outcome = patch(&mut d, &table([("car", "車")])).unwrap();

        assert!(!outcome.changed());
        assert_eq!(outcome.unmatched, ["car"]);
        assert_eq!(d.into_value(), original);
    }

    #[test]
    fn patch_is_idempotent() {
        let mut d = deck(json!({"cards": [
            {"english": "most", "japanese": "ほとんど"},
            {"english": "hat", "japanese": "帽子"},
            {"english": "dog", "japanese": "犬"}
        ]}));
        let m = table([("most", "ほとんど(最も)"), ("hat", "帽子(ハット)")]);

        let first = patch(&mut d, &m).unwrap();
        let once = d.clone();
        let second = patch(&mut d, &m).unwrap();

        assert_eq!(first.changes.len(), 2);
        assert!(!second.changed());
        assert_eq!(d, once);
    }

    /// 一致しないカードは全フィールドそのまま、件数と順序も保持
    #[test]
    fn untouched_cards_are_identical_and_order_is_kept() {
        let original = json!({"cards": [
            {"english": "dog", "japanese": "犬", "phonetic": "dɔːɡ", "example": "I have a dog."},
            {"english": "post", "japanese": "郵便"},
            {"english": "cat", "japanese": "猫", "partOfSpeech": "名詞"}
        ]});
        let mut d = deck(original.clone());

        patch(&mut d, &table([("post", "郵便(投函)")])).unwrap();

        let after = d.cards().unwrap();
        let before = original["cards"].as_array().unwrap();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1]["english"], "post");
        assert_eq!(after[1]["japanese"], "郵便(投函)");
    }

    /// 同じ english を持つ全カードに適用される
    #[test]
    fn plain_replacement_applies_to_every_sense() {
        let mut d = deck(json!({"cards": [
            {"english": "kind", "japanese": "親切な", "partOfSpeech": "形容詞"},
            {"english": "kind", "japanese": "種類", "partOfSpeech": "名詞"}
        ]}));

        let outcome = patch(&mut d, &table([("kind", "種類(タイプ)")])).unwrap();

        assert_eq!(outcome.changes.len(), 2);
        assert_eq!(d.cards().unwrap()[0]["japanese"], "種類(タイプ)");
    }

    #[test]
    fn sense_correction_only_touches_matching_part_of_speech() {
        let mut d = deck(json!({"cards": [
            {"english": "well", "japanese": "よく"},
            {"english": "well", "japanese": "健康な", "partOfSpeech": "adjective"}
        ]}));
        let mut m = CorrectionTable::new();
        m.insert(
            "well",
            Replacement::Sense(SenseCorrection {
                japanese: "健康な(良好)".into(),
                part_of_speech: Some("adjective".into()),
            }),
        );

        let outcome = patch(&mut d, &m).unwrap();

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].index, 1);
        let cards = d.cards().unwrap();
        assert_eq!(cards[0]["japanese"], "よく");
        assert_eq!(cards[1]["japanese"], "健康な(良好)");
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn senses_prefer_exact_part_of_speech_then_fallback() {
        let r = Replacement::Senses(vec![
            SenseCorrection {
                japanese: "一般".into(),
                part_of_speech: None,
            },
            SenseCorrection {
                japanese: "形容".into(),
                part_of_speech: Some("形容詞".into()),
            },
        ]);
        assert_eq!(r.resolve(Some("形容詞")), Some("形容"));
        assert_eq!(r.resolve(Some("名詞")), Some("一般"));
        assert_eq!(r.resolve(None), Some("一般"));
    }

    #[test]
    fn filter_narrows_matches() {
        let mut d = deck(json!({"cards": [
            {"english": "light", "japanese": "明るい"},
            {"english": "light", "japanese": "光"}
        ]}));

        let outcome =
            patch_where(&mut d, &table([("light", "明るい(光)")]), |c| c.index == 0).unwrap();

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(d.cards().unwrap()[1]["japanese"], "光");
    }

    /// 一致したカードに japanese が無ければ何も書き換えずにエラー
    #[test]
    fn matched_card_without_japanese_fails_before_mutation() {
        let original = json!({"cards": [
            {"english": "dog", "japanese": "犬"},
            {"english": "cat"}
        ]});
        let mut d = deck(original.clone());

        let err = patch(&mut d, &table([("dog", "犬(dog)"), ("cat", "猫")])).unwrap_err();

        assert!(matches!(err, DeckError::Schema(_)));
        assert_eq!(d.into_value(), original);
    }

    #[test]
    fn missing_cards_is_schema_error() {
        let mut d = deck(json!({"version": "1.0.0"}));
        let err = patch(&mut d, &table([("dog", "犬")])).unwrap_err();
        assert!(err.to_string().contains("missing `cards`"));
    }

    #[test]
    fn unknown_card_fields_keep_their_order() {
        let mut d = deck(json!({"cards": [
            {"phonetic": "baɪk", "japanese": "自転車", "english": "bike", "status": 0}
        ]}));

        patch(&mut d, &table([("bike", "自転車(bike)")])).unwrap();

        let card = d.cards().unwrap()[0].as_object().unwrap();
        let keys: Vec<_> = card.keys().cloned().collect();
        assert_eq!(keys, ["phonetic", "japanese", "english", "status"]);
    }

    #[test]
    fn table_deserializes_plain_and_sense_entries_in_order() {
        let m: CorrectionTable = serde_json::from_value(json!({
            "test": "テスト",
            "well": {"japanese": "健康な(良好)", "partOfSpeech": "形容詞"},
            "light": [
                {"japanese": "明るい(光)", "partOfSpeech": "形容詞"},
                {"japanese": "光"}
            ]
        }))
        .unwrap();

        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, ["test", "well", "light"]);
        assert_eq!(m.get("test"), Some(&Replacement::from("テスト")));
        assert_eq!(m.get("well").unwrap().resolve(Some("形容詞")), Some("健康な(良好)"));
        assert_eq!(m.get("well").unwrap().resolve(None), None);
        assert_eq!(m.get("light").unwrap().resolve(Some("名詞")), Some("光"));
    }

    #[test]
    fn table_rejects_unknown_sense_fields() {
        let res: Result<CorrectionTable, _> =
            serde_json::from_value(json!({"well": {"japanese": "x", "pos": "形容詞"}}));
        assert!(res.is_err());
    }
}
