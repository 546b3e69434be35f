//! パッチ計画: 名前付きパッチセットの順序付きリスト
//!
//! 後に並んだパッチセットほど優先されます（last-applied-wins）。
//! どの変更がどのセット由来かを追えるよう、スケジュールは常にセット名を伴います。

use super::patch::CorrectionTable;
use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// パッチ計画ファイル全体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPlan {
    pub patch_sets: Vec<PatchSet>,
}

/// 1 ステップ分の修正（元の修正スクリプト 1 本に相当）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub targets: Vec<PatchTarget>,
}

/// 単語帳ファイル 1 つに対する修正
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchTarget {
    /// 単語帳ディレクトリからの相対パス
    pub file: String,
    /// 指定があれば無条件にこのバージョンへ更新
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub corrections: CorrectionTable,
}

/// ファイル単位にまとめた適用順
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSchedule<'a> {
    pub file: &'a str,
    pub steps: Vec<ScheduledStep<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep<'a> {
    /// 由来のパッチセット名
    pub set: &'a str,
    pub target: &'a PatchTarget,
}

/// 同じファイルの同じ英単語を複数のセットが修正している箇所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap<'a> {
    pub file: &'a str,
    pub english: &'a str,
    /// 適用順。最後のセットが最終的な値を決める
    pub sets: Vec<&'a str>,
}

impl PatchPlan {
    /// 構造上の整合性を検証します。
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut names = HashSet::new();
        for set in &self.patch_sets {
            if set.name.trim().is_empty() {
                return Err(PlanError::Invalid("patch set name must not be empty".into()));
            }
            if !names.insert(set.name.as_str()) {
                return Err(PlanError::Invalid(format!(
                    "duplicate patch set name `{}`",
                    set.name
                )));
            }
            for target in &set.targets {
                if target.file.trim().is_empty() {
                    return Err(PlanError::Invalid(format!(
                        "patch set `{}` has a target without `file`",
                        set.name
                    )));
                }
                if target.version.is_none() && target.corrections.is_empty() {
                    return Err(PlanError::Invalid(format!(
                        "patch set `{}` target `{}` has neither `version` nor `corrections`",
                        set.name, target.file
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.patch_sets.iter().map(|s| s.name.as_str())
    }

    /// 指定した名前のセットだけを、計画内の順序のまま残した計画を返す。
    ///
    /// `only` が空なら全セット。
    pub fn select(&self, only: &[String]) -> Result<PatchPlan, PlanError> {
        if only.is_empty() {
            return Ok(self.clone());
        }
        for name in only {
            if !self.patch_sets.iter().any(|s| &s.name == name) {
                let available = self.set_names().collect::<Vec<_>>().join(", ");
                return Err(PlanError::UnknownSet(name.clone(), available));
            }
        }
        Ok(PatchPlan {
            patch_sets: self
                .patch_sets
                .iter()
                .filter(|s| only.contains(&s.name))
                .cloned()
                .collect(),
        })
    }

    /// ファイルごとに、計画順で適用すべきステップをまとめる。
    ///
    /// ファイルの並びは計画中で最初に登場した順。
    pub fn schedule(&self) -> Vec<FileSchedule<'_>> {
        let mut out: Vec<FileSchedule<'_>> = Vec::new();
        let mut by_file: HashMap<&str, usize> = HashMap::new();
        for set in &self.patch_sets {
            for target in &set.targets {
                let i = *by_file.entry(target.file.as_str()).or_insert_with(|| {
                    out.push(FileSchedule {
                        file: &target.file,
                        steps: Vec::new(),
                    });
                    out.len() - 1
                });
                out[i].steps.push(ScheduledStep {
                    set: &set.name,
                    target,
                });
            }
        }
        out
    }

    /// 複数セットから修正される (ファイル, 英単語) の一覧
    pub fn overlaps(&self) -> Vec<Overlap<'_>> {
        let mut out = Vec::new();
        for schedule in self.schedule() {
            let mut order: Vec<&str> = Vec::new();
            let mut sets: HashMap<&str, Vec<&str>> = HashMap::new();
            for step in &schedule.steps {
                for english in step.target.corrections.keys() {
                    let entry = sets.entry(english).or_insert_with(|| {
                        order.push(english);
                        Vec::new()
                    });
                    if entry.last() != Some(&step.set) {
                        entry.push(step.set);
                    }
                }
            }
            for english in order {
                let Some(names) = sets.remove(english) else {
                    continue;
                };
                if names.len() > 1 {
                    out.push(Overlap {
                        file: schedule.file,
                        english,
                        sets: names,
                    });
                }
            }
        }
        out
    }
}
