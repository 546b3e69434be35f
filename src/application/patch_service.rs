//! パッチ計画の適用サービス
//!
//! ファイル単位で 読み込み → 計画順にパッチ → 書き戻し を行います。
//! 1 ファイルの失敗は報告して次のファイルへ進みます。

use crate::domain::deck::DeckRepository;
use crate::domain::patch::{CardChange, patch};
use crate::domain::plan::{FileSchedule, PatchPlan};
use crate::error::DeckError;
use crate::infrastructure::config::PatcherConfig;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// どのパッチセットが行った変更か
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub set: String,
    pub change: CardChange,
}

/// 同じ実行内で、先のセットの変更を後のセットが上書きしたもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub index: usize,
    pub english: String,
    pub earlier_set: String,
    pub earlier_value: String,
    pub later_set: String,
    pub later_value: String,
}

/// 単語帳に存在しなかった修正キー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub set: String,
    pub english: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    /// 最後にバージョンを指定したセット
    pub set: String,
    /// `None` は元ファイルに version が無かったことを示す
    pub previous: Option<String>,
    pub new: String,
}

impl VersionChange {
    pub fn is_change(&self) -> bool {
        self.previous.as_deref() != Some(self.new.as_str())
    }
}

/// 1 ファイル分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub changes: Vec<AppliedChange>,
    pub overrides: Vec<Override>,
    pub unmatched: Vec<Unmatched>,
    pub version: Option<VersionChange>,
    /// 実際にディスクへ書き戻したか（dry-run では常に false）
    pub written: bool,
}

impl FileReport {
    fn new(file: &str) -> Self {
        Self {
            file: file.to_owned(),
            ..Self::default()
        }
    }

    /// 書き戻しが必要な変更があるか
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty() || self.version.as_ref().is_some_and(VersionChange::is_change)
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Updated(FileReport),
    Unchanged(FileReport),
    Failed { file: String, error: DeckError },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            FileOutcome::Updated(r) | FileOutcome::Unchanged(r) => r.file.as_str(),
            FileOutcome::Failed { file, .. } => file.as_str(),
        }
    }

    pub fn report(&self) -> Option<&FileReport> {
        match self {
            FileOutcome::Updated(r) | FileOutcome::Unchanged(r) => Some(r),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// 計画全体の結果
#[derive(Debug)]
pub struct RunReport {
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Updated(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|o| pred(o)).count()
    }
}

/// パッチ計画適用サービス
pub struct PatchService<R: DeckRepository> {
    repo: R,
    config: PatcherConfig,
    dry_run: bool,
}

impl<R: DeckRepository> PatchService<R> {
    pub fn new(repo: R, config: PatcherConfig) -> Self {
        Self {
            repo,
            config,
            dry_run: false,
        }
    }

    /// 変更を計算するだけでファイルを書き換えない
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 計画を適用します。ファイルは計画中で最初に登場した順に処理されます。
    pub fn run(&self, plan: &PatchPlan) -> RunReport {
        let files = plan
            .schedule()
            .iter()
            .map(|schedule| self.run_file(schedule))
            .collect();
        RunReport {
            dry_run: self.dry_run,
            files,
        }
    }

    /// 1 ファイル分を適用。エラーはここで捕捉して `Failed` にする。
    pub fn run_file(&self, schedule: &FileSchedule<'_>) -> FileOutcome {
        let span = tracing::info_span!("deck", file = schedule.file);
        let _enter = span.enter();

        match self.apply_file(schedule) {
            Ok(report) if report.is_dirty() => FileOutcome::Updated(report),
            Ok(report) => FileOutcome::Unchanged(report),
            Err(error) => {
                error!(%error, "deck patch failed");
                FileOutcome::Failed {
                    file: schedule.file.to_owned(),
                    error,
                }
            }
        }
    }

    fn apply_file(&self, schedule: &FileSchedule<'_>) -> Result<FileReport, DeckError> {
        let path = self.config.deck_path(schedule.file);
        let mut deck = self.repo.load(&path)?;
        let mut report = FileReport::new(schedule.file);
        // card index → (set, value) の最後の書き手
        let mut last_writer: HashMap<usize, (&str, String)> = HashMap::new();

        for step in &schedule.steps {
            let target = step.target;

            if !target.corrections.is_empty() {
                let outcome = patch(&mut deck, &target.corrections)?;

                for english in outcome.unmatched {
                    warn!(set = step.set, %english, "correction key not found in deck");
                    report.unmatched.push(Unmatched {
                        set: step.set.to_owned(),
                        english,
                    });
                }

                for change in outcome.changes {
                    debug!(
                        set = step.set,
                        english = %change.english,
                        before = %change.before,
                        after = %change.after,
                        "card patched"
                    );
                    if let Some((earlier_set, earlier_value)) = last_writer.get(&change.index) {
                        warn!(
                            english = %change.english,
                            earlier_set,
                            later_set = step.set,
                            "later patch set overrides an earlier change"
                        );
                        report.overrides.push(Override {
                            index: change.index,
                            english: change.english.clone(),
                            earlier_set: (*earlier_set).to_owned(),
                            earlier_value: earlier_value.clone(),
                            later_set: step.set.to_owned(),
                            later_value: change.after.clone(),
                        });
                    }
                    last_writer.insert(change.index, (step.set, change.after.clone()));
                    report.changes.push(AppliedChange {
                        set: step.set.to_owned(),
                        change,
                    });
                }
            }

            if let Some(new_version) = &target.version {
                let previous = deck.bump_version(new_version);
                // 同じファイルに複数回指定された場合、previous は最初の値を保つ
                let previous = match report.version.take() {
                    Some(v) => v.previous,
                    None => previous,
                };
                report.version = Some(VersionChange {
                    set: step.set.to_owned(),
                    previous,
                    new: new_version.clone(),
                });
            }
        }

        if report.is_dirty() && !self.dry_run {
            self.repo.save(&path, &deck)?;
            report.written = true;
        }
        info!(
            changes = report.changes.len(),
            written = report.written,
            dry_run = self.dry_run,
            "deck processed"
        );
        Ok(report)
    }
}
