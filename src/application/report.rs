//! 実行結果・計画内容の表示用テキスト

use super::patch_service::{AppliedChange, FileOutcome, FileReport, Override, RunReport};
use crate::domain::plan::PatchPlan;

const UNKNOWN_VERSION: &str = "unknown";

/// `{file}: {english} | {old} -> {new}  [{set}]`
pub fn change_line(file: &str, applied: &AppliedChange) -> String {
    let c = &applied.change;
    let word = match &c.part_of_speech {
        Some(pos) => format!("{} ({})", c.english, pos),
        None => c.english.clone(),
    };
    format!(
        "{file}: {word} | {} -> {}  [{}]",
        c.before, c.after, applied.set
    )
}

pub fn override_line(file: &str, o: &Override) -> String {
    format!(
        "{file}: {} | {} の変更 ({}) を {} が上書き ({})",
        o.english, o.earlier_set, o.earlier_value, o.later_set, o.later_value
    )
}

fn version_line(report: &FileReport) -> Option<String> {
    let v = report.version.as_ref()?;
    Some(format!(
        "{}: version {} -> {}  [{}]",
        report.file,
        v.previous.as_deref().unwrap_or(UNKNOWN_VERSION),
        v.new,
        v.set
    ))
}

/// 1 ファイル分の表示行（変更行 → ステータス行）
pub fn file_lines(outcome: &FileOutcome, dry_run: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(report) = outcome.report() {
        lines.extend(report.changes.iter().map(|c| change_line(&report.file, c)));
        lines.extend(report.overrides.iter().map(|o| override_line(&report.file, o)));
        lines.extend(version_line(report));
    }
    lines.push(status_line(outcome, dry_run));
    lines
}

pub fn status_line(outcome: &FileOutcome, dry_run: bool) -> String {
    match outcome {
        FileOutcome::Updated(r) if dry_run => format!("🔍 {} 修正予定 (dry-run)", r.file),
        FileOutcome::Updated(r) => format!("✅ {} 修正完了", r.file),
        FileOutcome::Unchanged(r) => format!("⚠️  {} 変更なし", r.file),
        FileOutcome::Failed { file, error } => format!("❌ {file} エラー: {error}"),
    }
}

pub fn summary_line(report: &RunReport) -> String {
    let counts = format!(
        "更新 {} / 変更なし {} / エラー {}",
        report.updated(),
        report.unchanged(),
        report.failed()
    );
    if report.dry_run {
        format!("dry-run 完了: ファイルは書き換えていません ({counts})")
    } else if report.has_failures() {
        format!("修正完了 (一部エラーあり: {counts})")
    } else {
        format!("すべて修正完了 ({counts})")
    }
}

/// 実行結果全体の表示行
pub fn run_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in &report.files {
        lines.extend(file_lines(outcome, report.dry_run));
        lines.push(String::new());
    }
    lines.push(summary_line(report));
    lines
}

/// `list` サブコマンド用: 計画の内容と、複数セットが触る単語
pub fn plan_lines(plan: &PatchPlan) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, set) in plan.patch_sets.iter().enumerate() {
        match &set.description {
            Some(d) => lines.push(format!("{}. {}: {}", i + 1, set.name, d)),
            None => lines.push(format!("{}. {}", i + 1, set.name)),
        }
        for target in &set.targets {
            let mut parts = Vec::new();
            if !target.corrections.is_empty() {
                parts.push(format!("{} 件の修正", target.corrections.len()));
            }
            if let Some(v) = &target.version {
                parts.push(format!("version -> {v}"));
            }
            lines.push(format!("   {}: {}", target.file, parts.join(", ")));
        }
    }

    let overlaps = plan.overlaps();
    if !overlaps.is_empty() {
        lines.push(String::new());
        lines.push("複数のパッチセットが修正する単語 (最後のセットが優先):".to_string());
        for o in overlaps {
            lines.push(format!("   {}: {} <- {}", o.file, o.english, o.sets.join(" -> ")));
        }
    }
    lines
}
