//! パッチ計画ファイル (`patches.json`) の読み込み
use crate::domain::plan::PatchPlan;
use crate::error::PlanError;
use std::{fs, path::Path};

/// 計画ファイルを読み込み、検証済みの計画を返す
pub fn load_plan(path: &Path) -> Result<PatchPlan, PlanError> {
    let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let plan: PatchPlan = serde_json::from_str(&text).map_err(|source| PlanError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    plan.validate()?;
    tracing::debug!(
        path = %path.display(),
        sets = plan.patch_sets.len(),
        "patch plan loaded"
    );
    Ok(plan)
}
