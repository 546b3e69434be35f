pub mod patch_service;
pub mod report;

pub use patch_service::{
    AppliedChange, FileOutcome, FileReport, Override, PatchService, RunReport, Unmatched,
    VersionChange,
};
