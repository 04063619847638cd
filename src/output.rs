use crate::error::{Error, Result};
use crate::page_range::{PageRange, SplitPlan};
use std::path::{Path, PathBuf};

/// What to do when a planned output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    Fail,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// 1-based position in the plan
    pub index: usize,
    pub range: PageRange,
    pub path: PathBuf,
}

impl OutputFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub fn chunk_file_name(stem: &str, index: usize) -> String {
    format!("{}_part_{:03}.pdf", stem, index)
}

/// Compute the output path for every chunk in `plan`, without touching disk.
pub fn plan_outputs(stem: &str, output_dir: &Path, plan: &SplitPlan) -> Vec<OutputFile> {
    plan.ranges
        .iter()
        .enumerate()
        .map(|(i, range)| OutputFile {
            index: i + 1,
            range: *range,
            path: output_dir.join(chunk_file_name(stem, i + 1)),
        })
        .collect()
}

/// Create `output_dir` if needed and resolve output paths under `policy`.
///
/// With [`ConflictPolicy::Fail`] every planned path is checked before
/// anything is written, so a conflict leaves the directory untouched. Files
/// that don't match a planned name are never considered.
pub fn prepare_outputs(
    stem: &str,
    output_dir: &Path,
    plan: &SplitPlan,
    policy: ConflictPolicy,
) -> Result<Vec<OutputFile>> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::WriteFailed {
        path: output_dir.to_path_buf(),
        completed: 0,
        reason: format!("cannot create output directory: {}", e),
    })?;

    let outputs = plan_outputs(stem, output_dir, plan);

    let existing: Vec<PathBuf> = outputs
        .iter()
        .filter(|o| o.path.exists())
        .map(|o| o.path.clone())
        .collect();

    if !existing.is_empty() {
        match policy {
            ConflictPolicy::Fail => return Err(Error::FileConflict { paths: existing }),
            ConflictPolicy::Overwrite => {
                tracing::warn!(count = existing.len(), "overwriting existing output files");
            }
        }
    }

    Ok(outputs)
}
