use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot read PDF {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("{} output file(s) already exist (use --force to overwrite): {}", .paths.len(), list_paths(.paths))]
    FileConflict { paths: Vec<PathBuf> },

    #[error("failed to write {} after {completed} part(s) were written: {reason}", .path.display())]
    WriteFailed {
        path: PathBuf,
        completed: usize,
        reason: String,
    },

    #[error("printer '{name}' not found (available: {})", available_list(.available))]
    PrinterNotFound { name: String, available: Vec<String> },

    #[error("failed to print {}: {reason}", .path.display())]
    PrintSubmissionFailed { path: PathBuf, reason: String },

    #[error("failed to query printers with {tool}: {reason}")]
    PrinterQueryFailed { tool: String, reason: String },
}

impl Error {
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

// Conflicts can number in the hundreds; keep the message readable.
fn list_paths(paths: &[PathBuf]) -> String {
    const SHOWN: usize = 5;
    let mut listed: Vec<String> = paths
        .iter()
        .take(SHOWN)
        .map(|p| p.display().to_string())
        .collect();
    if paths.len() > SHOWN {
        listed.push(format!("... and {} more", paths.len() - SHOWN));
    }
    listed.join(", ")
}

fn available_list(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
