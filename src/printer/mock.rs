use super::{PrintOptions, PrinterBackend, PrinterDescriptor};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A job recorded by [`MockBackend`].
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    pub path: PathBuf,
    pub printer: Option<String>,
    pub options: PrintOptions,
}

/// In-memory backend used for tests.
#[derive(Default)]
pub struct MockBackend {
    printers: Vec<PrinterDescriptor>,
    failing_files: Vec<String>,
    jobs: Mutex<Vec<SubmittedJob>>,
}

impl MockBackend {
    pub fn with_printers(names: &[&str], default: Option<&str>) -> Self {
        let printers = names
            .iter()
            .map(|name| PrinterDescriptor {
                name: name.to_string(),
                is_default: Some(*name) == default,
                status: "idle".into(),
            })
            .collect();
        Self {
            printers,
            ..Default::default()
        }
    }

    /// Make submissions of files with this name fail.
    pub fn fail_on(mut self, file_name: &str) -> Self {
        self.failing_files.push(file_name.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<SubmittedJob> {
        self.jobs.lock().expect("lock poisoned").clone()
    }
}

impl PrinterBackend for MockBackend {
    fn system_name(&self) -> &'static str {
        "Mock"
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>> {
        Ok(self.printers.clone())
    }

    fn submit(&self, path: &Path, printer: Option<&str>, options: &PrintOptions) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_files.contains(&name) {
            return Err(Error::PrintSubmissionFailed {
                path: path.to_path_buf(),
                reason: "printer offline".into(),
            });
        }

        self.jobs.lock().expect("lock poisoned").push(SubmittedJob {
            path: path.to_path_buf(),
            printer: printer.map(str::to_string),
            options: options.clone(),
        });
        Ok(())
    }
}
