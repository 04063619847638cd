//! System printer access.
//!
//! One [`PrinterBackend`] is picked per process by [`detect`]: the Windows
//! spooler on Windows, CUPS (`lpstat`/`lpr`) everywhere else. Every call is a
//! single blocking subprocess; once a job is submitted the spooler owns it.

pub mod cups;
pub mod options;
pub mod windows;

#[cfg(test)]
pub mod mock;

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;
use std::process::{Command, Output};

pub use cups::CupsBackend;
pub use options::PrintOptions;
pub use windows::WindowsBackend;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterDescriptor {
    pub name: String,
    pub is_default: bool,
    pub status: String,
}

pub trait PrinterBackend {
    /// Human-readable name of the printing subsystem.
    fn system_name(&self) -> &'static str;

    /// Query the OS for its printers. No printers is an empty list, not an error.
    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>>;

    /// Hand `path` to the spooler without checking the printer name.
    fn submit(&self, path: &Path, printer: Option<&str>, options: &PrintOptions) -> Result<()>;

    fn default_printer(&self) -> Result<Option<String>> {
        Ok(self
            .list_printers()?
            .into_iter()
            .find(|p| p.is_default)
            .map(|p| p.name))
    }

    /// Print `path` on `printer`, or on the OS default when `None`.
    fn print_file(&self, path: &Path, printer: Option<&str>, options: &PrintOptions) -> Result<()> {
        if !path.is_file() {
            return Err(Error::PrintSubmissionFailed {
                path: path.to_path_buf(),
                reason: "file does not exist".into(),
            });
        }

        if let Some(name) = printer {
            let available: Vec<String> =
                self.list_printers()?.into_iter().map(|p| p.name).collect();
            if !available.iter().any(|p| p == name) {
                return Err(Error::PrinterNotFound {
                    name: name.to_string(),
                    available,
                });
            }
        }

        self.submit(path, printer, options)
    }
}

/// Pick the backend for the host OS.
pub fn detect() -> Box<dyn PrinterBackend> {
    if cfg!(target_os = "windows") {
        Box::new(WindowsBackend::new())
    } else {
        Box::new(CupsBackend::new())
    }
}

fn run(mut command: Command) -> std::io::Result<Output> {
    tracing::debug!(?command, "running");
    // Keep tool output in the C locale so it can be parsed.
    command.env("LC_ALL", "C").output()
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("command exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}
