use super::{failure_reason, run, PrintOptions, PrinterBackend, PrinterDescriptor};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

const LIST_SCRIPT: &str = "\
$default = (Get-CimInstance -ClassName Win32_Printer -Filter 'Default=TRUE').Name; \
Get-Printer | ForEach-Object { '{0}|{1}|{2}' -f $_.Name, ($_.Name -eq $default), $_.PrinterStatus }";

/// How printers are reached on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsMode {
    /// The spooler's PrintManagement interface (`Get-Printer`).
    PrintManagement,
    /// `wmic` for listing; used when PrintManagement is missing.
    Legacy,
}

/// Windows spooler backend.
///
/// The PrintManagement probe runs once, on first use.
#[derive(Debug, Default)]
pub struct WindowsBackend {
    mode: OnceLock<WindowsMode>,
}

impl WindowsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> WindowsMode {
        *self.mode.get_or_init(|| {
            let probe = powershell("Get-Command Get-Printer -ErrorAction Stop | Out-Null");
            let mode = match run(probe) {
                Ok(output) if output.status.success() => WindowsMode::PrintManagement,
                Ok(output) => {
                    debug!(reason = %failure_reason(&output), "PrintManagement unavailable");
                    WindowsMode::Legacy
                }
                Err(e) => {
                    debug!(error = %e, "powershell unavailable");
                    WindowsMode::Legacy
                }
            };
            info!(?mode, "selected Windows printing mode");
            mode
        })
    }
}

impl PrinterBackend for WindowsBackend {
    fn system_name(&self) -> &'static str {
        match self.mode() {
            WindowsMode::PrintManagement => "Windows (spooler)",
            WindowsMode::Legacy => "Windows (wmic fallback)",
        }
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>> {
        let (tool, command) = match self.mode() {
            WindowsMode::PrintManagement => ("powershell", powershell(LIST_SCRIPT)),
            WindowsMode::Legacy => {
                let mut command = Command::new("wmic");
                command.args(["printer", "get", "Name,Default,Status", "/format:csv"]);
                ("wmic", command)
            }
        };

        let output = run(command).map_err(|e| Error::PrinterQueryFailed {
            tool: tool.into(),
            reason: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(Error::PrinterQueryFailed {
                tool: tool.into(),
                reason: failure_reason(&output),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match self.mode() {
            WindowsMode::PrintManagement => parse_print_management(&stdout),
            WindowsMode::Legacy => parse_wmic_csv(&stdout),
        })
    }

    fn submit(&self, path: &Path, printer: Option<&str>, options: &PrintOptions) -> Result<()> {
        if !options.is_empty() {
            warn!(options = %options, "the Windows print verb does not accept job options; ignoring them");
        }

        let output = run(powershell(&print_script(path, printer))).map_err(|e| {
            Error::PrintSubmissionFailed {
                path: path.to_path_buf(),
                reason: format!("cannot run powershell: {}", e),
            }
        })?;
        if !output.status.success() {
            return Err(Error::PrintSubmissionFailed {
                path: path.to_path_buf(),
                reason: failure_reason(&output),
            });
        }

        info!(file = %path.display(), printer = printer.unwrap_or("default"), "submitted print job");
        Ok(())
    }
}

fn powershell(script: &str) -> Command {
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-NonInteractive", "-Command", script]);
    command
}

/// Quote for a PowerShell single-quoted string.
fn ps_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `Start-Process` with the shell's PrintTo verb, or Print for the default printer.
pub fn print_script(path: &Path, printer: Option<&str>) -> String {
    let file = ps_quote(&path.display().to_string());
    match printer {
        Some(name) => format!(
            "Start-Process -FilePath {} -Verb PrintTo -ArgumentList {} -WindowStyle Hidden",
            file,
            ps_quote(&format!("\"{}\"", name))
        ),
        None => format!(
            "Start-Process -FilePath {} -Verb Print -WindowStyle Hidden",
            file
        ),
    }
}

/// Parse `name|is_default|status` lines.
pub fn parse_print_management(output: &str) -> Vec<PrinterDescriptor> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.trim().rsplitn(3, '|');
            let status = fields.next()?;
            let is_default = fields.next()?;
            let name = fields.next()?;
            Some(PrinterDescriptor {
                name: name.to_string(),
                is_default: is_default.eq_ignore_ascii_case("true"),
                status: status.to_string(),
            })
        })
        .collect()
}

/// Parse `wmic printer get Name,Default,Status /format:csv`.
///
/// wmic orders the columns `Node,Default,Name,Status`; the name is whatever
/// sits between the default flag and the status, commas included.
pub fn parse_wmic_csv(output: &str) -> Vec<PrinterDescriptor> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Node,"))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 4 {
                return None;
            }
            let status = fields[fields.len() - 1];
            Some(PrinterDescriptor {
                name: fields[2..fields.len() - 1].join(","),
                is_default: fields[1].eq_ignore_ascii_case("true"),
                status: status.to_string(),
            })
        })
        .collect()
}
