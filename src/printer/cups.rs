use super::{failure_reason, run, PrintOptions, PrinterBackend, PrinterDescriptor};
use crate::error::{Error, Result};
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, info};

static PRINTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^printer\s+(\S+)\s+(?:is\s+)?(.+?)(?:\.\s|\.$|\s+since\b|$)")
        .expect("valid printer regex")
});

static DEFAULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"system default destination:\s*(\S+)").expect("valid default regex")
});

/// CUPS printing through `lpstat` and `lpr` (macOS, Linux, BSD).
#[derive(Debug, Default)]
pub struct CupsBackend;

impl CupsBackend {
    pub fn new() -> Self {
        CupsBackend
    }

    /// Run `lpstat` with `args`; a failing exit with no output means nothing configured.
    fn lpstat(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new("lpstat");
        command.args(args);
        let output = run(command).map_err(|e| Error::PrinterQueryFailed {
            tool: "lpstat".into(),
            reason: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            debug!(status = %output.status, reason = %failure_reason(&output), "lpstat reported no destinations");
        }
        Ok(stdout)
    }
}

impl PrinterBackend for CupsBackend {
    fn system_name(&self) -> &'static str {
        if cfg!(target_os = "macos") {
            "macOS (CUPS)"
        } else {
            "CUPS"
        }
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>> {
        let default = parse_default(&self.lpstat(&["-d"])?);
        Ok(parse_printers(&self.lpstat(&["-p"])?, default.as_deref()))
    }

    fn default_printer(&self) -> Result<Option<String>> {
        Ok(parse_default(&self.lpstat(&["-d"])?))
    }

    fn submit(&self, path: &Path, printer: Option<&str>, options: &PrintOptions) -> Result<()> {
        let mut command = Command::new("lpr");
        command.args(lpr_args(path, printer, options));

        let output = run(command).map_err(|e| Error::PrintSubmissionFailed {
            path: path.to_path_buf(),
            reason: format!("cannot run lpr: {}", e),
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

pub fn lpr_args(path: &Path, printer: Option<&str>, options: &PrintOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(name) = printer {
        args.push("-P".into());
        args.push(name.into());
    }
    for (key, value) in options.iter() {
        args.push("-o".into());
        args.push(format!("{}={}", key, value).into());
    }
    args.push(path.as_os_str().to_owned());
    args
}

/// Parse `lpstat -p` output.
pub fn parse_printers(output: &str, default: Option<&str>) -> Vec<PrinterDescriptor> {
    output
        .lines()
        .filter_map(|line| PRINTER_LINE.captures(line))
        .map(|caps| {
            let name = caps[1].to_string();
            PrinterDescriptor {
                is_default: Some(name.as_str()) == default,
                status: caps[2].trim().to_string(),
                name,
            }
        })
        .collect()
}

/// Parse `lpstat -d` output.
pub fn parse_default(output: &str) -> Option<String> {
    DEFAULT_LINE
        .captures(output)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LPSTAT_P: &str = "\
printer HP_LaserJet is idle.  enabled since Mon 06 Jan 2025 09:12:01 AM CET
printer Lab_Color now printing Lab_Color-42.  enabled since Tue 07 Jan 2025
\tWaiting for job to complete.
printer Old_Dotmatrix disabled since Wed 01 Jan 2025 10:00:00 AM CET -
\treason unknown
";

    #[test]
    fn test_parse_printers() {
        let printers = parse_printers(LPSTAT_P, Some("Lab_Color"));
        assert_eq!(printers.len(), 3);

        assert_eq!(printers[0].name, "HP_LaserJet");
        assert_eq!(printers[0].status, "idle");
        assert!(!printers[0].is_default);

        assert_eq!(printers[1].name, "Lab_Color");
        assert_eq!(printers[1].status, "now printing Lab_Color-42");
        assert!(printers[1].is_default);

        assert_eq!(printers[2].name, "Old_Dotmatrix");
        assert_eq!(printers[2].status, "disabled");
    }

    #[test]
    fn test_parse_no_printers() {
        assert!(parse_printers("", None).is_empty());
        assert!(parse_printers("lpstat: No destinations added.\n", None).is_empty());
    }

    #[test]
    fn test_parse_default() {
        assert_eq!(
            parse_default("system default destination: HP_LaserJet\n").as_deref(),
            Some("HP_LaserJet")
        );
        assert_eq!(parse_default("no system default destination\n"), None);
    }

    #[test]
    fn test_lpr_args() {
        let options: PrintOptions = "sides=two-sided-long-edge,x-vendor=1".parse().unwrap();
        let args = lpr_args(Path::new("out/doc_part_001.pdf"), Some("Lab"), &options);
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-P",
                "Lab",
                "-o",
                "sides=two-sided-long-edge",
                "-o",
                "x-vendor=1",
                "out/doc_part_001.pdf"
            ]
        );
    }

    #[test]
    fn test_lpr_args_default_printer() {
        let args = lpr_args(Path::new("a.pdf"), None, &PrintOptions::new());
        assert_eq!(args, vec![OsString::from("a.pdf")]);
    }
}
