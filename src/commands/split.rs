use crate::error::Error;
use crate::output::{prepare_outputs, ConflictPolicy, OutputFile};
use crate::page_range::{plan_chunks, SplitPlan, DEFAULT_CHUNK_SIZE};
use crate::pdf::document::PdfInfo;
use crate::pdf::PdfDocument;
use crate::printer::{PrintOptions, PrinterBackend};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything one split run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub input: PathBuf,
    pub chunk_size: u32,
    /// Defaults to the input file's directory
    pub output_dir: Option<PathBuf>,
    pub preview: bool,
    pub print: bool,
    pub printer: Option<String>,
    pub print_options: PrintOptions,
    pub conflict_policy: ConflictPolicy,
    /// Print per-file progress lines to stdout
    pub progress: bool,
    pub verbose: bool,
}

impl SplitRequest {
    /// A request with every option at its command-line default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        SplitRequest {
            input: input.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: None,
            preview: false,
            print: false,
            printer: None,
            print_options: PrintOptions::new(),
            conflict_policy: ConflictPolicy::Fail,
            progress: false,
            verbose: false,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Preview(Preview),
    Completed(RunSummary),
}

#[derive(Debug, Serialize)]
pub struct Preview {
    pub input: PathBuf,
    pub plan: SplitPlan,
}

#[derive(Debug, Serialize)]
pub struct PrintAttempt {
    pub file: String,
    pub printer: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub planned: usize,
    pub created: Vec<PathBuf>,
    /// `None` unless printing was requested
    pub printed: Option<Vec<PrintAttempt>>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn printed_ok(&self) -> usize {
        self.printed
            .iter()
            .flatten()
            .filter(|a| a.error.is_none())
            .count()
    }

    pub fn print_failures(&self) -> Vec<&PrintAttempt> {
        self.printed
            .iter()
            .flatten()
            .filter(|a| a.error.is_some())
            .collect()
    }
}

/// Validate, plan, split and optionally print.
///
/// Every error returned here is fatal and carries the stage it came from.
/// Print failures are not errors: they are recorded in the summary and
/// printing moves on to the next file.
pub fn run(request: &SplitRequest, backend: &dyn PrinterBackend) -> Result<Outcome> {
    let started = Instant::now();

    let input = request.input.display();
    validate_input(&request.input).with_context(|| format!("invalid input {}", input))?;

    let doc = PdfDocument::open(&request.input)
        .with_context(|| format!("failed to open {}", input))?;
    let total_pages = doc.page_count();
    info!(pages = total_pages, input = %request.input.display(), "loaded PDF");

    if request.verbose && request.progress {
        println!("PDF Information:");
        for line in info_lines(&doc.get_info()) {
            println!("  {}", line);
        }
    }

    let plan = plan_chunks(total_pages, request.chunk_size)
        .with_context(|| format!("failed to plan split of {}", input))?;
    debug!(?plan, "planned split");

    if request.preview {
        return Ok(Outcome::Preview(Preview {
            input: request.input.clone(),
            plan,
        }));
    }

    let output_dir = resolve_output_dir(request);
    let stem = request
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let outputs = prepare_outputs(&stem, &output_dir, &plan, request.conflict_policy)
        .with_context(|| format!("failed to prepare output files in {}", output_dir.display()))?;

    if request.progress {
        println!("Splitting PDF into {} files...", outputs.len());
    }
    let total = outputs.len();
    doc.split_into(&outputs, |output| {
        if request.progress {
            if request.verbose {
                println!("{}", progress_line(output.index, total, "created part"));
            }
            println!(
                "Created: {} (pages {}-{})",
                output.path.display(),
                output.range.start,
                output.range.end
            );
        }
    })
    .inspect_err(|e| {
        if let Error::WriteFailed { completed, .. } = e {
            warn!(completed, planned = total, "split aborted; written files were kept");
        }
    })
    .with_context(|| format!("failed to split {}", input))?;

    let printed = request
        .print
        .then(|| print_outputs(request, &outputs, backend));

    Ok(Outcome::Completed(RunSummary {
        input: request.input.clone(),
        output_dir,
        planned: plan.len(),
        created: outputs.into_iter().map(|o| o.path).collect(),
        printed,
        elapsed_secs: started.elapsed().as_secs_f64(),
    }))
}

fn validate_input(input: &Path) -> crate::error::Result<()> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.to_path_buf()));
    }
    if !input.is_file() {
        return Err(Error::invalid(
            "input file",
            format!("{} is not a file", input.display()),
        ));
    }
    let is_pdf = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(Error::invalid(
            "input file",
            format!("{} does not have a .pdf extension", input.display()),
        ));
    }
    Ok(())
}

fn info_lines(info: &PdfInfo) -> Vec<String> {
    let mut lines = vec![
        format!("Pages: {}", info.page_count),
        format!("Size: {:.2} MB", info.file_size_mb),
        format!("Encrypted: {}", info.encrypted),
    ];
    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{}: {}", label, value));
        }
    }
    lines
}

fn resolve_output_dir(request: &SplitRequest) -> PathBuf {
    match &request.output_dir {
        Some(dir) => dir.clone(),
        None => match request.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

/// Submit every output in plan order, carrying on past failures.
///
/// An unknown printer name is reported once, against the file where it was
/// found; the remaining files go to the default printer.
fn print_outputs(
    request: &SplitRequest,
    outputs: &[OutputFile],
    backend: &dyn PrinterBackend,
) -> Vec<PrintAttempt> {
    for key in request.print_options.unknown_keys() {
        warn!(option = key, "unrecognised print option, passing it through");
    }
    if request.progress {
        println!("Printing {} files...", outputs.len());
    }

    let mut printer = request.printer.clone();
    let mut attempts = Vec::with_capacity(outputs.len());

    for output in outputs {
        if request.progress && request.verbose {
            println!(
                "{}",
                progress_line(
                    output.index,
                    outputs.len(),
                    &format!("printing {}", output.file_name())
                )
            );
        }

        let result = backend.print_file(&output.path, printer.as_deref(), &request.print_options);
        let attempt = PrintAttempt {
            file: output.file_name(),
            printer: printer.clone(),
            error: result.as_ref().err().map(ToString::to_string),
        };

        match result {
            Ok(()) => {
                if request.progress {
                    println!("✓ Printed: {}", attempt.file);
                }
            }
            Err(e) => {
                if request.progress {
                    println!("✗ Failed: {} - {}", attempt.file, e);
                }
                if let Error::PrinterNotFound { name, .. } = &e {
                    warn!(printer = %name, "printer not found; using the default printer for the remaining files");
                    printer = None;
                }
            }
        }
        attempts.push(attempt);
    }

    attempts
}

fn progress_line(current: usize, total: usize, message: &str) -> String {
    let percentage = current as f64 / total as f64 * 100.0;
    format!("[{}/{}] ({:.1}%) {}", current, total, percentage, message)
}

pub fn print_preview(preview: &Preview) {
    let plan = &preview.plan;
    println!("--- Split Preview ---");
    println!("Input file: {}", preview.input.display());
    println!("Total pages: {}", plan.total_pages);
    println!("Pages per split: {}", plan.chunk_size);
    println!("Number of output files: {}", plan.len());
    println!("Last file will have: {} pages", plan.last_chunk_pages());
    println!();
    println!("Page ranges:");
    for (i, range) in plan.ranges.iter().enumerate() {
        println!(
            "  Part {:03}: pages {}-{} ({} pages)",
            i + 1,
            range.start,
            range.end,
            range.len()
        );
    }
    println!("--- End Preview ---");
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("--- Summary ---");
    println!("Input file: {}", summary.input.display());
    println!("Files planned: {}", summary.planned);
    println!("Files created: {}", summary.created.len());
    println!("Output directory: {}", summary.output_dir.display());
    if let Some(attempts) = &summary.printed {
        println!("Print jobs sent: {}/{}", summary.printed_ok(), attempts.len());
        let failures = summary.print_failures();
        if !failures.is_empty() {
            println!("Failed prints:");
            for attempt in failures {
                println!(
                    "  {}: {}",
                    attempt.file,
                    attempt.error.as_deref().unwrap_or_default()
                );
            }
        }
    }
    println!("Elapsed: {:.2}s", summary.elapsed_secs);
}
