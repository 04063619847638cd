use crate::commands::split::SplitRequest;
use crate::error::Result;
use crate::output::ConflictPolicy;
use crate::page_range::DEFAULT_CHUNK_SIZE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfchunk")]
#[command(about = "Split PDF files into fixed-size chunks and optionally print them")]
#[command(version)]
#[command(after_help = "Examples:
  pdfchunk document.pdf --pages 8
  pdfchunk document.pdf --pages 10 --output ./split_files
  pdfchunk document.pdf --pages 5 --print --printer \"HP_Printer\"
  pdfchunk document.pdf --pages 8 --preview
  pdfchunk --list-printers")]
pub struct Cli {
    /// PDF file to split
    #[arg(required_unless_present = "list_printers")]
    pub input_file: Option<PathBuf>,

    /// Number of pages per output file
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_name = "N")]
    pub pages: u32,

    /// Output directory (default: same directory as the input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print each output file after splitting
    #[arg(long)]
    pub print: bool,

    /// Printer name (uses the system default if not given)
    #[arg(short, long, value_name = "NAME")]
    pub printer: Option<String>,

    /// Show the split plan without writing any files
    #[arg(long)]
    pub preview: bool,

    /// List available printers and exit; all other options are ignored
    #[arg(long)]
    pub list_printers: bool,

    /// Print options as key=value pairs (e.g. "sides=two-sided-long-edge,copies=2")
    #[arg(long, value_name = "K=V,...")]
    pub print_options: Option<String>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Show document details, progress and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit the plan, summary or printer list as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the split request; `None` when only listing printers.
    ///
    /// `--print-options` is parsed here rather than by clap so that a listing
    /// run never looks at it.
    pub fn split_request(&self) -> Result<Option<SplitRequest>> {
        if self.list_printers {
            return Ok(None);
        }
        let Some(input) = self.input_file.clone() else {
            return Ok(None);
        };

        let mut request = SplitRequest::new(input);
        request.chunk_size = self.pages;
        request.output_dir = self.output.clone();
        request.preview = self.preview;
        request.print = self.print;
        request.printer = self.printer.clone();
        if let Some(options) = &self.print_options {
            request.print_options = options.parse()?;
        }
        if self.force {
            request.conflict_policy = ConflictPolicy::Overwrite;
        }
        request.progress = !self.json;
        request.verbose = self.verbose;
        Ok(Some(request))
    }
}
