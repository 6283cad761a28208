// Wed Jan 15 2026 - Alex

use crate::classify::Verdict;
use crate::diff::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cxx-abi-diff")]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Source and binary compatibility checker for C++ header versions", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the changes between two versions
    Diff(DiffArgs),
    /// Print the estimated layout of every record
    Layout(LayoutArgs),
    /// Emit Cython declarations for a version
    Pxd(PxdArgs),
    /// Classify every consecutive pair of an ordered version list
    History(HistoryArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Markdown,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Binary,
    Source,
}

impl FailOn {
    /// Lowest verdict that makes the run fail.
    pub fn threshold(self) -> Verdict {
        match self {
            FailOn::Binary => Verdict::BinaryBreaking,
            FailOn::Source => Verdict::SourceBreaking,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    #[arg(short, long)]
    pub old: PathBuf,

    #[arg(short, long)]
    pub new: PathBuf,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,

    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub fail_on: Option<FailOn>,
}

#[derive(Parser, Debug)]
pub struct LayoutArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,
}

#[derive(Parser, Debug)]
pub struct PxdArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    /// Header path written into the extern blocks; defaults to the version's own
    #[arg(long)]
    pub header: Option<String>,

    /// File, or directory receiving `<stem>.pxd`
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    /// Also write the `<stem>_proxy.pyx` module next to the declarations
    #[arg(long)]
    pub pyx: bool,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[arg(required = true, num_args = 2..)]
    pub versions: Vec<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,

    #[arg(long, value_enum)]
    pub fail_on: Option<FailOn>,

    #[arg(long)]
    pub no_progress: bool,
}

impl DiffArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.old.exists() {
            return Err(format!("Old version does not exist: {:?}", self.old));
        }
        if !self.new.exists() {
            return Err(format!("New version does not exist: {:?}", self.new));
        }
        Ok(())
    }
}

impl LayoutArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.input.exists() {
            return Err(format!("Input does not exist: {:?}", self.input));
        }
        if self.format == FormatArg::Markdown {
            return Err("Layout output supports text or json".to_string());
        }
        Ok(())
    }
}

impl PxdArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.input.exists() {
            return Err(format!("Input does not exist: {:?}", self.input));
        }
        if self.pyx && self.output.as_ref().is_some_and(|p| p.is_file()) {
            return Err("--pyx needs --output to be a directory".to_string());
        }
        Ok(())
    }
}

impl HistoryArgs {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(missing) = self.versions.iter().find(|p| !p.exists()) {
            return Err(format!("Version does not exist: {:?}", missing));
        }
        Ok(())
    }
}
