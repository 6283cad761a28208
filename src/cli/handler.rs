// Wed Jan 15 2026 - Alex

use super::args::{Args, Command, DiffArgs, FailOn, FormatArg, HistoryArgs, LayoutArgs, PxdArgs};
use crate::classify::Verdict;
use crate::config::Config;
use crate::diff::{DiffReport, ReportFormat};
use crate::engine::{Pipeline, VersionHistory};
use crate::output::{walk, PxdWriter, PyxWriter, VisitorGroup};
use crate::structure::AnnotatedModel;
use crate::syntax::SourceVersion;
use crate::utils::logging::LoggingUtils;
use anyhow::Context;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Process exit code when a `--fail-on` threshold is reached.
pub const EXIT_BREAKING: i32 = 1;

pub struct CommandHandler {
    color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Runs one command and returns the process exit code.
    pub fn execute(&mut self, args: Args) -> anyhow::Result<i32> {
        self.setup_output(&args);
        let config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        match args.command {
            Command::Diff(diff_args) => self.handle_diff(config, diff_args),
            Command::Layout(layout_args) => self.handle_layout(config, layout_args),
            Command::Pxd(pxd_args) => self.handle_pxd(config, pxd_args),
            Command::History(history_args) => self.handle_history(config, history_args),
        }
    }

    fn setup_output(&mut self, args: &Args) {
        LoggingUtils::init_logger(LoggingUtils::level_from_str(&args.log_level));
        if args.no_color {
            colored::control::set_override(false);
            self.color = false;
        }
    }

    fn report(&self, report: DiffReport, format: FormatArg) -> DiffReport {
        if self.color && format == FormatArg::Text {
            report
        } else {
            report.without_colors()
        }
    }

    fn exit_code(worst: Option<Verdict>, fail_on: Option<FailOn>) -> i32 {
        match (worst, fail_on) {
            (Some(worst), Some(fail_on)) if worst >= fail_on.threshold() => {
                log::info!("Worst verdict {} reaches --fail-on threshold", worst);
                EXIT_BREAKING
            }
            _ => 0,
        }
    }

    fn handle_diff(&self, config: Config, args: DiffArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let old = SourceVersion::load(&args.old)?;
        let new = SourceVersion::load(&args.new)?;
        let pipeline = Pipeline::new(config)?;
        let result = pipeline.compare(&old, &new)?;

        let format = ReportFormat::from(args.format);
        match &args.output {
            Some(path) => {
                let report = result.report().without_colors();
                let path = if path.is_dir() {
                    report_file_name(path, &report, format)
                } else {
                    path.clone()
                };
                report
                    .write_to_file(&path, format)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("{}", format!("Report written to: {}", path.display()).green());
            }
            None => print!("{}", self.report(result.report(), args.format).export(format)),
        }

        Ok(Self::exit_code(result.worst(), args.fail_on))
    }

    fn handle_layout(&self, config: Config, args: LayoutArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let version = SourceVersion::load(&args.input)?;
        let pipeline = Pipeline::new(config)?;
        let model = pipeline.annotate(&version)?;

        match args.format {
            FormatArg::Json => println!("{}", layout_json(&model)?),
            _ => {
                println!("{}", format!("Layouts of {}", model.label()).cyan());
                for (name, result) in model.layouts() {
                    match result {
                        Ok(layout) => print!("{}", layout),
                        Err(err) => println!("{} {}", name, format!("(no layout: {})", err).yellow()),
                    }
                }
            }
        }
        Ok(0)
    }

    fn handle_pxd(&self, config: Config, args: PxdArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let version = SourceVersion::load(&args.input)?;
        let header = args
            .header
            .clone()
            .or_else(|| version.header.clone())
            .unwrap_or_else(|| format!("{}.hpp", version.label));
        let pipeline = Pipeline::new(config)?;
        let model = pipeline.annotate(&version)?;

        let mut pxd = PxdWriter::new();
        if !args.pyx {
            walk(model.model(), &header, &mut pxd);
            match &args.output {
                Some(path) => {
                    let path = if path.is_dir() {
                        PxdWriter::file_name(path, &header)
                    } else {
                        path.clone()
                    };
                    write_file(&path, &pxd.render())?;
                    println!("{}", format!("Declarations written to: {}", path.display()).green());
                }
                None => print!("{}", pxd.render()),
            }
            return Ok(0);
        }

        let mut pyx = PyxWriter::new();
        walk(
            model.model(),
            &header,
            &mut VisitorGroup::new().with(&mut pxd).with(&mut pyx),
        );
        let directory = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
        for (path, text) in [
            (PxdWriter::file_name(&directory, &header), pxd.render()),
            (PyxWriter::file_name(&directory, &header), pyx.render()),
        ] {
            write_file(&path, &text)?;
            println!("{}", format!("Written: {}", path.display()).green());
        }
        Ok(0)
    }

    fn handle_history(&self, config: Config, args: HistoryArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let versions = args
            .versions
            .iter()
            .map(|path| SourceVersion::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        let pipeline = Pipeline::new(config)?;

        let bar = if args.no_progress {
            ProgressBar::hidden()
        } else {
            progress_bar(VersionHistory::step_count(versions.len()) as u64)
        };
        let steps = VersionHistory::new(&pipeline).compare_all(&versions, |message| {
            bar.set_message(message.to_string());
            bar.inc(1);
        });
        bar.finish_and_clear();
        let steps = steps?;

        let reports: Vec<DiffReport> = steps
            .iter()
            .map(|step| self.report(step.report(), args.format))
            .collect();
        match args.format {
            FormatArg::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            format => {
                for report in &reports {
                    println!("{}", report.export(format.into()));
                }
            }
        }

        let worst = steps.iter().filter_map(|step| step.worst()).max();
        Ok(Self::exit_code(worst, args.fail_on))
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    match ProgressStyle::default_bar().template(BAR_TEMPLATE) {
        Ok(style) => bar.set_style(style.progress_chars("█▓▒░ ")),
        Err(err) => log::debug!("Falling back to default progress style: {}", err),
    }
    bar
}

/// Layout outcome of every record as JSON; failed records carry their error text.
fn layout_json(model: &AnnotatedModel) -> anyhow::Result<String> {
    let mut records = serde_json::Map::new();
    for (name, result) in model.layouts() {
        let value = match result {
            Ok(layout) => serde_json::to_value(layout)?,
            Err(err) => serde_json::json!({ "error": err.to_string() }),
        };
        records.insert(name.to_string(), value);
    }
    let document = serde_json::json!({
        "version": model.label(),
        "records": records,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

/// `<dir>/<old>_to_<new>.<ext>` for reports written into a directory.
fn report_file_name(directory: &Path, report: &DiffReport, format: ReportFormat) -> PathBuf {
    directory.join(format!(
        "{}_to_{}.{}",
        report.old_version,
        report.new_version,
        format.extension()
    ))
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{annotate, for_test_nodes, ForTestStage};

    #[test]
    fn test_exit_code_threshold() {
        assert_eq!(CommandHandler::exit_code(None, Some(FailOn::Binary)), 0);
        assert_eq!(CommandHandler::exit_code(Some(Verdict::SourceBreaking), None), 0);
        assert_eq!(
            CommandHandler::exit_code(Some(Verdict::BinaryBreaking), Some(FailOn::Binary)),
            EXIT_BREAKING
        );
        assert_eq!(
            CommandHandler::exit_code(Some(Verdict::SourceBreaking), Some(FailOn::Binary)),
            EXIT_BREAKING
        );
        assert_eq!(CommandHandler::exit_code(Some(Verdict::BinaryBreaking), Some(FailOn::Source)), 0);
        assert_eq!(CommandHandler::exit_code(Some(Verdict::ManualReview), Some(FailOn::Binary)), 0);
    }

    #[test]
    fn test_report_file_name() {
        let report = DiffReport::new("v1", "v2", Vec::new());
        assert_eq!(
            report_file_name(Path::new("out"), &report, ReportFormat::Markdown),
            Path::new("out").join("v1_to_v2.md")
        );
    }

    #[test]
    fn test_layout_json() {
        let model = annotate("plain", &for_test_nodes(ForTestStage::Plain));
        let json: serde_json::Value = serde_json::from_str(&layout_json(&model).unwrap()).unwrap();
        assert_eq!(json["version"], "plain");
        let s1 = &json["records"]["for_test_namespace::S1"];
        assert!(s1.is_object());
        assert!(s1.get("error").is_none());
    }
}
