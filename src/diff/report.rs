// Tue Jan 15 2026 - Alex

use crate::classify::{worst_verdict, ClassifiedChange, Verdict};
use crate::utils::pluralize;
use colored::{ColoredString, Colorize};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Classified changes between two versions, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub old_version: String,
    pub new_version: String,
    pub summary: DiffSummary,
    pub changes: Vec<ClassifiedChange>,
    #[serde(skip)]
    color_enabled: bool,
}

impl DiffReport {
    pub fn new(old_ver: &str, new_ver: &str, changes: Vec<ClassifiedChange>) -> Self {
        Self {
            old_version: old_ver.to_string(),
            new_version: new_ver.to_string(),
            summary: DiffSummary::from_changes(&changes),
            changes,
            color_enabled: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.color_enabled = false;
        self
    }

    pub fn title(&self) -> String {
        format!("ABI diff: {} -> {}", self.old_version, self.new_version)
    }

    pub fn worst(&self) -> Option<Verdict> {
        self.summary.worst
    }

    pub fn export(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.to_text(),
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    fn paint(&self, verdict: Verdict) -> ColoredString {
        let label = format!("[{}]", verdict);
        if !self.color_enabled {
            return label.normal();
        }
        match verdict {
            Verdict::Compatible => label.green(),
            Verdict::ManualReview => label.yellow(),
            Verdict::BinaryBreaking => label.red(),
            Verdict::SourceBreaking => label.red().bold(),
        }
    }

    fn to_text(&self) -> String {
        let mut output = String::new();
        let title = self.title();

        output.push_str(&format!("{}\n", title));
        output.push_str(&"=".repeat(title.len()));
        output.push_str("\n\n");
        output.push_str(&format!("{}\n", self.summary));

        for entry in &self.changes {
            output.push_str(&format!("{} {}\n", self.paint(entry.verdict), entry.change));
            for detail in &entry.change.details {
                output.push_str(&format!("    - {}\n", detail));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title()));
        output.push_str("## Summary\n\n");
        for verdict in Verdict::ALL {
            output.push_str(&format!("- **{}:** {}\n", verdict, self.summary.count(verdict)));
        }
        output.push('\n');

        if !self.changes.is_empty() {
            output.push_str("## Changes\n\n");
            output.push_str("| Verdict | Change | Entity | Details |\n");
            output.push_str("|---------|--------|--------|---------|\n");
            for entry in &self.changes {
                let details = entry.change.details.iter().map(|d| d.to_string()).join("<br>");
                output.push_str(&format!(
                    "| {} | {} | `{}` | {} |\n",
                    entry.verdict,
                    entry.change.kind,
                    entry.change.name,
                    details.replace('|', "\\|")
                ));
            }
            output.push('\n');
        }
        output
    }

    fn to_json(&self) -> String {
        match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::error!("Failed to serialize report: {}", err);
                String::from("{}")
            }
        }
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &Path, format: ReportFormat) -> std::io::Result<()> {
        let content = self.export(format);
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Summary of diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub total: usize,
    pub compatible: usize,
    pub manual_review: usize,
    pub binary_breaking: usize,
    pub source_breaking: usize,
    pub worst: Option<Verdict>,
}

impl DiffSummary {
    pub fn from_changes(changes: &[ClassifiedChange]) -> Self {
        let mut summary = Self {
            total: changes.len(),
            worst: worst_verdict(changes),
            ..Self::default()
        };
        for entry in changes {
            match entry.verdict {
                Verdict::Compatible => summary.compatible += 1,
                Verdict::ManualReview => summary.manual_review += 1,
                Verdict::BinaryBreaking => summary.binary_breaking += 1,
                Verdict::SourceBreaking => summary.source_breaking += 1,
            }
        }
        summary
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Compatible => self.compatible,
            Verdict::ManualReview => self.manual_review,
            Verdict::BinaryBreaking => self.binary_breaking,
            Verdict::SourceBreaking => self.source_breaking,
        }
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.worst {
            Some(worst) => writeln!(
                f,
                "{} (worst: {})",
                pluralize(self.total, "changed entity", "changed entities"),
                worst
            )?,
            None => writeln!(f, "No changes")?,
        }
        for verdict in Verdict::ALL {
            let count = self.count(verdict);
            if count > 0 {
                writeln!(f, "  {}: {}", verdict, count)?;
            }
        }
        Ok(())
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}
