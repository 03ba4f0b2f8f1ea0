//! Report formatting utilities

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::pipeline::ScreenerRun;
use crate::report::{Outcome, RunReport};
use crate::scoring::{EARNINGS_SCORE, ESG_SCORE, QG_SCORE};
use crate::table::MetricTable;

/// Output format for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// What to include besides the ranking
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Include the raw metric tables
    pub show_metrics: bool,
    /// Include stages that failed or returned partial data
    pub show_issues: bool,
}

pub trait Formatter: Send + Sync {
    fn output_format(&self) -> OutputFormat;
    fn format_run(&self, run: &ScreenerRun, options: FormatOptions) -> Result<String>;
}

/// Terminal tables
pub struct TableFormatter;

impl TableFormatter {
    fn new_table(headers: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(headers);
        table
    }

    fn ranking_table(run: &ScreenerRun) -> Table {
        let mut table =
            Self::new_table(vec!["Ticker", QG_SCORE, ESG_SCORE, EARNINGS_SCORE, "Final Score"]);

        for row in &run.ranking.rows {
            table.add_row(vec![
                Cell::new(row.ticker.as_str()),
                Cell::new(row.quality_growth).set_alignment(CellAlignment::Right),
                Cell::new(row.esg).set_alignment(CellAlignment::Right),
                Cell::new(row.earnings_surprise).set_alignment(CellAlignment::Right),
                Cell::new(row.total).set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }

    fn metric_table(metrics: &MetricTable) -> Table {
        let mut headers = vec!["Ticker"];
        headers.extend(metrics.metrics().iter().copied());
        let mut table = Self::new_table(headers);

        for row in metrics.rows() {
            let mut cells = vec![Cell::new(row.ticker.as_str())];
            cells.extend(
                row.values
                    .iter()
                    .map(|v| Cell::new(format!("{v:.4}")).set_alignment(CellAlignment::Right)),
            );
            table.add_row(cells);
        }

        table
    }

    fn issues_table(report: &RunReport) -> Table {
        let mut table = Self::new_table(vec!["Ticker", "Stage", "Status", "Detail"]);

        for issue in report.issues() {
            let (status, detail) = match &issue.outcome {
                Outcome::Ok => continue,
                Outcome::Partial { missing } => {
                    ("partial", format!("null: {}", missing.join(", ")))
                }
                Outcome::Truncated { used, reason } => {
                    ("truncated", format!("first {used} used, then {reason}"))
                }
                Outcome::Failed { reason } => ("failed", reason.clone()),
            };
            table.add_row(vec![
                issue.ticker.to_string(),
                issue.stage.to_string(),
                status.to_string(),
                detail,
            ]);
        }

        table
    }
}

impl Formatter for TableFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Table
    }

    fn format_run(&self, run: &ScreenerRun, options: FormatOptions) -> Result<String> {
        let mut output = String::new();

        if options.show_metrics {
            for (title, metrics) in [
                ("Quality / growth metrics", &run.quality_growth),
                ("ESG metrics", &run.esg),
                ("Earnings surprise metrics", &run.earnings),
            ] {
                output.push_str(title);
                output.push('\n');
                output.push_str(&Self::metric_table(metrics).to_string());
                output.push_str("\n\n");
            }
        }

        output.push_str(&Self::ranking_table(run).to_string());
        output.push('\n');

        if !run.ranking.dropped.is_empty() {
            let dropped: Vec<_> = run.ranking.dropped.iter().map(|t| t.as_str()).collect();
            output.push_str(&format!(
                "\nExcluded (missing component score): {}\n",
                dropped.join(", ")
            ));
        }

        if options.show_issues && !run.report.is_clean() {
            output.push_str(&format!(
                "\n{} stage(s) failed, zero defaults used where data was missing\n",
                run.report.failure_count()
            ));
            output.push_str(&Self::issues_table(&run.report).to_string());
            output.push('\n');
        }

        Ok(output)
    }
}

/// Pretty-printed JSON document
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_run(&self, run: &ScreenerRun, options: FormatOptions) -> Result<String> {
        let mut document = json!({
            "ranking": run.ranking.rows,
            "dropped": run.ranking.dropped,
        });

        if options.show_metrics {
            document["metrics"] = json!({
                "qualityGrowth": run.quality_growth,
                "esg": run.esg,
                "earningsSurprise": run.earnings,
            });
        }

        if options.show_issues {
            document["issues"] = serde_json::to_value(run.report.issues().collect::<Vec<_>>())?;
        }

        Ok(serde_json::to_string_pretty(&document)?)
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Table => Box::new(TableFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}
