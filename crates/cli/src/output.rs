//! Report rendering (text tables or JSON)

use anyhow::Result;
use asyncq_core::application::RunReport;
use clap::ValueEnum;
use colored::Colorize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Tabled)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

#[derive(Tabled)]
struct ConsumerRow {
    consumer: usize,
    consumed: usize,
    mean_latency_ms: String,
    max_latency_ms: String,
}

pub fn render(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &RunReport) -> String {
    let headline = if report.failed_producers == 0 && report.failed_consumers == 0 {
        "✓ Pipeline drained".green().bold()
    } else {
        "⚠ Pipeline drained with worker failures".yellow().bold()
    };

    let summary = vec![
        SummaryRow { metric: "producers", value: report.producers.to_string() },
        SummaryRow { metric: "consumers", value: report.consumers.to_string() },
        SummaryRow { metric: "items produced", value: report.produced.to_string() },
        SummaryRow { metric: "items consumed", value: report.consumed.to_string() },
        SummaryRow { metric: "failed producers", value: report.failed_producers.to_string() },
        SummaryRow { metric: "failed consumers", value: report.failed_consumers.to_string() },
        SummaryRow { metric: "mean latency (ms)", value: format!("{:.3}", report.mean_latency_ms) },
        SummaryRow { metric: "max latency (ms)", value: format!("{:.3}", report.max_latency_ms) },
    ];

    let consumers: Vec<ConsumerRow> = report
        .consumer_reports
        .iter()
        .filter(|c| c.consumed > 0)
        .map(|c| ConsumerRow {
            consumer: c.consumer,
            consumed: c.consumed,
            mean_latency_ms: format!("{:.3}", c.total_latency_ms / c.consumed as f64),
            max_latency_ms: format!("{:.3}", c.max_latency_ms),
        })
        .collect();

    let mut out = format!("{}\n\n{}\n", headline, Table::new(summary));
    if !consumers.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Consumers".cyan().bold(), Table::new(consumers)));
    }
    out
}
