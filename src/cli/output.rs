//! Output formatting utilities for the CLI.

use std::env;
use std::time::Duration;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::domain::models::{KpiSnapshot, MetricStatus};

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// A command result that renders as text or JSON.
pub trait CommandOutput: Serialize {
    /// Terminal rendering.
    fn to_human(&self) -> String;
    /// `--json` rendering.
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Spinner on stderr, hidden in JSON mode.
pub fn create_spinner(message: impl Into<String>, json_mode: bool) -> ProgressBar {
    if json_mode {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        spinner.set_style(spinner_style.tick_chars(SPINNER_CHARS));
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Respects `NO_COLOR` and dumb terminals.
pub fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    true
}

fn status_color(status: MetricStatus) -> Color {
    match status {
        MetricStatus::Exceeds => Color::Green,
        MetricStatus::Meets => Color::Cyan,
        MetricStatus::Below => Color::Red,
    }
}

/// Header line plus one table row per metric, grouped by pillar.
pub fn format_snapshot(snapshot: &KpiSnapshot, use_colors: bool) -> String {
    let header = format!(
        "Department {} / session {} at {}  overall score {}",
        snapshot.department_id(),
        snapshot.academic_session_id(),
        snapshot.timestamp().format("%Y-%m-%d %H:%M:%S UTC"),
        format_score(snapshot.overall_score(), use_colors),
    );

    if snapshot.pillars().is_empty() {
        return format!("{header}\nNo pillars were evaluated.");
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Pillar", "Metric", "Value", "Target", "Achieved", "Status"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for (pillar_name, pillar) in snapshot.pillars() {
        if pillar.is_empty() {
            table.add_row(vec![
                Cell::new(pillar_name),
                Cell::new("(no metrics)"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]);
            continue;
        }
        for metric in &pillar.metrics {
            let status_cell = if use_colors {
                Cell::new(metric.status.as_str()).fg(status_color(metric.status))
            } else {
                Cell::new(metric.status.as_str())
            };
            table.add_row(vec![
                Cell::new(pillar_name),
                Cell::new(&metric.metric_name),
                Cell::new(format!("{:.2}", metric.calculated_value)),
                Cell::new(format!("{:.2}", metric.target_value)),
                Cell::new(format!("{:.1}%", metric.percentage_achieved)),
                status_cell,
            ]);
        }
    }

    format!("{header}\n{table}")
}

fn format_score(score: f64, use_colors: bool) -> String {
    let text = format!("{score:.1}%");
    if !use_colors {
        return text;
    }
    if score >= 100.0 {
        style(text).green().bold().to_string()
    } else {
        style(text).yellow().to_string()
    }
}
