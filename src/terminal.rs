//! Terminal Rendering
//!
//! Plain-text renderings of the dashboard for the `railcount` CLI: the live
//! panel, the event log and both summary charts as horizontal bars.

use std::fmt::Write;

use crate::charts::{BarChart, Fill, EASTBOUND_COLOR};
use crate::error::DashboardResult;
use crate::event_log::LogEntry;
use crate::models::{EngineDirectionCount, RecentTrainPoint};
use crate::session::{LiveView, PLACEHOLDER};
use crate::stream::ConnectionStatus;
use crate::summary::LoadedChart;

/// Widest bar drawn, in characters
pub const BAR_WIDTH: usize = 40;

const SERIES_GLYPHS: [char; 4] = ['#', '+', '=', '.'];
const EASTBOUND_GLYPH: char = '#';
const WESTBOUND_GLYPH: char = '=';

/// The live fields, one per line
pub fn render_live_panel(view: &LiveView, status: &ConnectionStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stream:       {}", status);
    let _ = writeln!(out, "Active train: {}", view.active_train);
    let _ = writeln!(out, "Direction:    {}", view.direction);
    let _ = writeln!(out, "Speed (mph):  {}", view.speed);
    let _ = writeln!(out, "Locomotives:  {}", view.locomotives);
    let _ = writeln!(out, "Railcars:     {}", view.railcars);
    let _ = writeln!(out, "Engines:      {}", view.engines);
    let _ = writeln!(
        out,
        "Frames:       {} received, {} dropped",
        view.frames_received, view.dropped_frames
    );
    out
}

/// Up to `limit` log entries, newest first
pub fn render_log(entries: &[LogEntry], limit: usize) -> String {
    let mut out = String::new();
    for entry in entries.iter().take(limit) {
        let _ = writeln!(out, "[{}]", entry.received_at.format("%H:%M:%S"));
        let _ = writeln!(out, "{}", entry.text);
    }
    if entries.len() > limit {
        let _ = writeln!(out, "... {} older entries", entries.len() - limit);
    }
    out
}

/// Title line plus either the chart or why it is unavailable
pub fn render_chart_result<T>(
    title: &str,
    result: &DashboardResult<LoadedChart<T>>,
    render: fn(&BarChart) -> String,
) -> String {
    match result {
        Ok(loaded) => format!("{}\n{}", title, render(&loaded.chart)),
        Err(e) => format!("{}\n  unavailable: {}\n", title, e),
    }
}

/// Stacked daily chart: one line per stack group per day
pub fn render_daily_chart(chart: &BarChart) -> String {
    if chart.is_empty() {
        return "  (no data)\n".to_string();
    }

    let scale = scale_for(chart);
    let label_width = label_width(chart);
    let mut out = String::new();

    for (index, label) in chart.labels.iter().enumerate() {
        for (row, group) in chart.stack_groups().into_iter().enumerate() {
            let mut bar = String::new();
            let mut total = 0.0;
            for (series, dataset) in chart.datasets.iter().enumerate() {
                if dataset.stack != group {
                    continue;
                }
                let value = dataset.data.get(index).copied().unwrap_or(0.0);
                total += value;
                let glyph = SERIES_GLYPHS[series % SERIES_GLYPHS.len()];
                bar.extend(std::iter::repeat(glyph).take(bar_len(value, scale)));
            }

            let shown = if row == 0 { label.as_str() } else { "" };
            let _ = writeln!(
                out,
                "  {:<width$} {:<4} {} {}",
                shown,
                group.unwrap_or(""),
                bar,
                total,
                width = label_width
            );
        }
    }

    out.push_str(&legend(chart));
    out
}

/// One bar per recent train; the glyph shows the direction color
pub fn render_recent_trains(chart: &BarChart) -> String {
    let Some(dataset) = chart.datasets.first() else {
        return "  (no data)\n".to_string();
    };
    if chart.is_empty() {
        return "  (no data)\n".to_string();
    }

    let scale = scale_for(chart);
    let label_width = label_width(chart);
    let mut out = String::new();

    for (index, label) in chart.labels.iter().enumerate() {
        let value = dataset.data.get(index).copied().unwrap_or(0.0);
        let glyph = match dataset.background_color.color_at(index) {
            Some(EASTBOUND_COLOR) => EASTBOUND_GLYPH,
            _ => WESTBOUND_GLYPH,
        };
        let bar: String = std::iter::repeat(glyph).take(bar_len(value, scale)).collect();
        let _ = writeln!(
            out,
            "  {:<width$} {} {}",
            label,
            bar,
            value,
            width = label_width
        );
    }

    let _ = writeln!(
        out,
        "  {} = EB   {} = other   ({})",
        EASTBOUND_GLYPH, WESTBOUND_GLYPH, dataset.label
    );
    out
}

/// Recent trains with their engines, one row per train
pub fn render_recent_table(rows: &[RecentTrainPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<4} {:>5} {:>5}  {}",
        "TRAIN", "DIR", "LOCOS", "CARS", "ENGINES"
    );
    for row in rows {
        let engines = if row.engine_numbers.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            row.engine_numbers.join(", ")
        };
        let _ = writeln!(
            out,
            "{:<16} {:<4} {:>5} {:>5}  {}",
            row.train_id,
            row.direction.as_deref().unwrap_or(PLACEHOLDER),
            row.locomotives.unwrap_or(0),
            row.railcars.unwrap_or(0.0),
            engines
        );
    }
    out
}

/// Engine sightings per direction
pub fn render_engine_table(rows: &[EngineDirectionCount]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<4} {:>6}", "ENGINE", "DIR", "SEEN");
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} {:<4} {:>6}",
            row.engine, row.direction, row.count
        );
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no engines recorded)");
    }
    out
}

fn scale_for(chart: &BarChart) -> f64 {
    let max = chart.y_max();
    if max > 0.0 {
        BAR_WIDTH as f64 / max
    } else {
        0.0
    }
}

fn bar_len(value: f64, scale: f64) -> usize {
    if value <= 0.0 {
        return 0;
    }
    ((value * scale).round() as usize).max(1)
}

fn label_width(chart: &BarChart) -> usize {
    chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn legend(chart: &BarChart) -> String {
    let entries: Vec<String> = chart
        .datasets
        .iter()
        .enumerate()
        .map(|(series, dataset)| {
            let color = match &dataset.background_color {
                Fill::Single(color) => *color,
                Fill::PerBar(_) => "",
            };
            format!(
                "{} {} {}",
                SERIES_GLYPHS[series % SERIES_GLYPHS.len()],
                dataset.label,
                color
            )
            .trim_end()
            .to_string()
        })
        .collect();
    format!("  {}\n", entries.join("   "))
}
