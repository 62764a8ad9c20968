//! Chart Derivation
//!
//! Turns the two summary resources into renderer-neutral bar chart
//! descriptions. The terminal renderer and the browser canvas both draw
//! from a [`BarChart`]; neither looks at the wire rows directly.
//!
//! The shape mirrors a Chart.js config (labels, datasets, stack groups,
//! options) so `railcount summary --format json` prints something a web
//! page could hand straight to a charting library.

use serde::Serialize;

use crate::models::{DailySummaryPoint, RecentTrainPoint};

/// Daily chart series colors
pub const TRAINS_EB_COLOR: &str = "#4e79a7";
pub const TRAINS_WB_COLOR: &str = "#a0cbe8";
pub const CARS_EB_COLOR: &str = "#f28e2b66";
pub const CARS_WB_COLOR: &str = "#f7b6d2";

/// Recent trains bar colors, keyed by direction
pub const EASTBOUND_COLOR: &str = "#59a14f";
pub const WESTBOUND_COLOR: &str = "#e15759";

/// Stack group ids for the daily chart
pub const TRAINS_STACK: &str = "tr";
pub const CARS_STACK: &str = "car";

pub const TRAINS_EB_LABEL: &str = "Trains EB";
pub const TRAINS_WB_LABEL: &str = "Trains WB";
pub const CARS_EB_LABEL: &str = "Cars EB";
pub const CARS_WB_LABEL: &str = "Cars WB";
pub const CARS_PER_TRAIN_LABEL: &str = "Cars/train";

/// Bar color for a train direction.
///
/// Only an exact `"EB"` is eastbound; absent or unexpected values fall
/// through to westbound.
pub fn direction_color(direction: Option<&str>) -> &'static str {
    if direction == Some("EB") {
        EASTBOUND_COLOR
    } else {
        WESTBOUND_COLOR
    }
}

/// Fill for a dataset: one color for every bar, or one per bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fill {
    Single(&'static str),
    PerBar(Vec<&'static str>),
}

impl Fill {
    /// Color of the bar at `index`
    pub fn color_at(&self, index: usize) -> Option<&'static str> {
        match self {
            Fill::Single(color) => Some(*color),
            Fill::PerBar(colors) => colors.get(index).copied(),
        }
    }
}

/// One series of bars
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub background_color: Fill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

/// Axis and legend settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub legend: LegendPosition,
    /// Bars sharing a stack id are drawn on top of each other
    pub stacked: bool,
    pub begin_at_zero: bool,
    pub show_x_labels: bool,
}

/// A bar chart ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

impl BarChart {
    /// Find a dataset by its legend label
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// Distinct stack ids in dataset order; unstacked datasets are their own group
    pub fn stack_groups(&self) -> Vec<Option<&'static str>> {
        let mut groups = Vec::new();
        for dataset in &self.datasets {
            if dataset.stack.is_none() || !groups.contains(&dataset.stack) {
                groups.push(dataset.stack);
            }
        }
        groups
    }

    /// Height of the tallest bar (or stack) across all categories.
    ///
    /// With `begin_at_zero` the result is never negative.
    pub fn y_max(&self) -> f64 {
        let mut max = f64::NEG_INFINITY;

        if self.options.stacked {
            for index in 0..self.labels.len() {
                for group in self.stack_groups() {
                    let total: f64 = self
                        .datasets
                        .iter()
                        .filter(|d| d.stack == group)
                        .filter_map(|d| d.data.get(index))
                        .sum();
                    max = max.max(total);
                }
            }
        } else {
            for dataset in &self.datasets {
                for value in &dataset.data {
                    max = max.max(*value);
                }
            }
        }

        if !max.is_finite() {
            max = 0.0;
        }
        if self.options.begin_at_zero {
            max = max.max(0.0);
        }
        max
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Stacked trains/cars per day, split by direction.
///
/// Absent counts are drawn as zero so all four series stay aligned with the
/// day labels.
pub fn daily_chart(points: &[DailySummaryPoint]) -> BarChart {
    BarChart {
        labels: points.iter().map(|p| p.day.clone()).collect(),
        datasets: vec![
            Dataset {
                label: TRAINS_EB_LABEL,
                data: series(points, |p| p.trains_eb),
                background_color: Fill::Single(TRAINS_EB_COLOR),
                stack: Some(TRAINS_STACK),
            },
            Dataset {
                label: TRAINS_WB_LABEL,
                data: series(points, |p| p.trains_wb),
                background_color: Fill::Single(TRAINS_WB_COLOR),
                stack: Some(TRAINS_STACK),
            },
            Dataset {
                label: CARS_EB_LABEL,
                data: series(points, |p| p.cars_eb),
                background_color: Fill::Single(CARS_EB_COLOR),
                stack: Some(CARS_STACK),
            },
            Dataset {
                label: CARS_WB_LABEL,
                data: series(points, |p| p.cars_wb),
                background_color: Fill::Single(CARS_WB_COLOR),
                stack: Some(CARS_STACK),
            },
        ],
        options: ChartOptions {
            legend: LegendPosition::Bottom,
            stacked: true,
            begin_at_zero: true,
            show_x_labels: true,
        },
    }
}

fn series(points: &[DailySummaryPoint], pick: fn(&DailySummaryPoint) -> Option<f64>) -> Vec<f64> {
    points.iter().map(|p| pick(p).unwrap_or(0.0)).collect()
}

/// Cars per recent train, one bar per train colored by direction
pub fn recent_trains_chart(points: &[RecentTrainPoint]) -> BarChart {
    BarChart {
        labels: points.iter().map(|p| p.train_id.clone()).collect(),
        datasets: vec![Dataset {
            label: CARS_PER_TRAIN_LABEL,
            data: points.iter().map(|p| p.railcars.unwrap_or(0.0)).collect(),
            background_color: Fill::PerBar(
                points
                    .iter()
                    .map(|p| direction_color(p.direction.as_deref()))
                    .collect(),
            ),
            stack: None,
        }],
        options: ChartOptions {
            legend: LegendPosition::Bottom,
            stacked: false,
            begin_at_zero: true,
            show_x_labels: false,
        },
    }
}
