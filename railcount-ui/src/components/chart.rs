//! Chart Component
//!
//! Bar charts drawn on HTML5 Canvas from a [`BarChart`] description.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use railcount::charts::{EASTBOUND_COLOR, WESTBOUND_COLOR};
use railcount::{BarChart, Fill};

use crate::state::global::ChartSlot;

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 10.0;
const MARGIN_TOP: f64 = 10.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Share of each category slot taken by its bars
const BAR_FILL: f64 = 0.8;

/// Canvas-backed bar chart with a status line while loading or on failure
#[component]
pub fn BarChartCanvas(
    /// DOM id of the canvas
    id: &'static str,
    title: &'static str,
    slot: RwSignal<ChartSlot>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw when the chart arrives
    create_effect(move |_| {
        let slot = slot.get();
        if let (Some(canvas), Some(chart)) = (canvas_ref.get(), slot.chart()) {
            draw_chart(&canvas, chart);
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <canvas
                id=id
                node_ref=canvas_ref
                width="800"
                height="320"
                class="w-full rounded-lg"
            />
            {move || match slot.get() {
                ChartSlot::Loading => view! {
                    <p class="text-sm text-gray-400 mt-2">"Loading..."</p>
                }.into_view(),
                ChartSlot::Unavailable(reason) => view! {
                    <p class="text-sm text-red-400 mt-2">{format!("Unavailable: {}", reason)}</p>
                }.into_view(),
                ChartSlot::Ready(_) => view! {}.into_view(),
            }}
        </section>
    }
}

/// One bar segment in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
}

/// Dataset indices drawn as one bar: datasets sharing a stack id when the
/// chart is stacked, otherwise one dataset per bar
fn bar_groups(chart: &BarChart) -> Vec<Vec<usize>> {
    let mut groups: Vec<(Option<&str>, Vec<usize>)> = Vec::new();
    for (index, dataset) in chart.datasets.iter().enumerate() {
        let key = if chart.options.stacked { dataset.stack } else { None };
        match groups.iter_mut().find(|(k, _)| key.is_some() && *k == key) {
            Some((_, members)) => members.push(index),
            None => groups.push((key, vec![index])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

/// Lay out every non-empty bar segment for a `width` x `height` canvas
pub fn layout_bars(chart: &BarChart, width: f64, height: f64) -> Vec<BarRect> {
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = chart.y_max();
    if chart.is_empty() || y_max <= 0.0 || plot_width <= 0.0 || plot_height <= 0.0 {
        return Vec::new();
    }

    let groups = bar_groups(chart);
    let slot_width = plot_width / chart.labels.len() as f64;
    let bar_width = slot_width * BAR_FILL / groups.len() as f64;
    let baseline = MARGIN_TOP + plot_height;
    let scale = plot_height / y_max;

    let mut rects = Vec::new();
    for category in 0..chart.labels.len() {
        let slot_left = MARGIN_LEFT + category as f64 * slot_width + slot_width * (1.0 - BAR_FILL) / 2.0;
        for (g, members) in groups.iter().enumerate() {
            let x = slot_left + g as f64 * bar_width;
            let mut top = baseline;
            for &index in members {
                let dataset = &chart.datasets[index];
                let value = dataset.data.get(category).copied().unwrap_or(0.0);
                if value <= 0.0 {
                    continue;
                }
                let h = value * scale;
                top -= h;
                rects.push(BarRect {
                    x,
                    y: top,
                    width: bar_width,
                    height: h,
                    color: dataset.background_color.color_at(category).unwrap_or(WESTBOUND_COLOR),
                });
            }
        }
    }
    rects
}

/// Legend entries: (color, label)
fn legend_entries(chart: &BarChart) -> Vec<(&'static str, String)> {
    let mut entries = Vec::new();
    for dataset in &chart.datasets {
        match &dataset.background_color {
            Fill::Single(color) => entries.push((*color, dataset.label.to_string())),
            Fill::PerBar(_) => {
                entries.push((EASTBOUND_COLOR, format!("{} (EB)", dataset.label)));
                entries.push((WESTBOUND_COLOR, format!("{} (WB)", dataset.label)));
            }
        }
    }
    entries
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, chart: &BarChart) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    // Clear canvas
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    // Horizontal grid lines (5 lines), y-axis from zero
    let y_max = chart.y_max();
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = MARGIN_TOP + (i as f64 / 5.0) * plot_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 5.0) * y_max;
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    for rect in layout_bars(chart, width, height) {
        ctx.set_fill_style(&rect.color.into());
        ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    // Category labels
    if chart.options.show_x_labels && !chart.is_empty() {
        let slot_width = (width - MARGIN_LEFT - MARGIN_RIGHT) / chart.labels.len() as f64;
        ctx.set_fill_style(&"#9ca3af".into());
        for (i, label) in chart.labels.iter().enumerate() {
            let x = MARGIN_LEFT + i as f64 * slot_width + 2.0;
            let _ = ctx.fill_text(label, x, MARGIN_TOP + plot_height + 16.0);
        }
    }

    // Legend along the bottom
    let mut x = MARGIN_LEFT;
    let y = height - 12.0;
    for (color, label) in legend_entries(chart) {
        ctx.set_fill_style(&color.into());
        ctx.fill_rect(x, y - 9.0, 10.0, 10.0);
        ctx.set_fill_style(&"#d1d5db".into()); // gray-300
        let _ = ctx.fill_text(&label, x + 14.0, y);
        x += 14.0 + label.len() as f64 * 7.0 + 16.0;
    }

    if chart.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data yet", width / 2.0 - 40.0, height / 2.0);
    }
}
