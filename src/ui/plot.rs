use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use eframe::egui::{self, Stroke, Ui};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, Points,
};

use crate::chart::box_plot::box_plot_series;
use crate::chart::format_metric;
use crate::chart::line::{LinePoint, LineSeries, line_plot_series, tooltip_text};
use crate::chart::scatter::{ScatterPoint, scatter_series};
use crate::color::{ACCENT, BACKGROUND_LINE, ColorMap};
use crate::data::model::{Dimension, LabelField, Metric};
use crate::state::AppState;

/// Above this many categories the legend is hidden; colours still apply.
const MAX_LEGEND_ENTRIES: usize = 20;

// ---------------------------------------------------------------------------
// Axis selectors
// ---------------------------------------------------------------------------

fn field_combo<T>(ui: &mut Ui, id: &str, label: &str, current: &mut T, options: &[T]) -> bool
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let mut changed = false;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for &option in options {
                changed |= ui
                    .selectable_value(current, option, option.to_string())
                    .changed();
            }
        });
    changed
}

/// Shows the category name at integer x positions and nothing in between.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Box per x category with every raw point overlaid.
pub fn box_plot(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        field_combo(ui, "boxplot_x", "x axis", &mut state.charts.box_x, &Dimension::ALL);
        field_combo(ui, "boxplot_y", "y axis", &mut state.charts.box_y, &Metric::ALL);
    });

    let x = state.charts.box_x;
    let y = state.charts.box_y;
    let rows = state.chart_rows();
    let mut groups = box_plot_series(&rows, x, y);
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    let labels: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
    let colors = ColorMap::new(labels.iter().map(String::as_str));

    let mut boxes = Vec::with_capacity(groups.len());
    let mut overlays = Vec::with_capacity(groups.len());
    // (group position, value bits) → hover text for the overlaid points
    let mut hover: HashMap<(usize, u64), String> = HashMap::new();

    for (pos, group) in groups.iter().enumerate() {
        let Some(summary) = group.summary() else {
            continue;
        };
        let label = &labels[pos];
        let color = colors.color_for(label);

        boxes.push(
            BoxElem::new(
                pos as f64,
                BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                ),
            )
            .name(label)
            .box_width(0.6)
            .whisker_width(0.3)
            .fill(color.gamma_multiply(0.3))
            .stroke(Stroke::new(1.5, color)),
        );

        let points: Vec<[f64; 2]> = group
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                hover.entry((pos, p.value.to_bits())).or_insert_with(|| {
                    format!(
                        "country: {}\ncontinent: {}\nyear: {}\n{x}: {label}\n{y}: {}",
                        p.country,
                        p.continent,
                        p.year,
                        format_metric(y, p.value)
                    )
                });
                [pos as f64 + jitter(i), p.value]
            })
            .collect();
        overlays.push(Points::new(points).name(label).color(color).radius(1.5));

        if !summary.outliers.is_empty() {
            let marks: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [pos as f64, v]).collect();
            overlays.push(
                Points::new(marks)
                    .name(label)
                    .color(color)
                    .shape(MarkerShape::Diamond)
                    .filled(false)
                    .radius(4.0),
            );
        }
    }

    let mut plot = Plot::new("box_plot")
        .x_axis_label(x.name())
        .y_axis_label(y.name())
        .x_axis_formatter(category_axis(labels.clone()))
        .label_formatter(move |name, value: &PlotPoint| {
            let pos = value.x.round().max(0.0) as usize;
            hover
                .get(&(pos, value.y.to_bits()))
                .cloned()
                .unwrap_or_else(|| format!("{name}\n{y}: {}", format_metric(y, value.y)))
        });
    if labels.len() <= MAX_LEGEND_ENTRIES {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        plot_ui.box_plot(
            BoxPlot::new(boxes).element_formatter(Box::new(move |elem, _plot| {
                let spread = &elem.spread;
                format!(
                    "{}\nmax: {}\nq3: {}\nmedian: {}\nq1: {}\nmin: {}",
                    elem.name,
                    format_metric(y, spread.upper_whisker),
                    format_metric(y, spread.quartile3),
                    format_metric(y, spread.median),
                    format_metric(y, spread.quartile1),
                    format_metric(y, spread.lower_whisker),
                )
            })),
        );
        for overlay in overlays {
            plot_ui.points(overlay);
        }
    });
}

/// Deterministic horizontal spread so overlaid points don't stack.
fn jitter(i: usize) -> f64 {
    ((i % 9) as f64 - 4.0) * 0.035
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// One point per row, coloured and shaped by the hue column.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        field_combo(ui, "scatterplot_x", "x axis", &mut state.charts.scatter_x, &Metric::ALL);
        field_combo(ui, "scatterplot_y", "y axis", &mut state.charts.scatter_y, &Metric::ALL);
        field_combo(ui, "scatterplot_hue", "hue", &mut state.charts.scatter_hue, &LabelField::ALL);
    });

    let x = state.charts.scatter_x;
    let y = state.charts.scatter_y;
    let hue = state.charts.scatter_hue;
    let rows = state.chart_rows();
    let points = scatter_series(&rows, x, y, hue);

    let mut by_hue: BTreeMap<&str, Vec<&ScatterPoint>> = BTreeMap::new();
    // (x bits, y bits) → "country, year" for hover
    let mut hover: HashMap<(u64, u64), String> = HashMap::new();
    for p in &points {
        by_hue.entry(p.hue.as_str()).or_default().push(p);
        hover
            .entry((p.x.to_bits(), p.y.to_bits()))
            .or_insert_with(|| format!("{}, {}", p.country, p.year));
    }
    let colors = ColorMap::new(by_hue.keys().copied());
    let shapes: Vec<MarkerShape> = MarkerShape::all().collect();

    let mut plot = Plot::new("scatter_plot")
        .x_axis_label(x.name())
        .y_axis_label(y.name())
        .label_formatter(move |name, value: &PlotPoint| {
            let mut head = String::new();
            if !name.is_empty() {
                head.push_str(&format!("{hue}: {name}\n"));
            }
            if let Some(row) = hover.get(&(value.x.to_bits(), value.y.to_bits())) {
                head.push_str(row);
                head.push('\n');
            }
            format!(
                "{head}{x}: {}\n{y}: {}",
                format_metric(x, value.x),
                format_metric(y, value.y)
            )
        });
    if colors.len() <= MAX_LEGEND_ENTRIES {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (category, members) in &by_hue {
            let shape = colors
                .index_of(category)
                .map(|i| shapes[i % shapes.len()])
                .unwrap_or(MarkerShape::Circle);
            let coords: Vec<[f64; 2]> = members.iter().map(|p| [p.x, p.y]).collect();
            plot_ui.points(
                Points::new(coords)
                    .name(*category)
                    .color(colors.color_for(category))
                    .shape(shape)
                    .filled(true)
                    .radius(3.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Line plot
// ---------------------------------------------------------------------------

/// Neutral lines for every label, the highlighted one on top in the accent colour.
pub fn line_plot(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        field_combo(ui, "lineplot_y", "y axis", &mut state.charts.line_metric, &Metric::ALL);
        let mut label = state.charts.line_label;
        if field_combo(ui, "lineplot_label", "label", &mut label, &LabelField::ALL) {
            state.set_line_label(label);
        }

        ui.label("highlight");
        let options = state.highlight_options().clone();
        egui::ComboBox::from_id_salt("lineplot_highlight")
            .selected_text(state.charts.line_highlight.as_str())
            .height(400.0)
            .show_ui(ui, |ui: &mut Ui| {
                for option in &options {
                    ui.selectable_value(
                        &mut state.charts.line_highlight,
                        option.clone(),
                        option.as_str(),
                    );
                }
            });
    });

    let rows = state.chart_rows();
    let line_plot = line_plot_series(
        &rows,
        state.charts.line_metric,
        state.charts.line_label,
        &state.charts.line_highlight,
    );
    let metric = line_plot.metric;
    let label_field = line_plot.label_field;
    ui.label(format!("{} series", line_plot.series_count()));

    Plot::new("line_plot")
        .x_axis_label("year")
        .y_axis_label(metric.name())
        .label_formatter(move |name, value: &PlotPoint| {
            if name.is_empty() {
                return format!("year: {:.0}\n{metric}: {}", value.x, format_metric(metric, value.y));
            }
            let point = LinePoint {
                label: name.to_string(),
                year: value.x.round() as i64,
                value: value.y,
            };
            tooltip_text(label_field, metric, &point)
        })
        .show(ui, |plot_ui| {
            for series in &line_plot.background {
                plot_ui.line(series_line(series).color(BACKGROUND_LINE).width(1.0));
            }
            if let Some(series) = &line_plot.highlighted {
                plot_ui.line(series_line(series).color(ACCENT).width(3.0));
            }
        });
}

fn series_line(series: &LineSeries) -> Line {
    let coords: Vec<[f64; 2]> = series
        .points
        .iter()
        .map(|p| [p.year as f64, p.value])
        .collect();
    Line::new(coords).name(&series.label)
}
