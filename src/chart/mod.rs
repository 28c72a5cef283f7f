/// Chart-data shaping: turn a row view into the series each plot draws.
///
/// Nothing here knows about egui; the `ui::plot` module consumes these
/// structures and does the drawing.

pub mod box_plot;
pub mod line;
pub mod scatter;

use crate::data::model::Metric;

/// Human-readable metric value: population as a whole number, rates with
/// two decimals.
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Pop => format!("{:.0}", value),
        Metric::LifeExp | Metric::GdpPercap => format!("{:.2}", value),
    }
}
