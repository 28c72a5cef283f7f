use crate::data::model::{LabelField, Metric, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Category used for colour and marker.
    pub hue: String,
    pub country: String,
    pub year: i64,
}

/// One point per row, in row order. `hue` only picks the category.
pub fn scatter_series(rows: &[&Record], x: Metric, y: Metric, hue: LabelField) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|row| ScatterPoint {
            x: row.metric(x),
            y: row.metric(y),
            hue: row.label(hue).to_string(),
            country: row.country.clone(),
            year: row.year,
        })
        .collect()
}
