use std::collections::HashMap;

use log::debug;

use crate::data::model::{Dimension, Metric, Record, Value};

/// One observation inside a box, with the fields shown on hover.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPoint {
    pub value: f64,
    pub country: String,
    pub continent: String,
    pub year: i64,
}

/// All raw values sharing one x-axis key.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub key: Value,
    pub points: Vec<BoxPoint>,
}

/// Five-number summary plus the points beyond the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Group `rows` by `x`, keeping every raw `y` value. Groups appear in the
/// order their key is first seen.
pub fn box_plot_series(rows: &[&Record], x: Dimension, y: Metric) -> Vec<BoxGroup> {
    let mut groups: Vec<BoxGroup> = Vec::new();
    let mut index: HashMap<Value, usize> = HashMap::new();

    for row in rows {
        let key = row.dimension(x);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(BoxGroup {
                key,
                points: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].points.push(BoxPoint {
            value: row.metric(y),
            country: row.country.clone(),
            continent: row.continent.clone(),
            year: row.year,
        });
    }

    debug!("box plot {x} × {y}: {} groups from {} rows", groups.len(), rows.len());
    groups
}

impl BoxGroup {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Linear-interpolated quartiles, whiskers at the furthest points within
    /// 1.5 × IQR of the box. `None` for an empty group.
    pub fn summary(&self) -> Option<BoxSummary> {
        let mut sorted = self.values();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = || sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_records;

    #[test]
    fn test_two_continents_two_groups() {
        let records = sample_records();
        let rows: Vec<&Record> = records.iter().collect();
        let groups = box_plot_series(&rows, Dimension::Continent, Metric::LifeExp);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, Value::Text("Africa".into()));
        assert_eq!(groups[0].points.len(), 4);
        assert!(groups[0].points.iter().all(|p| p.continent == "Africa"));
        assert_eq!(groups[1].key, Value::Text("Asia".into()));
        assert!(groups[1].points.iter().all(|p| p.country == "Japan"));
    }

    #[test]
    fn test_values_are_raw_not_aggregated() {
        let records = sample_records();
        let rows: Vec<&Record> = records.iter().collect();
        let groups = box_plot_series(&rows, Dimension::Year, Metric::Pop);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, Value::Integer(1952));
        assert_eq!(
            groups[0].values(),
            vec![2_682_462.0, 6_464_046.0, 86_459_025.0]
        );
    }

    #[test]
    fn test_empty_rows_no_groups() {
        assert!(box_plot_series(&[], Dimension::Country, Metric::GdpPercap).is_empty());
    }

    #[test]
    fn test_summary_with_outlier() {
        let group = BoxGroup {
            key: Value::Text("x".into()),
            points: [4.0, 1.0, 100.0, 3.0, 2.0]
                .into_iter()
                .map(|value| BoxPoint {
                    value,
                    country: String::new(),
                    continent: String::new(),
                    year: 0,
                })
                .collect(),
        };
        let s = group.summary().unwrap();
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 4.0);
        assert_eq!(s.outliers, vec![100.0]);
    }

    #[test]
    fn test_summary_interpolates() {
        let group = BoxGroup {
            key: Value::Integer(1952),
            points: [1.0, 2.0, 3.0, 4.0]
                .into_iter()
                .map(|value| BoxPoint {
                    value,
                    country: String::new(),
                    continent: String::new(),
                    year: 1952,
                })
                .collect(),
        };
        let s = group.summary().unwrap();
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert!(s.outliers.is_empty());
    }
}
