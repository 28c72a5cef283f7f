use std::collections::BTreeMap;

use log::debug;

use super::format_metric;
use crate::data::model::{LabelField, Metric, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub label: String,
    pub year: i64,
    pub value: f64,
}

/// One label's values over time, ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<LinePoint>,
}

/// Background lines share one neutral style; the highlighted line is drawn
/// last, on top.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub metric: Metric,
    pub label_field: LabelField,
    pub background: Vec<LineSeries>,
    /// `None` when the highlighted value matches no label.
    pub highlighted: Option<LineSeries>,
}

/// Per-continent, per-year totals: mean life expectancy, summed population,
/// mean GDP per capita.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentYear {
    pub continent: String,
    pub year: i64,
    pub life_exp: f64,
    pub pop: i64,
    pub gdp_percap: f64,
}

impl ContinentYear {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::LifeExp => self.life_exp,
            Metric::Pop => self.pop as f64,
            Metric::GdpPercap => self.gdp_percap,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    life_exp_sum: f64,
    pop_sum: i64,
    gdp_percap_sum: f64,
    count: usize,
}

/// Reduce rows to one entry per (continent, year), sorted by both.
pub fn aggregate_by_continent(rows: &[&Record]) -> Vec<ContinentYear> {
    let mut groups: BTreeMap<(&str, i64), Accumulator> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry((row.continent.as_str(), row.year)).or_default();
        acc.life_exp_sum += row.life_exp;
        acc.pop_sum += row.pop;
        acc.gdp_percap_sum += row.gdp_percap;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|((continent, year), acc)| {
            let n = acc.count as f64;
            ContinentYear {
                continent: continent.to_string(),
                year,
                life_exp: acc.life_exp_sum / n,
                pop: acc.pop_sum,
                gdp_percap: acc.gdp_percap_sum / n,
            }
        })
        .collect()
}

/// Build one time series per distinct `label_field` value and pull out the
/// one equal to `highlighted`.
///
/// Each label field carries its own reduction rule: countries are already
/// one row per year, continents are aggregated with [`aggregate_by_continent`].
pub fn line_plot_series(
    rows: &[&Record],
    metric: Metric,
    label_field: LabelField,
    highlighted: &str,
) -> LinePlot {
    let points: Vec<LinePoint> = match label_field {
        LabelField::Country => rows
            .iter()
            .map(|r| LinePoint {
                label: r.country.clone(),
                year: r.year,
                value: r.metric(metric),
            })
            .collect(),
        LabelField::Continent => aggregate_by_continent(rows)
            .into_iter()
            .map(|c| LinePoint {
                value: c.metric(metric),
                label: c.continent,
                year: c.year,
            })
            .collect(),
    };

    let mut by_label: BTreeMap<String, Vec<LinePoint>> = BTreeMap::new();
    for point in points {
        by_label.entry(point.label.clone()).or_default().push(point);
    }

    let mut background = Vec::with_capacity(by_label.len());
    let mut highlight = None;
    for (label, mut points) in by_label {
        points.sort_by_key(|p| p.year);
        let series = LineSeries { label, points };
        if series.label == highlighted {
            highlight = Some(series);
        } else {
            background.push(series);
        }
    }

    debug!(
        "line plot {metric} by {label_field}: {} background series, highlight {:?} {}",
        background.len(),
        highlighted,
        if highlight.is_some() { "found" } else { "absent" }
    );

    LinePlot {
        metric,
        label_field,
        background,
        highlighted: highlight,
    }
}

/// `"<label field>: <label>, year: <year>, <metric>: <value>"`
pub fn tooltip_text(label_field: LabelField, metric: Metric, point: &LinePoint) -> String {
    format!(
        "{}: {}, year: {}, {}: {}",
        label_field,
        point.label,
        point.year,
        metric,
        format_metric(metric, point.value)
    )
}

impl LinePlot {
    pub fn series_count(&self) -> usize {
        self.background.len() + usize::from(self.highlighted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::fixtures::{record, sample_records};

    fn rows(records: &[Record]) -> Vec<&Record> {
        records.iter().collect()
    }

    #[test]
    fn test_continent_aggregation_mean_sum_mean() {
        let records = sample_records();
        let agg = aggregate_by_continent(&rows(&records));

        assert_eq!(agg.len(), 4);
        let africa_1952 = &agg[0];
        assert_eq!((africa_1952.continent.as_str(), africa_1952.year), ("Africa", 1952));
        assert_eq!(africa_1952.pop, 2_682_462 + 6_464_046);
        assert!((africa_1952.life_exp - (38.09 + 42.27) / 2.0).abs() < 1e-9);
        assert!((africa_1952.gdp_percap - (700.0 + 853.54) / 2.0).abs() < 1e-9);

        let asia_1957 = &agg[3];
        assert_eq!(asia_1957.pop, 91_563_009);
        assert_eq!(asia_1957.life_exp, 65.5);
    }

    #[test]
    fn test_continent_series_use_aggregates() {
        let records = sample_records();
        let plot = line_plot_series(&rows(&records), Metric::Pop, LabelField::Continent, "Asia");

        assert_eq!(plot.background.len(), 1);
        let africa = &plot.background[0];
        assert_eq!(africa.label, "Africa");
        assert_eq!(africa.points[1].value, (2_894_650 + 7_454_779) as f64);

        let asia = plot.highlighted.as_ref().unwrap();
        assert_eq!(asia.points.len(), 2);
    }

    #[test]
    fn test_country_series_count_and_length() {
        let records = sample_records();
        let plot = line_plot_series(&rows(&records), Metric::LifeExp, LabelField::Country, "Kenya");

        let countries: BTreeSet<&str> = records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(plot.series_count(), countries.len());
        for series in plot.background.iter().chain(plot.highlighted.iter()) {
            let years: BTreeSet<i64> = records
                .iter()
                .filter(|r| r.country == series.label)
                .map(|r| r.year)
                .collect();
            assert_eq!(series.points.len(), years.len());
        }
    }

    #[test]
    fn test_highlight_never_in_background() {
        let records = sample_records();
        for field in LabelField::ALL {
            for label in ["Chad", "Kenya", "Japan", "Africa", "Asia"] {
                let plot = line_plot_series(&rows(&records), Metric::GdpPercap, field, label);
                assert!(plot.background.iter().all(|s| s.label != label));
            }
        }
    }

    #[test]
    fn test_unknown_highlight_leaves_background_intact() {
        let records = sample_records();
        let plot = line_plot_series(&rows(&records), Metric::LifeExp, LabelField::Country, "Atlantis");
        assert!(plot.highlighted.is_none());
        assert_eq!(plot.background.len(), 3);
    }

    #[test]
    fn test_points_sorted_by_year() {
        let records = vec![
            record("Chad", "Africa", 1967, 41.0, 3, 3.0),
            record("Chad", "Africa", 1952, 38.0, 1, 1.0),
            record("Chad", "Africa", 1957, 39.5, 2, 2.0),
        ];
        let plot = line_plot_series(&rows(&records), Metric::Pop, LabelField::Country, "Chad");
        let years: Vec<i64> = plot.highlighted.unwrap().points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1952, 1957, 1967]);
    }

    #[test]
    fn test_tooltip() {
        let records = sample_records();
        let plot = line_plot_series(&rows(&records), Metric::LifeExp, LabelField::Country, "Chad");
        let chad = plot.highlighted.as_ref().unwrap();
        assert_eq!(
            tooltip_text(plot.label_field, plot.metric, &chad.points[0]),
            "country: Chad, year: 1952, lifeExp: 38.09"
        );
    }

    #[test]
    fn test_empty_rows() {
        let plot = line_plot_series(&[], Metric::Pop, LabelField::Continent, "Asia");
        assert_eq!(plot.series_count(), 0);
    }
}
