use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::data::filter::{FilterCriteria, Selection, filtered_indices};
use crate::data::model::{Dataset, Dimension, LabelField, Metric, Record};

// ---------------------------------------------------------------------------
// Chart selections
// ---------------------------------------------------------------------------

/// Axis / grouping choices for the three charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSelections {
    pub box_x: Dimension,
    pub box_y: Metric,
    pub scatter_x: Metric,
    pub scatter_y: Metric,
    pub scatter_hue: LabelField,
    pub line_metric: Metric,
    pub line_label: LabelField,
    /// Label drawn with the accent colour. May name nothing.
    pub line_highlight: String,
}

impl Default for ChartSelections {
    fn default() -> Self {
        Self {
            box_x: Dimension::Continent,
            box_y: Metric::LifeExp,
            scatter_x: Metric::GdpPercap,
            scatter_y: Metric::LifeExp,
            scatter_hue: LabelField::Continent,
            line_metric: Metric::LifeExp,
            line_label: LabelField::Continent,
            line_highlight: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Table,
    BoxPlot,
    Scatter,
    Line,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Table, Tab::BoxPlot, Tab::Scatter, Tab::Line];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Table => "Table",
            Tab::BoxPlot => "Box plot",
            Tab::Scatter => "Scatter plot",
            Tab::Line => "Line plot",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Read-only snapshot loaded at startup.
    pub dataset: Arc<Dataset>,

    /// Where the dataset came from, for the status bar.
    pub source: String,

    /// Table filter widgets.
    pub criteria: FilterCriteria,

    /// Indices of rows passing `criteria` (cached).
    pub visible_indices: Vec<usize>,

    /// When set, charts draw the filtered rows instead of the whole table.
    pub charts_follow_filters: bool,

    pub charts: ChartSelections,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, source: String, charts: ChartSelections) -> Self {
        let criteria = FilterCriteria::everything(&dataset);
        let visible_indices = (0..dataset.len()).collect();
        let mut state = Self {
            dataset,
            source,
            criteria,
            visible_indices,
            charts_follow_filters: false,
            charts,
            tab: Tab::Table,
            status_message: None,
        };
        state.ensure_highlight();
        state
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.criteria);
        debug!(
            "refilter: {} of {} rows visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    pub fn visible_rows(&self) -> Vec<&Record> {
        let records = self.dataset.records();
        self.visible_indices.iter().map(|&i| &records[i]).collect()
    }

    /// Rows the charts draw from.
    pub fn chart_rows(&self) -> Vec<&Record> {
        if self.charts_follow_filters {
            self.visible_rows()
        } else {
            self.dataset.rows()
        }
    }

    // -- Continent / country selection --

    /// Countries offered by the country selector.
    pub fn country_options(&self) -> BTreeSet<String> {
        self.dataset.countries_in(&self.criteria.continents)
    }

    pub fn toggle_continent(&mut self, continent: &str) {
        let universe = self.dataset.continents().clone();
        self.criteria.continents.toggle(continent, &universe);
        self.continents_changed();
    }

    pub fn set_continents(&mut self, selection: Selection) {
        self.criteria.continents = selection;
        self.continents_changed();
    }

    fn continents_changed(&mut self) {
        let options = self.country_options();
        if self.criteria.countries.retain_within(&options) {
            debug!("pruned country selection to the chosen continents");
        }
        self.refilter();
    }

    pub fn toggle_country(&mut self, country: &str) {
        let universe = self.country_options();
        self.criteria.countries.toggle(country, &universe);
        self.refilter();
    }

    pub fn set_countries(&mut self, selection: Selection) {
        self.criteria.countries = selection;
        self.refilter();
    }

    // -- Year range --

    /// Clamp to the dataset bounds and keep `min <= max`.
    pub fn set_year_range(&mut self, min_year: i64, max_year: i64) {
        let (lo, hi) = self.dataset.year_bounds();
        let min_year = min_year.clamp(lo, hi);
        let max_year = max_year.clamp(min_year, hi);
        if (min_year, max_year) != (self.criteria.min_year, self.criteria.max_year) {
            self.criteria.min_year = min_year;
            self.criteria.max_year = max_year;
            self.refilter();
        }
    }

    // -- Line chart --

    /// Options for the highlight selector.
    pub fn highlight_options(&self) -> &BTreeSet<String> {
        self.dataset.label_values(self.charts.line_label)
    }

    pub fn set_line_label(&mut self, field: LabelField) {
        self.charts.line_label = field;
        self.ensure_highlight();
    }

    /// Point the highlight at the first label when it names nothing.
    fn ensure_highlight(&mut self) {
        let options = self.highlight_options();
        if options.contains(&self.charts.line_highlight) {
            return;
        }
        let first = options.iter().next().cloned();
        if let Some(first) = first {
            self.charts.line_highlight = first;
        }
    }
}
