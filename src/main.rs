mod app;
mod chart;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::ExplorerApp;
use data::filter::Selection;
use data::model::{Dimension, LabelField, Metric};
use state::{AppState, ChartSelections};

#[derive(Parser, Debug)]
#[command(name = "gapminder-explorer")]
#[command(about = "Explore the gapminder country indicators table.", long_about = None)]
struct Args {
    /// CSV, JSON or Parquet file with columns
    /// country, continent, year, lifeExp, pop, gdpPercap.
    #[arg(default_value = "gapminder.csv")]
    path: PathBuf,

    /// Initial window width.
    #[arg(long, default_value_t = 1200.0)]
    width: f32,

    /// Initial window height.
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Box plot x axis (country, continent, year).
    #[arg(long, default_value = "continent")]
    box_x: Dimension,

    /// Box plot y axis (lifeExp, pop, gdpPercap).
    #[arg(long, default_value = "lifeExp")]
    box_y: Metric,

    #[arg(long, default_value = "gdpPercap")]
    scatter_x: Metric,

    #[arg(long, default_value = "lifeExp")]
    scatter_y: Metric,

    /// Scatter colour / marker column (country, continent).
    #[arg(long, default_value = "continent")]
    hue: LabelField,

    #[arg(long, default_value = "lifeExp")]
    line_metric: Metric,

    /// Line label column (country, continent).
    #[arg(long, default_value = "continent")]
    line_label: LabelField,

    /// Label drawn in the accent colour. Defaults to the first label.
    #[arg(long)]
    highlight: Option<String>,

    /// Start with the table filtered to these continents (repeatable).
    #[arg(long = "continent")]
    continents: Vec<String>,
}

impl Args {
    fn chart_selections(&self) -> ChartSelections {
        ChartSelections {
            box_x: self.box_x,
            box_y: self.box_y,
            scatter_x: self.scatter_x,
            scatter_y: self.scatter_y,
            scatter_hue: self.hue,
            line_metric: self.line_metric,
            line_label: self.line_label,
            line_highlight: self.highlight.clone().unwrap_or_default(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = data::loader::load_file(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;
    let (min_year, max_year) = dataset.year_bounds();
    log::info!(
        "Loaded {} rows ({} countries, {} continents, {min_year}–{max_year}) from {}",
        dataset.len(),
        dataset.countries().len(),
        dataset.continents().len(),
        args.path.display()
    );

    let mut state = AppState::new(
        Arc::new(dataset),
        args.path.display().to_string(),
        args.chart_selections(),
    );
    if !args.continents.is_empty() {
        state.set_continents(Selection::subset(args.continents.iter().cloned()));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gapminder Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("eframe: {e}"))
}
