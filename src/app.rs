use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Every frame re-derives the table and charts from the current widget state.
pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: status ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table or chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!("[Gapminder] {}", self.state.tab.title()));
            match self.state.tab {
                Tab::Table => table::data_table(ui, &self.state),
                Tab::BoxPlot => plot::box_plot(ui, &mut self.state),
                Tab::Scatter => plot::scatter_plot(ui, &mut self.state),
                Tab::Line => plot::line_plot(ui, &mut self.state),
            }
        });
    }
}
