use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::format_metric;
use crate::data::model::Metric;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Render the filtered rows. Only the visible slice is laid out each frame.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let rows = state.visible_rows();
    ui.label(format!("{} rows", rows.len()));

    if rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows match the current filters.");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(50.0))
        .columns(Column::auto().at_least(90.0), 2)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in ["country", "continent", "year"]
                .into_iter()
                .chain(Metric::ALL.map(Metric::name))
            {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let record = rows[row.index()];
                row.col(|ui| {
                    ui.label(&record.country);
                });
                row.col(|ui| {
                    ui.label(&record.continent);
                });
                row.col(|ui| {
                    ui.label(record.year.to_string());
                });
                for metric in Metric::ALL {
                    row.col(|ui| {
                        ui.label(format_metric(metric, record.metric(metric)));
                    });
                }
            });
        });
}
