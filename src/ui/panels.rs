use std::collections::BTreeSet;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{Selection, filter};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Own handle so the loops below can mutate `state`.
    let dataset = Arc::clone(&state.dataset);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Years");
            let (lo, hi) = dataset.year_bounds();
            let mut min_year = state.criteria.min_year;
            let mut max_year = state.criteria.max_year;
            let min_changed = ui
                .add(egui::Slider::new(&mut min_year, lo..=hi).text("from"))
                .changed();
            let max_changed = ui
                .add(egui::Slider::new(&mut max_year, lo..=hi).text("to"))
                .changed();
            if min_changed {
                // Dragging the lower bound past the upper pushes the upper along.
                state.set_year_range(min_year, max_year.max(min_year));
            } else if max_changed {
                state.set_year_range(min_year.min(max_year), max_year);
            }
            ui.separator();

            // ---- Continents ----
            let continents = dataset.continents();
            if let Some(choice) = selection_section(
                ui,
                "Continents",
                continents,
                &state.criteria.continents,
            ) {
                match choice {
                    SectionChange::Toggle(value) => state.toggle_continent(&value),
                    SectionChange::Replace(sel) => state.set_continents(sel),
                }
            }

            // ---- Countries (constrained to the chosen continents) ----
            let countries = state.country_options();
            if let Some(choice) =
                selection_section(ui, "Countries", &countries, &state.criteria.countries)
            {
                match choice {
                    SectionChange::Toggle(value) => state.toggle_country(&value),
                    SectionChange::Replace(sel) => state.set_countries(sel),
                }
            }
        });
}

enum SectionChange {
    Toggle(String),
    Replace(Selection),
}

/// Collapsible checkbox list with All / None buttons. Returns the change the
/// user made this frame, if any.
fn selection_section(
    ui: &mut Ui,
    title: &str,
    options: &BTreeSet<String>,
    selection: &Selection,
) -> Option<SectionChange> {
    let n_total = options.len();
    let n_selected = selection
        .selected_count()
        .unwrap_or(n_total)
        .min(n_total);
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    let mut change = None;
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(title == "Continents")
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    change = Some(SectionChange::Replace(Selection::All));
                }
                if ui.small_button("None").clicked() {
                    change = Some(SectionChange::Replace(Selection::Subset(BTreeSet::new())));
                }
            });

            for value in options {
                let mut checked = selection.admits(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    change = Some(SectionChange::Toggle(value.clone()));
                }
            }
        });
    change
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export CSV…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }

        ui.separator();

        if ui
            .selectable_label(state.charts_follow_filters, "Charts follow filters")
            .clicked()
        {
            state.charts_follow_filters = !state.charts_follow_filters;
        }
    });
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{}: {} rows loaded, {} visible",
            state.source,
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .add_filter("CSV", &["csv"])
        .set_file_name("gapminder_filtered.csv")
        .save_file();

    if let Some(path) = file {
        let rows = filter(&state.dataset, &state.criteria);
        match crate::data::export::export_csv(&path, &rows) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", rows.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
