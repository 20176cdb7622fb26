use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tidyframe::data::{self, Dataset};

const ROW_HEIGHT: f32 = 18.0;

/// First and last `n` rows, side by side when there is room.
pub fn head_and_tail(ui: &mut egui::Ui, id: &str, dataset: &Dataset, n: usize) {
    if dataset.row_count() <= n {
        table(ui, (id, "all"), &dataset.head(n));
        return;
    }

    ui.weak(format!("First {n} rows"));
    table(ui, (id, "head"), &dataset.head(n));
    ui.weak(format!("Last {n} rows"));
    table(ui, (id, "tail"), &dataset.tail(n));
}

fn table(ui: &mut egui::Ui, id: impl std::hash::Hash, dataset: &Dataset) {
    let labels: Vec<Vec<Option<String>>> = dataset
        .columns()
        .iter()
        .map(|column| {
            data::labels(column).unwrap_or_else(|err| {
                log::warn!("Cannot display column '{}': {err}", column.name());
                vec![None; column.len()]
            })
        })
        .collect();

    ui.push_id(id, |ui| {
        egui::ScrollArea::horizontal().show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), dataset.column_count())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for column in dataset.columns() {
                        header.col(|ui| {
                            ui.strong(column.name().as_str())
                                .on_hover_text(data::kind_of(column).as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for row in 0..dataset.row_count() {
                        body.row(ROW_HEIGHT, |mut cells| {
                            for column in &labels {
                                cells.col(|ui| match column.get(row) {
                                    Some(Some(label)) => {
                                        ui.label(label);
                                    }
                                    _ => {
                                        ui.weak("NA");
                                    }
                                });
                            }
                        });
                    }
                });
        });
    });
}
