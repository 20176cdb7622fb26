use anyhow::{Context as _, Result};
use eframe::egui;
use tidyframe::plot::PlotResult;

/// A rendered plot together with its GPU texture.
pub struct PlotView {
    pub result: PlotResult,
    texture: egui::TextureHandle,
}

impl PlotView {
    pub fn new(ctx: &egui::Context, result: PlotResult) -> Result<Self> {
        let rgba = image::load_from_memory(&result.png)
            .context("Failed to decode the rendered plot")?
            .to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture("plot", color, egui::TextureOptions::LINEAR);
        Ok(Self { result, texture })
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.strong(self.result.title.as_str());
        ui.weak(format!(
            "{} · {} · {}x{} px",
            self.result.chart, self.result.style, self.result.width, self.result.height
        ));
        for warning in &self.result.warnings {
            ui.colored_label(ui.visuals().warn_fg_color, warning.as_str());
        }

        ui.add(egui::Image::new(&self.texture).shrink_to_fit());

        ui.add_space(8.0);
        ui.strong("Statistics");
        egui::Grid::new("plot_stats")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for (label, value) in self.result.stats.rows() {
                    ui.label(label);
                    ui.monospace(value);
                    ui.end_row();
                }
            });
    }
}
