use eframe::egui;
use egui::{Color32, CornerRadius, Margin, Stroke};

/// Seaborn's default blue, shared with the rendered bars.
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(76, 114, 176);

pub const SPACING_MEDIUM: f32 = 12.0;
pub const MARGIN_CARD: f32 = 12.0;

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();

    visuals.widgets.active.bg_fill = ACCENT_COLOR;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.corner_radius = CornerRadius::same(6);
    visuals.widgets.inactive.corner_radius = CornerRadius::same(6);
    visuals.widgets.noninteractive.corner_radius = CornerRadius::same(6);
    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.4);
    visuals.faint_bg_color = Color32::from_rgb(234, 234, 242);

    ctx.set_visuals(visuals);
}

pub fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::same(MARGIN_CARD as i8))
        .stroke(Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
}
