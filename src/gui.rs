//! Desktop form: load a CSV, toggle cleaning steps, chart one column, save
//! the results. The form's settings survive restarts through eframe
//! persistence; loaded data and rendered plots do not.

mod plot_view;
mod preview;
mod theme;

use anyhow::{Context as _, Result};
use eframe::egui;
use plot_view::PlotView;
use std::path::{Path, PathBuf};
use tidyframe::config::AppConfig;
use tidyframe::data::{self, CleaningOptions, CleaningReport, Dataset};
use tidyframe::plot::{self, PlotRequest, PlotStyle};

const PREVIEW_ROWS: usize = 5;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path).context("Failed to load configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("tidyframe")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    log::info!("Starting desktop form");
    eframe::run_native(
        "tidyframe",
        options,
        Box::new(|cc| Ok(Box::new(TidyApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Desktop form failed: {e}"))
}

#[derive(Default)]
enum Status {
    #[default]
    Idle,
    Info(String),
    Error(String),
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct TidyApp {
    pub input_path: String,
    pub options: CleaningOptions,
    pub plot_column: String,
    pub style: PlotStyle,
    pub figsize: (f32, f32),
    pub bins: usize,
    pub title: String,
    pub csv_output_path: String,
    pub png_output_path: String,

    #[serde(skip)]
    config: AppConfig,
    #[serde(skip)]
    original: Option<Dataset>,
    #[serde(skip)]
    cleaned: Option<(Dataset, CleaningReport)>,
    #[serde(skip)]
    plot: Option<PlotView>,
    #[serde(skip)]
    status: Status,
}

impl Default for TidyApp {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

impl TidyApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        theme::apply_theme(&cc.egui_ctx);
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_else(|| Self::with_config(config.clone()));
        app.config = config;
        app
    }

    fn with_config(config: AppConfig) -> Self {
        Self {
            input_path: String::new(),
            options: CleaningOptions::default(),
            plot_column: String::new(),
            style: config.plot.style,
            figsize: config.plot.figsize,
            bins: config.plot.bins,
            title: String::new(),
            csv_output_path: "cleaned.csv".to_owned(),
            png_output_path: String::new(),
            config,
            original: None,
            cleaned: None,
            plot: None,
            status: Status::Idle,
        }
    }

    fn set_info(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::info!("{msg}");
        self.status = Status::Info(msg);
    }

    fn set_error(&mut self, err: &anyhow::Error) {
        log::error!("{err:#}");
        self.status = Status::Error(format!("{err:#}"));
    }

    /// The data the plot and the save buttons work on.
    fn current(&self) -> Option<&Dataset> {
        self.cleaned
            .as_ref()
            .map(|(dataset, _)| dataset)
            .or(self.original.as_ref())
    }

    fn load(&mut self) {
        let path = PathBuf::from(self.input_path.trim());
        match data::load_csv(&path, &self.config.csv)
            .with_context(|| format!("Failed to load {}", path.display()))
        {
            Ok(dataset) => {
                let names = dataset.column_names();
                if !names.contains(&self.plot_column.as_str()) {
                    self.plot_column = names.first().map(|n| (*n).to_owned()).unwrap_or_default();
                }
                let summary = format!(
                    "Loaded {} rows x {} columns from {}",
                    dataset.row_count(),
                    dataset.column_count(),
                    path.display()
                );
                self.original = Some(dataset);
                self.plot = None;
                self.reclean();
                self.set_info(summary);
            }
            Err(e) => self.set_error(&e),
        }
    }

    /// Recomputes the cleaned copy from the original after a toggle change.
    fn reclean(&mut self) {
        let Some(original) = &self.original else {
            return;
        };
        if self.options.is_noop() {
            self.cleaned = None;
            return;
        }
        match data::clean(original, &self.options).context("Cleaning failed") {
            Ok((dataset, report)) => {
                for line in report.lines() {
                    log::info!("{line}");
                }
                self.cleaned = Some((dataset, report));
            }
            Err(e) => {
                self.cleaned = None;
                self.set_error(&e);
            }
        }
    }

    fn request(&self) -> PlotRequest {
        let title = self.title.trim();
        PlotRequest {
            column: self.plot_column.clone(),
            style: self.style.as_str().to_owned(),
            figsize: self.figsize,
            bins: Some(self.bins),
            title: (!title.is_empty()).then(|| title.to_owned()),
        }
    }

    fn generate_plot(&mut self, ctx: &egui::Context) {
        let Some(dataset) = self.current() else {
            self.set_info("Load a CSV file first");
            return;
        };
        let request = self.request();
        let result = plot::visualize_with(dataset, &request, &self.config.plot)
            .with_context(|| format!("Failed to plot column '{}'", request.column))
            .and_then(|result| PlotView::new(ctx, result));
        match result {
            Ok(view) => {
                for warning in &view.result.warnings {
                    log::warn!("{warning}");
                }
                let summary = format!("Rendered {} of '{}'", view.result.chart, request.column);
                self.plot = Some(view);
                self.set_info(summary);
            }
            Err(e) => self.set_error(&e),
        }
    }

    fn save_csv(&mut self) {
        let Some(dataset) = self.current() else {
            self.set_info("Nothing to save yet");
            return;
        };
        let path = PathBuf::from(self.csv_output_path.trim());
        match data::save_csv(dataset, &path)
            .with_context(|| format!("Failed to write {}", path.display()))
        {
            Ok(()) => self.set_info(format!("Cleaned data saved to {}", path.display())),
            Err(e) => self.set_error(&e),
        }
    }

    fn save_png(&mut self) {
        let Some(view) = &self.plot else {
            self.set_info("Generate a plot first");
            return;
        };
        let path = if self.png_output_path.trim().is_empty() {
            crate::cli::default_plot_path(&self.plot_column)
        } else {
            PathBuf::from(self.png_output_path.trim())
        };
        match std::fs::write(&path, &view.result.png)
            .with_context(|| format!("Failed to write {}", path.display()))
        {
            Ok(()) => self.set_info(format!("Plot saved to {}", path.display())),
            Err(e) => self.set_error(&e),
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Data");
        ui.label("CSV file");
        let path_edit = ui.text_edit_singleline(&mut self.input_path);
        let enter = path_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || enter {
            self.load();
        }

        ui.separator();
        ui.heading("Cleaning");
        let mut changed = false;
        changed |= ui
            .checkbox(&mut self.options.fill_missing, "Handle missing values")
            .changed();
        changed |= ui
            .checkbox(&mut self.options.drop_duplicates, "Remove duplicates")
            .changed();
        changed |= ui
            .checkbox(&mut self.options.coerce_types, "Convert data types")
            .changed();
        if changed {
            self.reclean();
            self.plot = None;
        }

        ui.separator();
        ui.heading("Plot");
        let names: Vec<String> = self
            .current()
            .map(|d| d.column_names().into_iter().map(str::to_owned).collect())
            .unwrap_or_default();
        egui::ComboBox::from_label("Column")
            .selected_text(self.plot_column.as_str())
            .show_ui(ui, |ui| {
                for name in &names {
                    ui.selectable_value(&mut self.plot_column, name.clone(), name.as_str());
                }
            });
        egui::ComboBox::from_label("Style")
            .selected_text(self.style.as_str())
            .show_ui(ui, |ui| {
                for style in PlotStyle::ALL {
                    ui.selectable_value(&mut self.style, style, style.as_str());
                }
            });
        ui.add(egui::Slider::new(&mut self.figsize.0, 4.0..=20.0).text("Width (in)"));
        ui.add(egui::Slider::new(&mut self.figsize.1, 3.0..=15.0).text("Height (in)"));
        ui.add(egui::Slider::new(&mut self.bins, 1..=100).text("Bins"));
        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut self.title).hint_text("<column> distribution"));

        let can_plot = self.current().is_some() && !self.plot_column.is_empty();
        if ui
            .add_enabled(can_plot, egui::Button::new("Generate plot"))
            .clicked()
        {
            self.generate_plot(ui.ctx());
        }

        ui.separator();
        ui.heading("Save");
        ui.label("Cleaned CSV");
        ui.text_edit_singleline(&mut self.csv_output_path);
        if ui
            .add_enabled(self.current().is_some(), egui::Button::new("Save CSV"))
            .clicked()
        {
            self.save_csv();
        }
        ui.label("Plot PNG");
        ui.add(
            egui::TextEdit::singleline(&mut self.png_output_path)
                .hint_text("<column>_distribution.png"),
        );
        if ui
            .add_enabled(self.plot.is_some(), egui::Button::new("Save PNG"))
            .clicked()
        {
            self.save_png();
        }
    }

    fn render_results(&self, ui: &mut egui::Ui) {
        let Some(original) = &self.original else {
            ui.centered_and_justified(|ui| {
                ui.label("Enter the path of a CSV file and press Load.");
            });
            return;
        };

        theme::card_frame(ui).show(ui, |ui| {
            ui.strong(format!(
                "Original data ({} rows x {} columns)",
                original.row_count(),
                original.column_count()
            ));
            preview::head_and_tail(ui, "original", original, PREVIEW_ROWS);
        });

        if let Some((cleaned, report)) = &self.cleaned {
            ui.add_space(theme::SPACING_MEDIUM);
            theme::card_frame(ui).show(ui, |ui| {
                ui.strong(format!(
                    "Cleaned data ({} rows x {} columns)",
                    cleaned.row_count(),
                    cleaned.column_count()
                ));
                if report.is_empty() {
                    ui.weak("No changes made.");
                } else {
                    for line in report.lines() {
                        ui.label(format!("• {line}"));
                    }
                }
                preview::head_and_tail(ui, "cleaned", cleaned, PREVIEW_ROWS);
            });
        }

        if let Some(view) = &self.plot {
            ui.add_space(theme::SPACING_MEDIUM);
            theme::card_frame(ui).show(ui, |ui| view.show(ui));
        }
    }
}

impl eframe::App for TidyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| match &self.status {
            Status::Idle => {
                ui.weak("Ready");
            }
            Status::Info(msg) => {
                ui.label(msg.as_str());
            }
            Status::Error(msg) => {
                ui.colored_label(ui.visuals().error_fg_color, msg.as_str());
            }
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.render_controls(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.render_results(ui));
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
