//! Control panel (left sidebar) rendering.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;

use crate::app::OctascanApp;
use octascan_core::SummaryRow;

impl OctascanApp {
    /// Render the left sidebar: file controls, ROI controls, status line,
    /// and the measurement table.
    pub(crate) fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Octascan");
                ui.separator();

                if ui.button("Open…").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("OCT scan", &["dat"])
                        .pick_file()
                    {
                        self.load_file(ctx, path);
                    }
                }

                let loaded = self.a_scan.is_some();
                if ui
                    .add_enabled(loaded, egui::Button::new("Choose ROI"))
                    .clicked()
                {
                    self.roi_armed = true;
                    self.status = "Click two points on the A-scan plot".to_string();
                }
                if ui
                    .add_enabled(loaded, egui::Button::new("Remove ROI"))
                    .clicked()
                {
                    self.remove_last();
                }

                ui.add_space(6.0);
                ui.label(&self.status);

                if let Some(path) = &self.selected_file {
                    ui.add_space(6.0);
                    if let Some(name) = path.file_name() {
                        ui.label(name.to_string_lossy().into_owned());
                    }
                }
                if let Some(d) = &self.descriptor {
                    ui.label(format!("X {} · {} frames · Z {}", d.x, d.frames, d.z));
                }

                ui.separator();
                self.render_measurement_table(ui);
            });
    }

    fn render_measurement_table(&self, ui: &mut egui::Ui) {
        let rows = self.tracker.summarize();
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(100.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Measurement");
                });
                header.col(|ui| {
                    ui.strong("Attenuation coef");
                });
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| match row {
                        SummaryRow::Measurement { seq, slope } => {
                            table_row.col(|ui| {
                                ui.label(seq.to_string());
                            });
                            table_row.col(|ui| {
                                ui.label(format!("{slope:.2}"));
                            });
                        }
                        SummaryRow::Average { mean, std_dev } => {
                            table_row.col(|ui| {
                                ui.strong("Average");
                            });
                            table_row.col(|ui| {
                                ui.label(format!("{mean:.2} ± {std_dev:.2}"));
                            });
                        }
                    });
                }
            });
    }
}
