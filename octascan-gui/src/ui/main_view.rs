//! Main view (central panel) rendering: image and A-scan plots.

use eframe::egui::{self, Align2, Color32};
use egui_plot::{Line, LineStyle, Plot, PlotImage, PlotPoint, PlotPoints, Text, VLine};

use crate::app::OctascanApp;
use octascan_core::axis::DEFAULT_LATERAL_RANGE_UM;

impl OctascanApp {
    /// Render the central panel with the averaged image on top and the
    /// A-scan profile below it.
    pub(crate) fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.a_scan.is_none() {
                ui.centered_and_justified(|ui| ui.label("No Data"));
                return;
            }
            let half = ui.available_height() / 2.0 - 8.0;
            self.render_image_plot(ui, half);
            ui.add_space(4.0);
            self.render_ascan_plot(ui, half);
        });
    }

    /// Averaged cross-section, drawn in physical units.
    fn render_image_plot(&self, ui: &mut egui::Ui, height: f32) {
        let (Some(texture), Some(mapping)) = (&self.texture, &self.mapping) else {
            return;
        };
        let depth = mapping.max_depth_um();
        let width = DEFAULT_LATERAL_RANGE_UM;
        #[allow(clippy::cast_possible_truncation)]
        let size = egui::Vec2::new(width as f32, depth as f32);
        Plot::new("oct_image")
            .height(height)
            .x_axis_label("Width (µm)")
            .y_axis_label("Optical depth (µm)")
            .show(ui, |plot_ui| {
                plot_ui.image(PlotImage::new(
                    texture,
                    PlotPoint::new(width / 2.0, depth / 2.0),
                    size,
                ));
            });
    }

    /// A-scan profile with ROI click handling and fit overlays.
    fn render_ascan_plot(&mut self, ui: &mut egui::Ui, height: f32) {
        let (Some(a_scan), Some(mapping)) = (&self.a_scan, &self.mapping) else {
            return;
        };
        let points: PlotPoints = a_scan
            .iter()
            .enumerate()
            .map(|(i, &v)| [mapping.physical_of(i), v])
            .collect();
        let pending = self.tracker.pending_point();
        let overlays = self.tracker.overlays().to_vec();
        let roi_armed = self.roi_armed;

        let mut clicked_at: Option<f64> = None;
        Plot::new("a_scan")
            .height(height)
            .x_axis_label("Optical depth (µm)")
            .y_axis_label("Intensity (a.u.)")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points).name("A-scan"));

                if let Some(x) = pending {
                    plot_ui.vline(VLine::new(x).color(Color32::RED).width(1.0));
                }

                for artifact in &overlays {
                    let y_start = artifact.fit.y_at(artifact.start_um);
                    let y_end = artifact.fit.y_at(artifact.end_um);
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![
                            [artifact.start_um, y_start],
                            [artifact.end_um, y_end],
                        ]))
                        .color(Color32::RED)
                        .width(2.0)
                        .style(LineStyle::Dashed { length: 8.0 }),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(artifact.start_um, y_start),
                            format!(
                                "Slope: {:.2}\ny = {:.2}x + {:.2}",
                                artifact.fit.slope, artifact.fit.slope, artifact.fit.intercept
                            ),
                        )
                        .color(Color32::RED)
                        .anchor(Align2::LEFT_TOP),
                    );
                }

                if roi_armed && plot_ui.response().clicked() {
                    if let Some(pos) = plot_ui.pointer_coordinate() {
                        clicked_at = Some(pos.x);
                    }
                }
            });

        if let Some(x) = clicked_at {
            self.register_click(x);
        }
    }
}
