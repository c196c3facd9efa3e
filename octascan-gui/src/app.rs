//! Main application state and logic.
//!
//! Contains the `OctascanApp` struct which owns the loaded scan data,
//! the fit tracker, and the status line shown to the user.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::viewer::grayscale_image;
use octascan_core::{AScan, AxisMapping, ClickOutcome, RoiFitTracker, ScanDescriptor};
use octascan_io::ScanFile;

/// Main application state.
pub struct OctascanApp {
    /// Currently loaded file path.
    pub(crate) selected_file: Option<PathBuf>,
    /// Dimensions of the loaded scan.
    pub(crate) descriptor: Option<ScanDescriptor>,
    /// Summed depth profile of the loaded scan.
    pub(crate) a_scan: Option<AScan>,
    /// Depth axis calibration for the loaded scan.
    pub(crate) mapping: Option<AxisMapping>,

    /// ROI fit measurement state.
    pub(crate) tracker: RoiFitTracker,
    /// Whether A-scan clicks currently register as ROI points.
    pub(crate) roi_armed: bool,

    /// User-facing status message.
    pub(crate) status: String,
    /// Cached texture of the averaged cross-section image.
    pub(crate) texture: Option<egui::TextureHandle>,
}

impl Default for OctascanApp {
    fn default() -> Self {
        Self {
            selected_file: None,
            descriptor: None,
            a_scan: None,
            mapping: None,
            tracker: RoiFitTracker::new(),
            roi_armed: false,
            status: "Ready".to_string(),
            texture: None,
        }
    }
}

impl OctascanApp {
    /// Load a scan file synchronously.
    ///
    /// A failed load leaves the previously loaded scan untouched; the
    /// error is surfaced on the status line.
    pub fn load_file(&mut self, ctx: &egui::Context, path: PathBuf) {
        match self.try_load(ctx, &path) {
            Ok(()) => {
                log::info!("loaded {}", path.display());
                self.status = format!(
                    "Loaded {}",
                    path.file_name().map_or_else(
                        || path.display().to_string(),
                        |n| n.to_string_lossy().into_owned()
                    )
                );
            }
            Err(e) => {
                log::error!("load failed for {}: {e:#}", path.display());
                self.status = format!("Error: {e}");
            }
        }
    }

    fn try_load(&mut self, ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
        let scan = ScanFile::open(path)?;
        let descriptor = *scan.descriptor();
        let volume = scan.read_volume()?;
        let (average, a_scan) = volume.reduce();
        let mapping = AxisMapping::default_depth(descriptor.z);

        // Nothing below can fail; prior state is replaced atomically.
        // Prior measurements stay in the table (stale against the new
        // profile) until the user removes them.
        self.tracker.attach_profile(a_scan.clone(), mapping);
        let image = grayscale_image(&average);
        self.texture = Some(ctx.load_texture("average", image, egui::TextureOptions::NEAREST));
        self.a_scan = Some(a_scan);
        self.mapping = Some(mapping);
        self.descriptor = Some(descriptor);
        self.selected_file = Some(path.to_path_buf());
        self.roi_armed = false;
        Ok(())
    }

    /// Register a pointer click on the A-scan plot at a physical depth.
    pub fn register_click(&mut self, depth_um: f64) {
        match self.tracker.register_click(depth_um) {
            Ok(ClickOutcome::Pending) => {
                self.status = format!("ROI start {depth_um:.0} µm; click the end point");
            }
            Ok(ClickOutcome::Fitted(artifact)) => {
                log::info!(
                    "fit over [{:.0}, {:.0}] µm: slope {:.4}",
                    artifact.start_um,
                    artifact.end_um,
                    artifact.fit.slope
                );
                self.status = format!("Slope: {:.2}", artifact.fit.slope);
            }
            Err(e) => {
                log::warn!("fit rejected: {e}");
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Remove the most recent measurement and disarm ROI selection.
    ///
    /// Also cancels a half-finished ROI, so the button doubles as a
    /// clean cancel for a stray first click.
    pub fn remove_last(&mut self) {
        let had_fit = !self.tracker.overlays().is_empty();
        let had_pending = self.tracker.pending_point().is_some();
        self.tracker.undo_last();
        self.roi_armed = false;
        self.status = if had_fit {
            "Removed last ROI".to_string()
        } else if had_pending {
            "Cancelled pending ROI point".to_string()
        } else {
            "Nothing to remove".to_string()
        };
    }
}

impl eframe::App for OctascanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_side_panel(ctx);
        self.render_central_panel(ctx);
    }
}
