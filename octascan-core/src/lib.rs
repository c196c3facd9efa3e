//! octascan-core: volume reconstruction and ROI fit tracking for OCT scans.
//!
//! This crate provides the domain logic behind octascan: parsing scan
//! dimensions from file names, reshaping flat sample streams into volumes,
//! reducing volumes to averaged images and depth profiles, and tracking
//! click-driven linear-fit measurements over regions of interest.
//!

pub mod axis;
pub mod descriptor;
pub mod error;
pub mod fit;
pub mod tracker;
pub mod volume;

pub use axis::AxisMapping;
pub use descriptor::ScanDescriptor;
pub use error::{Error, Result};
pub use fit::LineFit;
pub use tracker::{ClickOutcome, FitArtifact, Measurement, RoiFitTracker, SummaryRow};
pub use volume::{AScan, AverageImage, Volume};
