//! Click-driven ROI fit tracking.
//!
//! [`RoiFitTracker`] owns the session state behind the measurement table:
//! the pending-click state machine, the ordered measurement list, and the
//! fit artifacts that make undo a single atomic pop.

use ndarray::{s, Array1};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::axis::AxisMapping;
use crate::error::{Error, Result};
use crate::fit::{self, LineFit};
use crate::volume::AScan;

/// Pending ROI click state.
///
/// A fit needs two clicks; this is the explicit two-phase machine between
/// them. Reaching the second click always resets to `Idle`, whether the
/// fit succeeds or not, so a failed fit never wedges the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum PendingRoi {
    #[default]
    Idle,
    OnePoint(f64),
}

/// A recorded attenuation measurement, in table display order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// 1-based sequence number assigned at append time.
    pub seq: usize,
    /// Fitted slope over the ROI.
    pub slope: f64,
}

/// Everything needed to render and undo one accepted fit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitArtifact {
    /// First depth sample of the ROI.
    pub start_index: usize,
    /// Last depth sample of the ROI (inclusive).
    pub end_index: usize,
    /// Physical depth of the ROI start, µm.
    pub start_um: f64,
    /// Physical depth of the ROI end, µm.
    pub end_um: f64,
    /// Fitted line over the ROI.
    pub fit: LineFit,
}

/// Outcome of a registered click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// First of a pair; the tracker is waiting for the closing click.
    Pending,
    /// Second click closed the ROI and the fit was accepted.
    Fitted(FitArtifact),
}

/// One display row of the measurement table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SummaryRow {
    /// A recorded measurement, in insertion order.
    Measurement { seq: usize, slope: f64 },
    /// Synthetic trailing row over all slopes (population statistics).
    Average { mean: f64, std_dev: f64 },
}

struct Profile {
    a_scan: AScan,
    mapping: AxisMapping,
}

/// Tracks click-driven linear-fit measurements over a depth profile.
#[derive(Default)]
pub struct RoiFitTracker {
    profile: Option<Profile>,
    pending: PendingRoi,
    measurements: Vec<Measurement>,
    artifacts: Vec<FitArtifact>,
}

impl RoiFitTracker {
    /// Creates an empty tracker with no profile attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the depth profile used by subsequent fits.
    ///
    /// Resets any pending click. Existing measurements are kept: they were
    /// taken against the previous profile and become stale once a new scan
    /// is loaded. Call [`clear`](Self::clear) to drop them.
    pub fn attach_profile(&mut self, a_scan: AScan, mapping: AxisMapping) {
        self.pending = PendingRoi::Idle;
        self.profile = Some(Profile { a_scan, mapping });
    }

    /// Whether a profile is attached.
    #[must_use]
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Physical coordinate of the pending first click, if any.
    #[must_use]
    pub fn pending_point(&self) -> Option<f64> {
        match self.pending {
            PendingRoi::Idle => None,
            PendingRoi::OnePoint(x) => Some(x),
        }
    }

    /// Recorded measurements in insertion order.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Accepted fit artifacts, for overlay rendering.
    #[must_use]
    pub fn overlays(&self) -> &[FitArtifact] {
        &self.artifacts
    }

    /// Drops all measurements, artifacts, and any pending click.
    pub fn clear(&mut self) {
        self.pending = PendingRoi::Idle;
        self.measurements.clear();
        self.artifacts.clear();
    }

    /// Registers one pointer click at a physical depth coordinate.
    ///
    /// The first click of a pair is buffered; the second closes the ROI
    /// (endpoints sorted ascending), converts both coordinates to sample
    /// indices, and runs the fit. Errors abort only the pending fit: the
    /// click buffer is already reset, so the user can immediately retry.
    ///
    /// # Errors
    /// [`Error::NoProfile`] without an attached profile, and any error
    /// the closing fit produces.
    pub fn register_click(&mut self, physical_x: f64) -> Result<ClickOutcome> {
        if self.profile.is_none() {
            return Err(Error::NoProfile);
        }
        match self.pending {
            PendingRoi::Idle => {
                self.pending = PendingRoi::OnePoint(physical_x);
                Ok(ClickOutcome::Pending)
            }
            PendingRoi::OnePoint(first) => {
                self.pending = PendingRoi::Idle;
                let (start_um, end_um) = if first <= physical_x {
                    (first, physical_x)
                } else {
                    (physical_x, first)
                };
                let (start_index, end_index) = {
                    let profile = self.profile.as_ref().ok_or(Error::NoProfile)?;
                    (
                        profile.mapping.index_of(start_um),
                        profile.mapping.index_of(end_um),
                    )
                };
                self.fit_span(start_index, end_index, start_um, end_um)
                    .map(ClickOutcome::Fitted)
            }
        }
    }

    /// Fits the profile over an inclusive index span.
    ///
    /// The x-values for the fit are the physical depths of the endpoints.
    ///
    /// # Errors
    /// [`Error::NoProfile`], [`Error::Range`] unless
    /// `start_index <= end_index < len`, and [`Error::DegenerateRoi`] for a
    /// single-sample span.
    pub fn fit(&mut self, start_index: usize, end_index: usize) -> Result<FitArtifact> {
        let (start_um, end_um) = {
            let profile = self.profile.as_ref().ok_or(Error::NoProfile)?;
            (
                profile.mapping.physical_of(start_index),
                profile.mapping.physical_of(end_index),
            )
        };
        self.fit_span(start_index, end_index, start_um, end_um)
    }

    /// Cancels any pending click and removes the most recent fit: its
    /// overlay artifact and its measurement together, one atomic pop.
    /// Silent no-op when nothing is recorded.
    ///
    /// Clearing the pending click means a stale first point can never
    /// leak into the next ROI pair.
    pub fn undo_last(&mut self) {
        self.pending = PendingRoi::Idle;
        if self.artifacts.pop().is_some() {
            self.measurements.pop();
        }
    }

    /// Current table rows: every measurement in insertion order, then a
    /// synthetic Average row when any measurement exists.
    #[must_use]
    pub fn summarize(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .measurements
            .iter()
            .map(|m| SummaryRow::Measurement {
                seq: m.seq,
                slope: m.slope,
            })
            .collect();
        if let Some((mean, std_dev)) = self.slope_statistics() {
            rows.push(SummaryRow::Average { mean, std_dev });
        }
        rows
    }

    /// Population mean and standard deviation over all recorded slopes.
    fn slope_statistics(&self) -> Option<(f64, f64)> {
        if self.measurements.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.measurements.len() as f64;
        let mean = self.measurements.iter().map(|m| m.slope).sum::<f64>() / count;
        let variance = self
            .measurements
            .iter()
            .map(|m| {
                let d = m.slope - mean;
                d * d
            })
            .sum::<f64>()
            / count;
        Some((mean, variance.sqrt()))
    }

    fn fit_span(
        &mut self,
        start_index: usize,
        end_index: usize,
        start_um: f64,
        end_um: f64,
    ) -> Result<FitArtifact> {
        let profile = self.profile.as_ref().ok_or(Error::NoProfile)?;
        let len = profile.a_scan.len();
        if start_index > end_index || end_index >= len {
            return Err(Error::Range {
                start: start_index,
                end: end_index,
                len,
            });
        }
        if start_index == end_index {
            return Err(Error::DegenerateRoi(start_index));
        }

        let count = end_index - start_index + 1;
        let xs = Array1::linspace(start_um, end_um, count);
        let ys = profile.a_scan.slice(s![start_index..=end_index]);
        let fit =
            fit::least_squares(xs.view(), ys).ok_or(Error::DegenerateRoi(start_index))?;

        let artifact = FitArtifact {
            start_index,
            end_index,
            start_um,
            end_um,
            fit,
        };
        self.measurements.push(Measurement {
            seq: self.measurements.len() + 1,
            slope: fit.slope,
        });
        self.artifacts.push(artifact);
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Tracker over a profile where intensity decays linearly with index.
    fn linear_tracker(samples: usize, max_depth: f64, slope_per_um: f64) -> RoiFitTracker {
        let mapping = AxisMapping::new(max_depth, samples);
        let a_scan = Array1::from_iter(
            (0..samples).map(|i| 1000.0 + slope_per_um * mapping.physical_of(i)),
        );
        let mut tracker = RoiFitTracker::new();
        tracker.attach_profile(a_scan, mapping);
        tracker
    }

    #[test]
    fn test_click_without_profile() {
        let mut tracker = RoiFitTracker::new();
        assert!(matches!(
            tracker.register_click(10.0),
            Err(Error::NoProfile)
        ));
        assert!(tracker.pending_point().is_none());
    }

    #[test]
    fn test_single_click_is_pending() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        let outcome = tracker.register_click(120.0).unwrap();
        assert_eq!(outcome, ClickOutcome::Pending);
        assert_relative_eq!(tracker.pending_point().unwrap(), 120.0);
        assert!(tracker.measurements().is_empty());
    }

    #[test]
    fn test_two_clicks_fit_linear_profile() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(100.0).unwrap();
        let outcome = tracker.register_click(600.0).unwrap();

        let ClickOutcome::Fitted(artifact) = outcome else {
            panic!("second click must close the ROI");
        };
        assert!(tracker.pending_point().is_none());
        assert_eq!(tracker.measurements().len(), 1);
        assert_eq!(tracker.measurements()[0].seq, 1);
        // Intensity decays exactly 0.5 per µm, so the fit recovers -0.5.
        assert_relative_eq!(artifact.fit.slope, -0.5, max_relative = 1e-6);
        assert_eq!(artifact.start_index, 10);
        assert_eq!(artifact.end_index, 60);
    }

    #[test]
    fn test_clicks_sorted_ascending() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(600.0).unwrap();
        let ClickOutcome::Fitted(artifact) = tracker.register_click(100.0).unwrap() else {
            panic!("second click must close the ROI");
        };
        assert_relative_eq!(artifact.start_um, 100.0);
        assert_relative_eq!(artifact.end_um, 600.0);
        assert!(artifact.start_index <= artifact.end_index);
    }

    #[test]
    fn test_slope_matches_independent_fit() {
        // Quadratic profile: the fitted slope is not obvious, so compare
        // against an independent least-squares computation.
        let samples = 64;
        let mapping = AxisMapping::new(640.0, samples);
        let a_scan =
            Array1::from_iter((0..samples).map(|i| {
                let x = mapping.physical_of(i);
                0.002 * x * x - 1.3 * x + 900.0
            }));
        let mut tracker = RoiFitTracker::new();
        tracker.attach_profile(a_scan.clone(), mapping);

        tracker.register_click(50.0).unwrap();
        let ClickOutcome::Fitted(artifact) = tracker.register_click(450.0).unwrap() else {
            panic!("second click must close the ROI");
        };

        let count = artifact.end_index - artifact.start_index + 1;
        let xs = Array1::linspace(50.0, 450.0, count);
        let ys = a_scan.slice(s![artifact.start_index..=artifact.end_index]);
        let expected = fit::least_squares(xs.view(), ys).unwrap();
        assert_relative_eq!(artifact.fit.slope, expected.slope, max_relative = 1e-6);
        assert_relative_eq!(
            artifact.fit.intercept,
            expected.intercept,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_degenerate_single_sample_roi() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(300.0).unwrap();
        // Both clicks land on index 30.
        let err = tracker.register_click(301.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateRoi(30)));
        // The pending buffer is cleared so the user can retry at once.
        assert!(tracker.pending_point().is_none());
        assert!(tracker.measurements().is_empty());
        assert!(tracker.register_click(100.0).is_ok());
    }

    #[test]
    fn test_fit_by_index_range_check() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        assert!(matches!(
            tracker.fit(10, 100),
            Err(Error::Range {
                start: 10,
                end: 100,
                len: 100
            })
        ));
        assert!(matches!(tracker.fit(60, 10), Err(Error::Range { .. })));
        assert!(tracker.fit(10, 60).is_ok());
    }

    #[test]
    fn test_undo_restores_empty_state() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        for span in [(100.0, 300.0), (400.0, 600.0), (650.0, 900.0)] {
            tracker.register_click(span.0).unwrap();
            tracker.register_click(span.1).unwrap();
        }
        assert_eq!(tracker.measurements().len(), 3);
        assert_eq!(tracker.overlays().len(), 3);

        for _ in 0..3 {
            tracker.undo_last();
        }
        assert!(tracker.measurements().is_empty());
        assert!(tracker.overlays().is_empty());

        // One extra undo is a silent no-op.
        tracker.undo_last();
        assert!(tracker.measurements().is_empty());
    }

    #[test]
    fn test_undo_cancels_pending_click() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(100.0).unwrap();
        tracker.register_click(300.0).unwrap();
        tracker.register_click(500.0).unwrap();
        assert!(tracker.pending_point().is_some());

        tracker.undo_last();
        assert!(tracker.pending_point().is_none());
        assert!(tracker.measurements().is_empty());

        // The next click starts a fresh pair instead of closing the
        // cancelled one with the stale 500 µm point.
        let outcome = tracker.register_click(600.0).unwrap();
        assert_eq!(outcome, ClickOutcome::Pending);
        assert!(tracker.measurements().is_empty());
    }

    #[test]
    fn test_undo_with_only_pending_click() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(200.0).unwrap();
        tracker.undo_last();
        assert!(tracker.pending_point().is_none());
        assert!(tracker.measurements().is_empty());
    }

    #[test]
    fn test_sequence_numbers_after_undo() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(100.0).unwrap();
        tracker.register_click(300.0).unwrap();
        tracker.register_click(400.0).unwrap();
        tracker.register_click(600.0).unwrap();
        tracker.undo_last();
        tracker.register_click(650.0).unwrap();
        tracker.register_click(900.0).unwrap();
        let seqs: Vec<usize> = tracker.measurements().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[test]
    fn test_summarize_empty() {
        let tracker = RoiFitTracker::new();
        assert!(tracker.summarize().is_empty());
    }

    #[test]
    fn test_summarize_population_statistics() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        // Fitting the same exact linear profile twice gives two equal
        // slopes; then check against hand-computed population stats.
        tracker.register_click(100.0).unwrap();
        tracker.register_click(400.0).unwrap();
        tracker.register_click(500.0).unwrap();
        tracker.register_click(900.0).unwrap();

        let rows = tracker.summarize();
        assert_eq!(rows.len(), 3);
        let SummaryRow::Average { mean, std_dev } = rows[2] else {
            panic!("last row must be the Average row");
        };

        let slopes: Vec<f64> = tracker.measurements().iter().map(|m| m.slope).collect();
        let expected_mean = slopes.iter().sum::<f64>() / slopes.len() as f64;
        let expected_var = slopes
            .iter()
            .map(|s| (s - expected_mean) * (s - expected_mean))
            .sum::<f64>()
            / slopes.len() as f64;
        assert_relative_eq!(mean, expected_mean, max_relative = 1e-12);
        assert_relative_eq!(std_dev, expected_var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_attach_profile_resets_pending_keeps_measurements() {
        let mut tracker = linear_tracker(100, 1000.0, -0.5);
        tracker.register_click(100.0).unwrap();
        tracker.register_click(400.0).unwrap();
        tracker.register_click(500.0).unwrap();
        assert!(tracker.pending_point().is_some());

        let mapping = AxisMapping::new(1000.0, 100);
        tracker.attach_profile(Array1::zeros(100), mapping);
        assert!(tracker.pending_point().is_none());
        // Stale measurements survive a reload; clearing is the host's call.
        assert_eq!(tracker.measurements().len(), 1);
        tracker.clear();
        assert!(tracker.measurements().is_empty());
    }
}
