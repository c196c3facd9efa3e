//! Mapping between depth sample indices and physical depth units.

/// Full physical depth range of the default instrument calibration, in µm.
pub const DEFAULT_DEPTH_RANGE_UM: f64 = 1474.0;

/// Full physical lateral range of the default instrument calibration, in µm.
/// Display-only; no measurement uses the lateral axis.
pub const DEFAULT_LATERAL_RANGE_UM: f64 = 3000.0;

/// Affine mapping from depth index `i ∈ [0, samples)` to physical depth.
///
/// Conversion of a physical coordinate back to a sample index rounds to
/// the nearest integer and clamps into the valid range. Both front-ends
/// use this one policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    max_depth_um: f64,
    samples: usize,
}

impl AxisMapping {
    /// Creates a mapping over `samples` depth indices spanning
    /// `max_depth_um` physical units.
    #[must_use]
    pub fn new(max_depth_um: f64, samples: usize) -> Self {
        Self {
            max_depth_um,
            samples,
        }
    }

    /// Mapping with the default instrument depth calibration.
    #[must_use]
    pub fn default_depth(samples: usize) -> Self {
        Self::new(DEFAULT_DEPTH_RANGE_UM, samples)
    }

    /// Full physical depth range in µm.
    #[must_use]
    pub fn max_depth_um(&self) -> f64 {
        self.max_depth_um
    }

    /// Number of depth samples.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Converts a physical depth to the nearest sample index, clamped
    /// into `[0, samples)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index_of(&self, physical: f64) -> usize {
        if self.samples == 0 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss)]
        let scaled = physical * self.samples as f64 / self.max_depth_um;
        if !scaled.is_finite() {
            return 0;
        }
        #[allow(clippy::cast_precision_loss)]
        let max_index = (self.samples - 1) as f64;
        scaled.round().clamp(0.0, max_index) as usize
    }

    /// Physical depth of a sample index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn physical_of(&self, index: usize) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        index as f64 * self.max_depth_um / self.samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints() {
        let m = AxisMapping::new(1474.0, 1024);
        assert_eq!(m.index_of(0.0), 0);
        // The full-depth coordinate clamps onto the last valid index.
        assert_eq!(m.index_of(1474.0), 1023);
    }

    #[test]
    fn test_nearest_rounding() {
        let m = AxisMapping::new(100.0, 10);
        // 4.9 physical units scale to index 0.49 -> 0; 5.1 to 0.51 -> 1.
        assert_eq!(m.index_of(4.9), 0);
        assert_eq!(m.index_of(5.1), 1);
    }

    #[test]
    fn test_clamps_out_of_range_clicks() {
        let m = AxisMapping::new(100.0, 10);
        assert_eq!(m.index_of(-50.0), 0);
        assert_eq!(m.index_of(1e9), 9);
        assert_eq!(m.index_of(f64::NAN), 0);
    }

    #[test]
    fn test_physical_of_round_trip() {
        let m = AxisMapping::new(1474.0, 1024);
        for index in [0, 1, 511, 1023] {
            let physical = m.physical_of(index);
            assert_eq!(m.index_of(physical), index);
        }
        assert_relative_eq!(m.physical_of(1024), 1474.0);
    }
}
