//! Sample volumes and their reductions.

use ndarray::{Array1, Array2, Array3, Axis, ShapeBuilder};

use crate::descriptor::ScanDescriptor;
use crate::error::{Error, Result};

/// 2-D averaged cross-section, shape `(z, x)`.
pub type AverageImage = Array2<f64>;

/// 1-D depth-intensity profile of length `z`.
pub type AScan = Array1<f64>;

/// A 3-D scan volume with shape `(z, x, frames)`.
///
/// Constructed from the flat sample stream the acquisition instrument
/// writes, in column-major (first-axis-fastest) order: element
/// `(z, x, f)` lives at flat offset `z + Z*x + Z*X*f`. That offset
/// correspondence must match the instrument byte layout exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f64>,
}

impl Volume {
    /// Builds a volume from a flat column-major sample stream.
    ///
    /// # Errors
    /// Returns [`Error::Shape`] if the sample count does not equal
    /// `x * frames * z`.
    pub fn from_samples(descriptor: &ScanDescriptor, samples: Vec<f64>) -> Result<Self> {
        let expected = descriptor.sample_count();
        let actual = samples.len();
        if actual != expected {
            return Err(Error::Shape { expected, actual });
        }
        let shape = (descriptor.z, descriptor.x, descriptor.frames).f();
        let data = Array3::from_shape_vec(shape, samples)
            .map_err(|_| Error::Shape { expected, actual })?;
        Ok(Self { data })
    }

    /// Volume dimensions as `(z, x, frames)`.
    #[must_use]
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// The underlying sample array.
    #[must_use]
    pub fn samples(&self) -> &Array3<f64> {
        &self.data
    }

    /// Reduces the volume to an averaged image and a summed depth profile.
    ///
    /// Averages over the frames axis, then sums the result over the
    /// lateral axis. Pure and deterministic.
    #[must_use]
    pub fn reduce(&self) -> (AverageImage, AScan) {
        #[allow(clippy::cast_precision_loss)]
        let frame_count = self.data.len_of(Axis(2)) as f64;
        let average = self.data.sum_axis(Axis(2)) / frame_count;
        let a_scan = average.sum_axis(Axis(1));
        (average, a_scan)
    }
}
