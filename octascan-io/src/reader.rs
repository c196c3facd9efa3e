//! Memory-mapped scan file reader.

use crate::{Error, Result};
use memmap2::Mmap;
use octascan_core::{ScanDescriptor, Volume};
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped OCT scan file.
///
/// Uses memmap2 to access the sample stream without copying the whole
/// file up front; samples are materialized once in [`read_volume`].
///
/// [`read_volume`]: ScanFile::read_volume
#[derive(Debug)]
pub struct ScanFile {
    mmap: Mmap,
    descriptor: ScanDescriptor,
    path: PathBuf,
}

impl ScanFile {
    /// Opens a scan file, parsing dimensions from its file name.
    ///
    /// # Errors
    /// Returns an error if the file name lacks the `X<n> Y<n> Z<n>`
    /// pattern, or if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let descriptor = ScanDescriptor::from_file_name(name)?;
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            descriptor,
            path: path.to_path_buf(),
        })
    }

    /// Scan dimensions parsed from the file name.
    #[must_use]
    pub fn descriptor(&self) -> &ScanDescriptor {
        &self.descriptor
    }

    /// The file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Number of f64 samples in the file.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.mmap.len() / 8
    }

    /// Decodes the sample stream and builds the volume.
    ///
    /// Samples are little-endian f64 in column-major order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file size is not a multiple
    /// of 8, and [`Error::Core`] if the sample count does not match the
    /// parsed dimensions.
    ///
    /// # Panics
    /// Never: `chunks_exact(8)` guarantees each chunk is exactly 8 bytes,
    /// so the `try_into` conversion cannot fail.
    pub fn read_volume(&self) -> Result<Volume> {
        if !self.mmap.len().is_multiple_of(8) {
            return Err(Error::InvalidFormat(format!(
                "file size {} is not a multiple of 8 (file: {})",
                self.mmap.len(),
                self.path.display()
            )));
        }
        let samples: Vec<f64> = self
            .mmap
            .chunks_exact(8)
            .map(|chunk| {
                let bytes: [u8; 8] = chunk.try_into().unwrap();
                f64::from_le_bytes(bytes)
            })
            .collect();
        Ok(Volume::from_samples(&self.descriptor, samples)?)
    }
}
