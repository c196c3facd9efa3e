//! Visualization helpers for the averaged cross-section image.

mod texture;

pub use texture::grayscale_image;
