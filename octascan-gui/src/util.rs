//! Numeric conversion utilities for octascan-gui.

/// Convert f64 to u8 with clamping to [0, 255].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn f64_to_u8(value: f64) -> u8 {
    let clamped = value.clamp(0.0, 255.0);
    clamped.round() as u8
}
