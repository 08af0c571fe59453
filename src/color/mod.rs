//! Linear color math shared by the fragment shader and resolve stage.

use crate::utils::clamp;

/// An unclamped, linear RGB color, as stored in the (possibly supersampled)
/// framebuffer. Blending, alpha, and stencil are out of scope for this core
/// so this is just three floats.
pub type Rgb = [f32; 3];

/// Clamps each channel to `[0, 1]`.
#[inline]
pub fn clamp01(c: Rgb) -> Rgb {
    [clamp(c[0], 0.0, 1.0), clamp(c[1], 0.0, 1.0), clamp(c[2], 0.0, 1.0)]
}

/// Clamps and quantizes a linear color to an 8-bit-per-channel value.
#[inline]
pub fn to_u8(c: Rgb) -> [u8; 3] {
    let c = clamp01(c);
    [
        (c[0] * 255.0).round() as u8,
        (c[1] * 255.0).round() as u8,
        (c[2] * 255.0).round() as u8,
    ]
}

/// Componentwise scale, used to apply Lambert lighting to a base color.
#[inline]
pub fn scale(c: Rgb, s: f32) -> Rgb {
    [c[0] * s, c[1] * s, c[2] * s]
}

/// Componentwise add, used to accumulate subpixel samples during SSAA resolve.
#[inline]
pub fn add(a: Rgb, b: Rgb) -> Rgb {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
