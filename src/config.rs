//! Runtime configuration for the rasterizer core.
//!
//! These switches are reified as an ordinary `Config` value passed to
//! [`Pipeline::new`](crate::pipeline::Pipeline::new), following the
//! `Default`-able options-struct convention the rest of this crate's
//! ecosystem uses for per-run behavior, rather than Cargo feature flags.

/// Texture filtering mode used when sampling a primitive group's diffuse texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    /// Read the single texel nearest to the sampled UV coordinate.
    Nearest,
    /// Bilinearly blend the four texels surrounding the sampled UV coordinate.
    Bilinear,
}

impl Default for TextureFilter {
    fn default() -> TextureFilter {
        TextureFilter::Nearest
    }
}

/// Overrides the lit shading output with a visualization, for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugMode {
    /// Normal Lambert + texture shading.
    None,
    /// Writes `|1 - z|` as a grayscale value.
    Depth,
    /// Writes the interpolated eye-space normal as a color.
    Normal,
}

impl Default for DebugMode {
    fn default() -> DebugMode {
        DebugMode::None
    }
}

/// Runtime switches controlling per-frame rendering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Integer supersampling factor. `1` disables SSAA. Only `1`, `2`, and `4`
    /// are meaningful; other values are accepted but produce a non-square
    /// subpixel grid during resolve.
    pub ssaa_factor: u32,
    /// Enables diffuse texture sampling. When `false`, untextured debug tint
    /// (or black, depending on host convention) is used instead.
    pub texture: bool,
    /// Filtering mode used when `texture` is enabled.
    pub texture_filter: TextureFilter,
    /// Enables perspective-correct attribute interpolation. When `false`,
    /// attributes are interpolated with plain affine barycentric weights.
    pub correct_interpolation: bool,
    /// Overrides the lit output with a debug visualization.
    pub debug_mode: DebugMode,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            ssaa_factor: 1,
            texture: true,
            texture_filter: TextureFilter::default(),
            correct_interpolation: true,
            debug_mode: DebugMode::default(),
        }
    }
}

impl Config {
    /// Returns `true` if any value besides `1` was set for [`Config::ssaa_factor`].
    #[inline]
    pub fn ssaa_enabled(&self) -> bool {
        self.ssaa_factor > 1
    }
}
