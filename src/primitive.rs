//! Per-vertex and per-primitive scratch records produced by the vertex
//! transform, assembly, and rasterizer stages.

use std::sync::Arc;

use crate::texture::Texture;

/// Non-owning handle to a primitive group's diffuse texture, carried by
/// every [`VertexOut`] and [`Fragment`] that may sample it. An `Arc` rather
/// than a raw pointer, since these records are shared across worker threads
/// and outlive the group only for the duration of one frame.
pub type TextureRef = Arc<Texture>;

/// One vertex after transform, clip-space divide, and window mapping.
///
/// Scratch: one array of these lives per primitive group and is overwritten
/// every frame by the vertex stage, then read (never mutated) by assembly.
#[derive(Debug, Clone)]
pub struct VertexOut {
    /// Window-space position: `(x, y)` in pixel coordinates, `z` window
    /// depth in `[0, 1]`, `w` the pre-divide clip `w` used for
    /// perspective-correct interpolation.
    pub pos: [f32; 4],
    /// Eye-space position, used by the fragment shader's light vector.
    pub eye_pos: [f32; 3],
    /// Unit-length eye-space normal.
    pub eye_normal: [f32; 3],
    /// Debug tint assigned by vertex index mod 3 (R/G/B at magnitude 0.5).
    pub color: [f32; 3],
    pub texcoord: [f32; 2],
    /// Copied from the owning group; `None` if the group has no diffuse texture.
    pub texture: Option<TextureRef>,
}

impl VertexOut {
    /// A vertex at the origin with no normal, texcoord, or texture — the
    /// value scratch arrays are initialized to before the vertex stage runs.
    pub fn zeroed() -> VertexOut {
        VertexOut {
            pos: [0.0; 4],
            eye_pos: [0.0; 3],
            eye_normal: [0.0; 3],
            color: [0.0; 3],
            texcoord: [0.0; 2],
            texture: None,
        }
    }
}

impl Default for VertexOut {
    fn default() -> VertexOut {
        VertexOut::zeroed()
    }
}

/// Three assembled [`VertexOut`] copies, ready for rasterization.
///
/// All primitives from all groups live in one flat device array, indexed by
/// a per-group begin offset computed while uploading the scene.
#[derive(Debug, Clone, Default)]
pub struct Primitive {
    pub v: [VertexOut; 3],
}

impl Primitive {
    pub fn new(v: [VertexOut; 3]) -> Primitive {
        Primitive { v }
    }
}

/// One rasterized sample: the winning primitive's interpolated attributes
/// at a pixel, written by the rasterizer and consumed by the fragment shader.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub eye_pos: [f32; 3],
    pub eye_normal: [f32; 3],
    /// Interpolated debug tint, used when texturing is disabled by configuration.
    pub color: [f32; 3],
    /// Pixel-space texture coordinate `(u, v) = (texcoord.x * texWidth, texcoord.y * texHeight)`.
    pub uv: [f32; 2],
    /// Precomputed byte offset for nearest-filter sampling; `0` if untextured.
    pub uv_start: usize,
    /// `None` if no vertex of the winning primitive carried a diffuse texture.
    pub texture: Option<TextureRef>,
    /// Interpolated window-space depth in `[0, 1]`, the same value the
    /// rasterizer encoded into the depth buffer. Carried through only for
    /// `DebugMode::Depth` visualization.
    pub window_z: f32,
}

impl Fragment {
    /// The value every pixel holds before the rasterizer runs, and that a
    /// pixel never covered by any primitive keeps through to resolve.
    pub fn cleared() -> Fragment {
        Fragment {
            eye_pos: [0.0; 3],
            eye_normal: [0.0; 3],
            color: [0.0; 3],
            uv: [0.0; 2],
            uv_start: 0,
            texture: None,
            window_z: 0.0,
        }
    }
}

impl Default for Fragment {
    fn default() -> Fragment {
        Fragment::cleared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_fragment_has_no_texture() {
        let f = Fragment::cleared();
        assert!(f.texture.is_none());
        assert_eq!(f.color, [0.0, 0.0, 0.0]);
    }
}
