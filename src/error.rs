//! Error types reported across the `init` / `upload_scene` / `rasterize` boundary.

use thiserror::Error;

use crate::mesh::Primitive;

/// Errors the core can report to its host.
///
/// Per-work-item conditions encountered *inside* a frame (degenerate
/// triangles, out-of-bounds barycentric coordinates, missing textures) are
/// never reported here — they are silently resolved by the rasterizer and
/// fragment shader rules. Only conditions that abort an entire `init`,
/// `upload_scene`, or `rasterize` call surface as a `RasterError`.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Device memory could not be allocated for the requested buffer sizes.
    #[error("failed to allocate {requested} bytes for {buffer}")]
    AllocationFailure {
        /// Which device buffer the allocation was for.
        buffer: &'static str,
        /// Requested size, in bytes.
        requested: usize,
    },

    /// A primitive group failed validation and was rejected at upload time.
    #[error("invalid scene data in group {group}: {reason}")]
    InvalidScene {
        /// Index of the offending primitive group within the scene.
        group: usize,
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// A primitive kind other than `Triangles` was uploaded.
    ///
    /// Only `Triangles` is assembled end-to-end; strip/fan/line/point groups
    /// are rejected outright rather than silently mis-assembled.
    #[error("primitive kind {kind:?} in group {group} is not supported for assembly")]
    UnsupportedPrimitive {
        /// Index of the offending primitive group within the scene.
        group: usize,
        /// The unsupported primitive kind.
        kind: Primitive,
    },

    /// An index referenced a vertex outside the group's vertex count.
    #[error("index {index} in group {group} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Index of the offending primitive group within the scene.
        group: usize,
        /// The out-of-range index value.
        index: u32,
        /// Number of vertices in the group.
        vertex_count: usize,
    },

    /// The underlying thread pool reported a failure while dispatching a stage.
    ///
    /// The current frame is discarded; subsequent calls to `rasterize` may
    /// still succeed.
    #[error("dispatch failure in {stage} stage: {reason}")]
    DispatchFailure {
        /// Name of the pipeline stage that failed to dispatch.
        stage: &'static str,
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Convenience alias for fallible core operations.
pub type RasterResult<T> = Result<T, RasterError>;
