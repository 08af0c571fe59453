//! Primitive kinds and the host-side vertex representation.

pub mod vertex;

pub use self::vertex::Vertex;

/// The kind of primitive a [`crate::scene::PrimitiveGroup`]'s index buffer describes.
///
/// Only [`Primitive::Triangles`] is assembled end-to-end; the others are
/// recognized on upload but rejected with
/// [`crate::RasterError::UnsupportedPrimitive`] rather than silently
/// mis-assembled.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    Points,
}

impl Primitive {
    /// Number of primitives produced by assembling `index_count` indices of this kind.
    ///
    /// Uses the conventional `indices - 2` count for STRIP/FAN even though
    /// this crate never assembles them; kept only so group validation can
    /// report a meaningful index count, not to drive assembly.
    pub fn primitive_count(self, index_count: usize) -> usize {
        match self {
            Primitive::Triangles => index_count / 3,
            Primitive::TriangleStrip | Primitive::TriangleFan => index_count.saturating_sub(2),
            Primitive::Lines => index_count / 2,
            Primitive::Points => index_count,
        }
    }
}
