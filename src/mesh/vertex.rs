//! Host-side per-vertex input.

/// One input vertex, before upload.
///
/// A [`crate::scene::PrimitiveGroup`] stores its vertices as parallel arrays,
/// since normals and texcoords are present or absent for the whole group,
/// not per vertex. `Vertex` is the array-of-structs convenience view a host
/// uses to build that group; see [`crate::scene::PrimitiveGroup::from_vertices`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal, if the group carries normals.
    pub normal: Option<[f32; 3]>,
    /// Texture coordinate, if the group carries texcoords.
    pub texcoord: Option<[f32; 2]>,
}

impl Vertex {
    /// Creates a vertex with only a position; no normal, no texcoord.
    pub fn new(position: [f32; 3]) -> Vertex {
        Vertex { position, normal: None, texcoord: None }
    }

    /// Returns a copy with the given normal attached.
    pub fn with_normal(mut self, normal: [f32; 3]) -> Vertex {
        self.normal = Some(normal);
        self
    }

    /// Returns a copy with the given texcoord attached.
    pub fn with_texcoord(mut self, texcoord: [f32; 2]) -> Vertex {
        self.texcoord = Some(texcoord);
        self
    }
}
