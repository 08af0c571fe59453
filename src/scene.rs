//! Host-side scene description, built by the caller and consumed by
//! [`crate::pipeline::Pipeline::upload_scene`].
//!
//! This is the array-of-groups shape `uploadScene(scene)`
//! expects: host-owned indices, positions, normals, texcoords, texture bytes
//! and a pre-computed model matrix, one [`PrimitiveGroup`] per drawable mesh.
//! Model loading and scene-graph traversal stay with the host; this module
//! only describes the flat data the core needs.

use nalgebra::Matrix4;

use crate::mesh::{Primitive as PrimitiveKind, Vertex};

/// One drawable group of indexed primitives sharing a model matrix and,
/// optionally, a diffuse texture.
#[derive(Debug, Clone)]
pub struct PrimitiveGroup {
    pub kind: PrimitiveKind,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
    /// 16-bit indices, per the core's input asset expectations.
    pub indices: Vec<u16>,
    /// Tightly-packed 8-bit RGB texture bytes, `width * height * 3` long, plus dimensions.
    pub texture: Option<(Vec<u8>, u32, u32)>,
    /// Object-to-clip-contributing model matrix; combined with the host's
    /// view/projection matrices before `rasterize` is called.
    pub model: Matrix4<f32>,
}

impl PrimitiveGroup {
    /// Builds a group from an array-of-structs vertex list, splitting it into
    /// the parallel arrays device buffers actually store.
    ///
    /// Whether the group carries normals and texcoords is decided once, from
    /// the first vertex; any vertex missing an attribute the group carries
    /// falls back to a default (`(0,0,1)` normal, `(0,0)` texcoord) rather
    /// than panicking, since per-vertex presence isn't representable in the
    /// device layout.
    pub fn from_vertices(kind: PrimitiveKind, vertices: &[Vertex], indices: Vec<u16>) -> PrimitiveGroup {
        let has_normal = vertices.first().map_or(false, |v| v.normal.is_some());
        let has_texcoord = vertices.first().map_or(false, |v| v.texcoord.is_some());

        let positions = vertices.iter().map(|v| v.position).collect();

        let normals = if has_normal {
            Some(vertices.iter().map(|v| v.normal.unwrap_or([0.0, 0.0, 1.0])).collect())
        } else {
            None
        };

        let texcoords = if has_texcoord {
            Some(vertices.iter().map(|v| v.texcoord.unwrap_or([0.0, 0.0])).collect())
        } else {
            None
        };

        PrimitiveGroup {
            kind,
            positions,
            normals,
            texcoords,
            indices,
            texture: None,
            model: Matrix4::identity(),
        }
    }

    /// Attaches a tightly-packed 8-bit RGB diffuse texture.
    pub fn with_texture(mut self, data: Vec<u8>, width: u32, height: u32) -> PrimitiveGroup {
        self.texture = Some((data, width, height));
        self
    }

    /// Overrides the identity model matrix.
    pub fn with_model(mut self, model: Matrix4<f32>) -> PrimitiveGroup {
        self.model = model;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// A collection of primitive groups uploaded to the core together.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub groups: Vec<PrimitiveGroup>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene { groups: Vec::new() }
    }

    pub fn push(&mut self, group: PrimitiveGroup) {
        self.groups.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;

    #[test]
    fn from_vertices_splits_into_parallel_arrays() {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([1.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([0.0, 1.0]),
        ];

        let group = PrimitiveGroup::from_vertices(PrimitiveKind::Triangles, &vertices, vec![0, 1, 2]);

        assert_eq!(group.vertex_count(), 3);
        assert!(group.normals.is_some());
        assert!(group.texcoords.is_some());
        assert_eq!(group.positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn from_vertices_without_normals_or_texcoords_omits_both_arrays() {
        let vertices = vec![Vertex::new([0.0, 0.0, 0.0]), Vertex::new([1.0, 0.0, 0.0]), Vertex::new([0.0, 1.0, 0.0])];
        let group = PrimitiveGroup::from_vertices(PrimitiveKind::Triangles, &vertices, vec![0, 1, 2]);

        assert!(group.normals.is_none());
        assert!(group.texcoords.is_none());
    }
}
