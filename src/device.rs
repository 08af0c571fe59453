//! Device-resident scene storage: the validated, upload-time form of
//! [`crate::scene::Scene`] that the pipeline stages actually dispatch over.
//!
//! Ownership of everything here belongs to the core from `upload_scene`
//! until `shutdown`, mirroring a device/host buffer split.

use std::sync::Arc;

use nalgebra::{Matrix3, Matrix4};

use crate::error::{RasterError, RasterResult};
use crate::mesh::Primitive as PrimitiveKind;
use crate::parallel::TrustedThreadSafe;
use crate::primitive::VertexOut;
use crate::scene::{PrimitiveGroup, Scene};
use crate::texture::Texture;

/// One validated, device-resident primitive group.
pub struct DevicePrimitiveGroup {
    pub kind: PrimitiveKind,
    pub indices: Vec<u16>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
    pub texture: Option<Arc<Texture>>,
    pub model: Matrix4<f32>,
    /// Scratch, sized to `positions.len()`, overwritten by the vertex stage
    /// every frame. Held behind [`TrustedThreadSafe`] because every vertex
    /// stage work item owns exactly one disjoint slot.
    pub vertex_out: TrustedThreadSafe<Vec<VertexOut>>,
    /// This group's primitives' offset into the pipeline's flat primitive array.
    pub begin_offset: usize,
    /// Number of primitives this group contributes (`kind.primitive_count`).
    pub primitive_count: usize,
}

impl DevicePrimitiveGroup {
    fn validate(group_idx: usize, group: &PrimitiveGroup) -> RasterResult<()> {
        if group.kind != PrimitiveKind::Triangles {
            return Err(RasterError::UnsupportedPrimitive { group: group_idx, kind: group.kind });
        }

        if group.indices.len() % 3 != 0 {
            return Err(RasterError::InvalidScene {
                group: group_idx,
                reason: format!("index count {} is not a multiple of 3", group.indices.len()),
            });
        }

        let vertex_count = group.vertex_count();

        for &index in &group.indices {
            if index as usize >= vertex_count {
                return Err(RasterError::IndexOutOfBounds { group: group_idx, index: index as u32, vertex_count });
            }
        }

        if let Some(ref normals) = group.normals {
            if normals.len() != vertex_count {
                return Err(RasterError::InvalidScene {
                    group: group_idx,
                    reason: format!("{} normals for {} vertices", normals.len(), vertex_count),
                });
            }
        }

        if let Some(ref texcoords) = group.texcoords {
            if texcoords.len() != vertex_count {
                return Err(RasterError::InvalidScene {
                    group: group_idx,
                    reason: format!("{} texcoords for {} vertices", texcoords.len(), vertex_count),
                });
            }
        }

        if let Some((ref data, width, height)) = group.texture {
            let expected = width as usize * height as usize * 3;
            if data.len() != expected {
                return Err(RasterError::InvalidScene {
                    group: group_idx,
                    reason: format!("texture data is {} bytes, expected {} for {}x{}", data.len(), expected, width, height),
                });
            }
        }

        Ok(())
    }

    fn upload(group_idx: usize, group: PrimitiveGroup, begin_offset: usize) -> RasterResult<DevicePrimitiveGroup> {
        Self::validate(group_idx, &group)?;

        let primitive_count = group.kind.primitive_count(group.indices.len());
        let vertex_count = group.vertex_count();

        let texture = group.texture.map(|(data, width, height)| Arc::new(Texture::new(data, width, height)));

        Ok(DevicePrimitiveGroup {
            kind: group.kind,
            indices: group.indices,
            positions: group.positions,
            normals: group.normals,
            texcoords: group.texcoords,
            texture,
            model: group.model,
            vertex_out: TrustedThreadSafe::new(vec![VertexOut::zeroed(); vertex_count]),
            begin_offset,
            primitive_count,
        })
    }
}

/// Inverse-transpose of a model/eye matrix's upper-left 3x3, used to carry
/// normals into eye space without the shearing a plain matrix multiply would
/// introduce under non-uniform scale. Recomputed every frame from `MV` (not
/// stored on the group), since the view matrix changes frame to frame.
///
/// Falls back to the identity if the matrix is singular, rather than
/// propagating NaNs into every downstream normal.
pub fn normal_matrix_from(mv: &Matrix4<f32>) -> Matrix3<f32> {
    let upper: Matrix3<f32> = mv.fixed_view::<3, 3>(0, 0).into_owned();
    upper.try_inverse().map(|m| m.transpose()).unwrap_or_else(Matrix3::identity)
}

/// The validated, device-resident form of an uploaded [`Scene`].
pub struct DeviceScene {
    pub groups: Vec<DevicePrimitiveGroup>,
    /// Total primitive count across all groups, i.e. the flat primitive
    /// array's required length.
    pub total_primitives: usize,
}

impl DeviceScene {
    /// Validates and uploads a host [`Scene`], producing the device-resident
    /// groups the pipeline stages dispatch over. Rejects the whole scene on
    /// the first invalid group.
    pub fn upload(scene: Scene) -> RasterResult<DeviceScene> {
        let mut groups = Vec::with_capacity(scene.groups.len());
        let mut begin_offset = 0;

        for (group_idx, group) in scene.groups.into_iter().enumerate() {
            let device_group = DevicePrimitiveGroup::upload(group_idx, group, begin_offset)?;
            begin_offset += device_group.primitive_count;
            groups.push(device_group);
        }

        Ok(DeviceScene { groups, total_primitives: begin_offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;

    fn triangle_group() -> PrimitiveGroup {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0]),
        ];
        PrimitiveGroup::from_vertices(PrimitiveKind::Triangles, &vertices, vec![0, 1, 2])
    }

    #[test]
    fn upload_computes_begin_offsets_across_groups() {
        let mut scene = Scene::new();
        scene.push(triangle_group());
        scene.push(triangle_group());

        let device = DeviceScene::upload(scene).unwrap();
        assert_eq!(device.groups[0].begin_offset, 0);
        assert_eq!(device.groups[1].begin_offset, 1);
        assert_eq!(device.total_primitives, 2);
    }

    #[test]
    fn upload_rejects_out_of_bounds_index() {
        let mut group = triangle_group();
        group.indices = vec![0, 1, 5];
        let mut scene = Scene::new();
        scene.push(group);

        match DeviceScene::upload(scene) {
            Err(RasterError::IndexOutOfBounds { index: 5, .. }) => {}
            other => panic!("expected IndexOutOfBounds, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn upload_rejects_non_triangle_primitives() {
        let mut group = triangle_group();
        group.kind = PrimitiveKind::Lines;
        let mut scene = Scene::new();
        scene.push(group);

        match DeviceScene::upload(scene) {
            Err(RasterError::UnsupportedPrimitive { kind: PrimitiveKind::Lines, .. }) => {}
            other => panic!("expected UnsupportedPrimitive, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn identity_matrix_yields_identity_normal_matrix() {
        assert_eq!(normal_matrix_from(&Matrix4::identity()), Matrix3::identity());
    }
}
