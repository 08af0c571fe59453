//! Primitive assembly: groups a primitive group's
//! indices into triangles and writes them into the flat device primitive
//! array.

use rayon::prelude::*;

use crate::device::DevicePrimitiveGroup;
use crate::parallel::TrustedThreadSafe;
use crate::primitive::Primitive;

/// Assembles `group`'s triangles into `primitives`, starting at
/// `group.begin_offset`.
///
/// Only `Triangles` groups reach this stage — `DeviceScene::upload` rejects
/// every other primitive kind at upload time, so assembly itself only needs
/// to implement the `pid = i / 3` slot mapping.
///
/// Side effect-free across groups: each primitive's slot,
/// `group.begin_offset + pid`, is disjoint from every other group's range,
/// so no cross-group synchronization is required.
pub fn dispatch(group: &DevicePrimitiveGroup, primitives: &TrustedThreadSafe<Vec<Primitive>>) {
    // Safety: the vertex stage for this group has already completed (the
    // pipeline calls `vertex::dispatch` and waits before calling this), so
    // every slot is fully written and read-only from here on.
    let vertex_out = unsafe { group.vertex_out.as_ref() };

    (0..group.primitive_count).into_par_iter().for_each(|pid| {
        let base = pid * 3;
        let v = [
            vertex_out[group.indices[base] as usize].clone(),
            vertex_out[group.indices[base + 1] as usize].clone(),
            vertex_out[group.indices[base + 2] as usize].clone(),
        ];

        // Safety: `group.begin_offset + pid` is a disjoint slot for every
        // `pid` in this group, and disjoint from every other group's range.
        unsafe {
            primitives.as_mut()[group.begin_offset + pid] = Primitive::new(v);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceScene;
    use crate::mesh::{Primitive as PrimitiveKind, Vertex};
    use crate::scene::{PrimitiveGroup, Scene};
    use nalgebra::Matrix3;
    use nalgebra::Matrix4;

    #[test]
    fn assembled_triangle_vertices_match_indexed_vertex_out() {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0]),
        ];
        let group = PrimitiveGroup::from_vertices(PrimitiveKind::Triangles, &vertices, vec![2, 0, 1]);
        let mut scene = Scene::new();
        scene.push(group);
        let device_scene = DeviceScene::upload(scene).unwrap();
        let group = &device_scene.groups[0];

        let identity = Matrix4::<f32>::identity();
        let mv_normal = Matrix3::<f32>::identity();
        super::super::vertex::dispatch(group, &identity, &identity, &mv_normal, (8, 8));

        let primitives = TrustedThreadSafe::new(vec![Primitive::default(); device_scene.total_primitives]);
        dispatch(group, &primitives);

        let vertex_out = unsafe { group.vertex_out.as_ref() };
        let assembled = unsafe { primitives.as_ref() };

        assert_eq!(assembled[0].v[0].pos, vertex_out[2].pos);
        assert_eq!(assembled[0].v[1].pos, vertex_out[0].pos);
        assert_eq!(assembled[0].v[2].pos, vertex_out[1].pos);
    }
}
