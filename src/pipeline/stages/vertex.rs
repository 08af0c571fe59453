//! Vertex transform: maps object-space vertices into
//! window space and eye space, per primitive group.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};
use rayon::prelude::*;

use crate::device::DevicePrimitiveGroup;
use crate::primitive::VertexOut;

/// Transforms every vertex of `group`, writing results into
/// `group.vertex_out`.
///
/// Embarrassingly parallel across vertices: each work item owns exactly one
/// `VertexOut` slot, so the write through `TrustedThreadSafe` needs no
/// further synchronization.
pub fn dispatch(group: &DevicePrimitiveGroup, mv: &Matrix4<f32>, mvp: &Matrix4<f32>, mv_normal: &Matrix3<f32>, dims: (u32, u32)) {
    let (width, height) = dims;

    (0..group.positions.len()).into_par_iter().for_each(|v| {
        let position = group.positions[v];
        let object = Vector4::new(position[0], position[1], position[2], 1.0);

        let eye_pos4 = mv * object;
        let eye_pos = [eye_pos4.x, eye_pos4.y, eye_pos4.z];

        let clip = mvp * object;
        let w = clip.w;
        let ndc_x = clip.x / w;
        let ndc_y = clip.y / w;
        let ndc_z = clip.z / w;

        let x = 0.5 * width as f32 * (ndc_x + 1.0);
        let y = 0.5 * height as f32 * (1.0 - ndc_y);
        let z = -ndc_z;

        let normal_obj = group.normals.as_ref().map(|n| n[v]).unwrap_or([1.0, 1.0, 1.0]);
        let eye_normal = (mv_normal * Vector3::new(normal_obj[0], normal_obj[1], normal_obj[2])).normalize();

        let texcoord = group.texcoords.as_ref().map(|t| t[v]).unwrap_or([0.0, 0.0]);

        let out = VertexOut {
            pos: [x, y, z, w],
            eye_pos,
            eye_normal: [eye_normal.x, eye_normal.y, eye_normal.z],
            color: debug_tint(v),
            texcoord,
            texture: group.texture.clone(),
        };

        // Safety: each `v` in `0..group.positions.len()` is written by
        // exactly one work item.
        unsafe {
            group.vertex_out.as_mut()[v] = out;
        }
    });
}

/// The (R, G, B) debug tint assigned by vertex index mod 3, at magnitude 0.5.
fn debug_tint(v: usize) -> [f32; 3] {
    match v % 3 {
        0 => [0.5, 0.0, 0.0],
        1 => [0.0, 0.5, 0.0],
        _ => [0.0, 0.0, 0.5],
    }
}
