//! Scan conversion — the core of the core: bounding-box
//! rasterization with barycentric coverage testing, perspective-correct
//! attribute interpolation, and a race-free per-pixel depth resolve.

use std::sync::atomic::{AtomicI32, Ordering};

use rayon::prelude::*;

use crate::geometry::{Coordinate, Dimensions};
use crate::parallel::TrustedThreadSafe;
use crate::primitive::{Fragment, Primitive};
use crate::utils::encode_depth;

/// Rasterizes every primitive in parallel. Two primitives covering the same
/// pixel both hold a `&TrustedThreadSafe<Vec<Fragment>>`, but only the one
/// that wins that pixel's `mutex` spinlock below ever calls `as_mut` on its
/// slot, so the shared reference never yields a torn write.
pub fn dispatch(
    primitives: &TrustedThreadSafe<Vec<Primitive>>,
    fragments: &TrustedThreadSafe<Vec<Fragment>>,
    depth: &[AtomicI32],
    mutex: &[AtomicI32],
    dims: (u32, u32),
    correct_interpolation: bool,
) {
    let dimensions = Dimensions::new(dims.0, dims.1);

    // Safety: primitive assembly for every group has already completed and
    // this stage never mutates the primitive array.
    let primitives = unsafe { primitives.as_ref() };

    primitives.par_iter().for_each(|prim| {
        rasterize_one(prim, fragments, depth, mutex, dimensions, correct_interpolation);
    });
}

fn rasterize_one(
    prim: &Primitive,
    fragments: &TrustedThreadSafe<Vec<Fragment>>,
    depth: &[AtomicI32],
    mutex: &[AtomicI32],
    dimensions: Dimensions,
    correct_interpolation: bool,
) {
    let width = dimensions.width;
    let height = dimensions.height;
    let t0 = prim.v[0].pos;
    let t1 = prim.v[1].pos;
    let t2 = prim.v[2].pos;

    let area = edge_function([t0[0], t0[1]], [t1[0], t1[1]], [t2[0], t2[1]]);
    if area == 0.0 {
        return; // degenerate (zero-area) triangle: skip without writing.
    }

    let min_x = t0[0].min(t1[0]).min(t2[0]).floor().max(0.0) as u32;
    let max_x = (t0[0].max(t1[0]).max(t2[0]).ceil().min(width as f32) as u32).max(min_x);
    let min_y = t0[1].min(t1[1]).min(t2[1]).floor().max(0.0) as u32;
    let max_y = (t0[1].max(t1[1]).max(t2[1]).ceil().min(height as f32) as u32).max(min_y);

    if min_x >= width || min_y >= height || min_x >= max_x || min_y >= max_y {
        return; // bounding box is empty or entirely outside the viewport.
    }

    for row in min_y..max_y {
        for col in min_x..max_x {
            // Pixel-center sampling convention, chosen and documented here.
            let p = [col as f32 + 0.5, row as f32 + 0.5];

            let w0 = edge_function([t1[0], t1[1]], [t2[0], t2[1]], p) / area;
            let w1 = edge_function([t2[0], t2[1]], [t0[0], t0[1]], p) / area;
            let w2 = 1.0 - w0 - w1;

            if w0 < 0.0 || w0 > 1.0 || w1 < 0.0 || w1 > 1.0 || w2 < 0.0 || w2 > 1.0 {
                continue;
            }

            let bary = [w0, w1, w2];
            let window_z = w0 * t0[2] + w1 * t1[2] + w2 * t2[2];
            let new_depth = encode_depth(window_z);

            let i = Coordinate::new(col, row).into_index(dimensions);

            // Spinlock acquire: retry the CAS until it succeeds. Every
            // thread that wins releases before doing anything else, so any
            // contending thread eventually makes progress.
            loop {
                if mutex[i].compare_exchange_weak(0, 1, Ordering::Acquire, Ordering::Relaxed).is_ok() {
                    if new_depth < depth[i].load(Ordering::Relaxed) {
                        depth[i].store(new_depth, Ordering::Relaxed);

                        let fragment = build_fragment(prim, bary, window_z, correct_interpolation);

                        // Safety: this pixel's slot is only ever written
                        // while its mutex is held, which this thread holds now.
                        unsafe {
                            fragments.as_mut()[i] = fragment;
                        }
                    }
                    mutex[i].store(0, Ordering::Release);
                    break;
                }
            }
        }
    }
}

#[inline]
fn edge_function(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Computes the final per-vertex interpolation weights applied to build a
/// `Fragment`'s attributes: the plain affine barycentric weights when
/// `correct` is `false`, or the `W*`-normalized perspective-correct blend
/// otherwise.
pub fn interpolate_perspective_correct(bary: [f32; 3], w: [f32; 3], correct: bool) -> [f32; 3] {
    if !correct {
        return bary;
    }

    let iw = [1.0 / w[0], 1.0 / w[1], 1.0 / w[2]];
    let w_star = 1.0 / (bary[0] * iw[0] + bary[1] * iw[1] + bary[2] * iw[2]);

    [bary[0] * iw[0] * w_star, bary[1] * iw[1] * w_star, bary[2] * iw[2] * w_star]
}

fn build_fragment(prim: &Primitive, bary: [f32; 3], window_z: f32, correct: bool) -> Fragment {
    let v0 = &prim.v[0];
    let v1 = &prim.v[1];
    let v2 = &prim.v[2];

    let w = [v0.pos[3], v1.pos[3], v2.pos[3]];
    let l = interpolate_perspective_correct(bary, w, correct);

    let eye_pos = blend3(v0.eye_pos, v1.eye_pos, v2.eye_pos, l);
    let eye_normal = normalize(blend3(v0.eye_normal, v1.eye_normal, v2.eye_normal, l));
    let color = blend3(v0.color, v1.color, v2.color, l);
    let texcoord = blend2(v0.texcoord, v1.texcoord, v2.texcoord, l);

    let texture = v0.texture.clone().or_else(|| v1.texture.clone()).or_else(|| v2.texture.clone());

    let (uv, uv_start) = match &texture {
        Some(tex) => {
            let uv = [texcoord[0] * tex.width() as f32, texcoord[1] * tex.height() as f32];
            let uv_start = tex.nearest_index(uv[0], uv[1]);
            (uv, uv_start)
        }
        None => ([0.0, 0.0], 0),
    };

    Fragment { eye_pos, eye_normal, color, uv, uv_start, texture, window_z }
}

#[inline]
fn blend3(a: [f32; 3], b: [f32; 3], c: [f32; 3], l: [f32; 3]) -> [f32; 3] {
    [
        a[0] * l[0] + b[0] * l[1] + c[0] * l[2],
        a[1] * l[0] + b[1] * l[1] + c[1] * l[2],
        a[2] * l[0] + b[2] * l[1] + c[2] * l[2],
    ]
}

#[inline]
fn blend2(a: [f32; 2], b: [f32; 2], c: [f32; 2], l: [f32; 3]) -> [f32; 2] {
    [a[0] * l[0] + b[0] * l[1] + c[0] * l[2], a[1] * l[0] + b[1] * l[1] + c[1] * l[2]]
}

#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 1e-8 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}
