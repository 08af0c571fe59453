//! Frame driver.
//!
//! Owns every device buffer the pipeline stages dispatch over and runs them
//! in the fixed order the frame driver requires: vertex transform and
//! primitive assembly per group, then rasterizer, fragment shader, and
//! resolve once over the whole frame. Each stage dispatches its work over
//! `rayon`'s global thread pool; since every stage function blocks on its
//! `par_iter`/`par_chunks_mut` call before returning, calling them in sequence
//! already gives the device-wide barrier required between stages.

pub mod stages;

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Instant;

use nalgebra::Matrix4;

use crate::color::Rgb;
use crate::config::Config;
use crate::device::{normal_matrix_from, DeviceScene};
use crate::error::{RasterError, RasterResult};
use crate::parallel::TrustedThreadSafe;
use crate::primitive::{Fragment, Primitive};
use crate::scene::Scene;

/// Owns the device buffers and runs frames.
///
/// `init`/`upload_scene`/`rasterize`/`shutdown` are the four operations a
/// host drives this core through.
pub struct Pipeline {
    config: Config,
    width: u32,
    height: u32,
    ss_width: u32,
    ss_height: u32,
    scene: Option<DeviceScene>,
    primitives: TrustedThreadSafe<Vec<Primitive>>,
    fragments: TrustedThreadSafe<Vec<Fragment>>,
    depth: Vec<AtomicI32>,
    mutex: Vec<AtomicI32>,
    framebuffer: Vec<Rgb>,
    frame_index: u64,
}

impl Pipeline {
    /// Allocates internal buffers sized to `S * width x S * height`, where
    /// `S` is `config.ssaa_factor`. Calling this again on an existing
    /// `Pipeline` (by constructing a fresh one and dropping the old) frees
    /// the prior buffers, matching the idempotent-reinit contract expected
    /// here; there is no in-place `reinit`, since Rust's ownership model
    /// makes "replace with a new value" the idiomatic equivalent.
    pub fn new(width: u32, height: u32, config: Config) -> RasterResult<Pipeline> {
        if width == 0 || height == 0 {
            return Err(RasterError::AllocationFailure { buffer: "framebuffer", requested: 0 });
        }

        let ssaa = config.ssaa_factor.max(1);
        let ss_width = width * ssaa;
        let ss_height = height * ssaa;
        let pixel_count = ss_width as usize * ss_height as usize;

        info!(
            "raster_core: init {}x{} (supersampled {}x{}, ssaa={}x, {} worker threads available)",
            width,
            height,
            ss_width,
            ss_height,
            ssaa,
            num_cpus::get()
        );

        Ok(Pipeline {
            config,
            width,
            height,
            ss_width,
            ss_height,
            scene: None,
            primitives: TrustedThreadSafe::new(Vec::new()),
            fragments: TrustedThreadSafe::new((0..pixel_count).map(|_| Fragment::cleared()).collect()),
            depth: (0..pixel_count).map(|_| AtomicI32::new(i32::MAX)).collect(),
            mutex: (0..pixel_count).map(|_| AtomicI32::new(0)).collect(),
            framebuffer: vec![[0.0; 3]; pixel_count],
            frame_index: 0,
        })
    }

    /// Validates and uploads a scene, producing device-resident primitive
    /// groups and a flat, reusable primitive scratch array sized to the
    /// scene's total primitive count.
    pub fn upload_scene(&mut self, scene: Scene) -> RasterResult<()> {
        debug!("raster_core: uploading scene with {} primitive group(s)", scene.groups.len());

        let device_scene = DeviceScene::upload(scene)?;

        // Safety: no concurrent dispatch is in flight between frames.
        unsafe {
            *self.primitives.as_mut() = (0..device_scene.total_primitives).map(|_| Primitive::default()).collect();
        }

        self.scene = Some(device_scene);

        Ok(())
    }

    /// Runs one frame: transforms and assembles every group's geometry,
    /// rasterizes, shades, and resolves into `output`, an RGBA byte buffer of
    /// size `width * height * 4` (alpha always `0`).
    ///
    /// `view` and `projection` are the frame's camera matrices; each group's
    /// own model matrix (set at upload time) is combined with them to form
    /// the per-group `MV`/`MVP`/`MV_normal` triple the vertex stage needs.
    pub fn rasterize(&mut self, view: &Matrix4<f32>, projection: &Matrix4<f32>, output: &mut [u8]) -> RasterResult<()> {
        let expected_len = self.width as usize * self.height as usize * 4;

        if output.len() != expected_len {
            return Err(RasterError::DispatchFailure {
                stage: "resolve",
                reason: format!("output buffer is {} bytes, expected {}", output.len(), expected_len),
            });
        }

        let start = Instant::now();

        self.clear_frame();

        let dims = (self.ss_width, self.ss_height);
        let mut primitive_count = 0;

        if let Some(scene) = self.scene.as_ref() {
            for group in &scene.groups {
                let mv = view * group.model;
                let mvp = projection * mv;
                let mv_normal = normal_matrix_from(&mv);

                stages::vertex::dispatch(group, &mv, &mvp, &mv_normal, dims);
                stages::assembly::dispatch(group, &self.primitives);
            }

            primitive_count = scene.total_primitives;

            stages::rasterizer::dispatch(
                &self.primitives,
                &self.fragments,
                &self.depth,
                &self.mutex,
                dims,
                self.config.correct_interpolation,
            );
        }

        stages::fragment::dispatch(&self.fragments, &mut self.framebuffer, &self.config);

        stages::resolve::dispatch(&self.framebuffer, dims, self.config.ssaa_factor.max(1), output, self.width);

        self.frame_index += 1;

        trace!(
            "raster_core: frame {} ({} primitives) took {:?}",
            self.frame_index,
            primitive_count,
            start.elapsed()
        );

        Ok(())
    }

    /// Zeroes the fragment buffer and resets every depth entry to `i32::MAX`,
    /// per the frame driver's first step. The mutex
    /// buffer is never touched here: it is an invariant that it already
    /// reads all-zero between frames, maintained by the rasterizer stage.
    fn clear_frame(&mut self) {
        // Safety: no concurrent dispatch is in flight; this runs before any
        // stage touches the buffer this frame.
        unsafe {
            for fragment in self.fragments.as_mut().iter_mut() {
                *fragment = Fragment::cleared();
            }
        }

        for entry in &self.depth {
            entry.store(i32::MAX, Ordering::Relaxed);
        }
    }

    /// Releases the device scene and primitive scratch array. The
    /// resolution-sized buffers (fragments, depth, mutex, framebuffer) are
    /// dropped along with the `Pipeline` itself, since their lifetime is
    /// bounded by `init`/`shutdown` regardless.
    pub fn shutdown(&mut self) {
        info!("raster_core: shutdown after {} frame(s)", self.frame_index);
        self.scene = None;
        unsafe {
            self.primitives.as_mut().clear();
        }
    }
}
