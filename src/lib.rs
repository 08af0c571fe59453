//! A parallel, GPU-style software rasterizer core.
//!
//! This crate implements the hard middle of a rendering pipeline: vertex
//! transform, primitive assembly, race-free scan-conversion, and fragment
//! shading/resolve. Model loading, scene-graph traversal and window
//! presentation are left to the host application; this crate only consumes
//! flat, pre-transformed [`scene::Scene`] data and produces an 8-bit RGBA
//! image.

#[macro_use]
extern crate log;

pub mod color;
pub mod config;
pub mod device;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod parallel;
pub mod pipeline;
pub mod primitive;
pub mod scene;
pub mod texture;
pub mod utils;

pub use config::{Config, DebugMode, TextureFilter};
pub use error::{RasterError, RasterResult};
pub use mesh::{Primitive as PrimitiveKind, Vertex};
pub use pipeline::Pipeline;
pub use scene::{PrimitiveGroup, Scene};
