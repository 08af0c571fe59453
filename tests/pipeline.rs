//! Drives the full `Pipeline` lifecycle (`new` / `upload_scene` / `rasterize`
//! / `shutdown`) the way a host application actually calls this crate,
//! rather than poking individual stages directly.

use nalgebra::Matrix4;

use raster_core::{Config, Pipeline, PrimitiveGroup, PrimitiveKind, Scene, Vertex};

/// Initializes `env_logger` so the pipeline's `info!`/`debug!`/`trace!`
/// stage-boundary lines are visible when these tests are run with
/// `RUST_LOG` set; harmless (and a no-op) if another test already did this.
fn init_logging() {
    let _ = env_logger::try_init();
}

fn single_triangle_scene() -> Scene {
    let vertices = vec![
        Vertex::new([-1.0, -1.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([0.0, 0.0]),
        Vertex::new([1.0, -1.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([1.0, 0.0]),
        Vertex::new([0.0, 1.0, 0.0]).with_normal([0.0, 0.0, 1.0]).with_texcoord([0.0, 1.0]),
    ];
    let group = PrimitiveGroup::from_vertices(PrimitiveKind::Triangles, &vertices, vec![0, 1, 2]);

    let mut scene = Scene::new();
    scene.push(group);
    scene
}

#[test]
fn init_upload_rasterize_shutdown_round_trip() {
    init_logging();

    // No texture is uploaded with this scene, so disable texturing: the
    // fragment shader falls back to the per-vertex debug tint instead of
    // shading every untextured pixel black.
    let config = Config { texture: false, ..Config::default() };

    let mut pipeline = Pipeline::new(16, 16, config).expect("init should succeed");
    pipeline.upload_scene(single_triangle_scene()).expect("upload_scene should succeed");

    let view = Matrix4::identity();
    let projection = Matrix4::identity();
    let mut output = vec![0u8; 16 * 16 * 4];

    pipeline.rasterize(&view, &projection, &mut output).expect("rasterize should succeed");

    // A front-facing triangle spanning most of the viewport must light at
    // least one pixel; alpha stays zero everywhere, per the output contract.
    assert!(output.chunks(4).any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0));
    assert!(output.chunks(4).all(|px| px[3] == 0));

    pipeline.shutdown();
}

#[test]
fn rasterize_twice_with_identical_inputs_is_byte_identical() {
    init_logging();

    let mut pipeline = Pipeline::new(16, 16, Config::default()).expect("init should succeed");
    pipeline.upload_scene(single_triangle_scene()).expect("upload_scene should succeed");

    let view = Matrix4::identity();
    let projection = Matrix4::identity();

    let mut first = vec![0u8; 16 * 16 * 4];
    pipeline.rasterize(&view, &projection, &mut first).expect("first rasterize should succeed");

    let mut second = vec![0u8; 16 * 16 * 4];
    pipeline.rasterize(&view, &projection, &mut second).expect("second rasterize should succeed");

    assert_eq!(first, second);
}

#[test]
fn rasterize_rejects_a_mismatched_output_buffer_size() {
    init_logging();

    let mut pipeline = Pipeline::new(8, 8, Config::default()).expect("init should succeed");
    pipeline.upload_scene(single_triangle_scene()).expect("upload_scene should succeed");

    let view = Matrix4::identity();
    let projection = Matrix4::identity();
    let mut wrong_size_output = vec![0u8; 4];

    let result = pipeline.rasterize(&view, &projection, &mut wrong_size_output);
    assert!(result.is_err());
}

#[test]
fn empty_scene_rasterizes_to_an_all_zero_frame() {
    init_logging();

    let mut pipeline = Pipeline::new(4, 4, Config::default()).expect("init should succeed");
    pipeline.upload_scene(Scene::new()).expect("uploading an empty scene should succeed");

    let view = Matrix4::identity();
    let projection = Matrix4::identity();
    let mut output = vec![0u8; 4 * 4 * 4];

    pipeline.rasterize(&view, &projection, &mut output).expect("rasterize should succeed");

    assert!(output.iter().all(|&b| b == 0));

    pipeline.shutdown();
}
