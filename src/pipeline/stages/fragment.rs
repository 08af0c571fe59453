//! Fragment shader: texture sampling, Lambert
//! lighting, and the mutually-exclusive debug visualizations.

use rayon::prelude::*;

use crate::color::{self, Rgb};
use crate::config::{Config, DebugMode, TextureFilter};
use crate::parallel::TrustedThreadSafe;
use crate::primitive::Fragment;

/// The scene's single point light, in eye space.
const LIGHT_POS: [f32; 3] = [0.5, 0.2, 0.7];
/// Ambient term added to every pixel so fully unlit geometry isn't pure black.
const AMBIENT: f32 = 0.1;

/// Shades every pixel of the (possibly supersampled) fragment buffer into
/// the linear HDR framebuffer resolve will later downsample.
pub fn dispatch(fragments: &TrustedThreadSafe<Vec<Fragment>>, framebuffer: &mut [Rgb], config: &Config) {
    // Safety: the rasterizer stage has already completed and this stage
    // never mutates the fragment buffer.
    let fragments = unsafe { fragments.as_ref() };

    framebuffer.par_iter_mut().zip(fragments.par_iter()).for_each(|(pixel, frag)| {
        *pixel = shade(frag, config);
    });
}

fn shade(frag: &Fragment, config: &Config) -> Rgb {
    match config.debug_mode {
        DebugMode::Depth => {
            let v = (1.0 - frag.window_z).abs();
            [v, v, v]
        }
        DebugMode::Normal => frag.eye_normal,
        DebugMode::None => lit_color(frag, config),
    }
}

fn lit_color(frag: &Fragment, config: &Config) -> Rgb {
    let base = base_color(frag, config);

    let to_light = [
        LIGHT_POS[0] - frag.eye_pos[0],
        LIGHT_POS[1] - frag.eye_pos[1],
        LIGHT_POS[2] - frag.eye_pos[2],
    ];
    let len = (to_light[0] * to_light[0] + to_light[1] * to_light[1] + to_light[2] * to_light[2]).sqrt();
    let light_dir = if len > 1e-8 {
        [to_light[0] / len, to_light[1] / len, to_light[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    };

    let ndotl = light_dir[0] * frag.eye_normal[0] + light_dir[1] * frag.eye_normal[1] + light_dir[2] * frag.eye_normal[2];
    let lambert = ndotl.max(0.0) + AMBIENT;

    color::scale(base, lambert)
}

/// Picks the unlit base color a pixel is shaded from: the debug tint if
/// texturing is disabled, a texture sample if the winning primitive carries
/// one, or black otherwise.
fn base_color(frag: &Fragment, config: &Config) -> Rgb {
    if !config.texture {
        return frag.color;
    }

    match &frag.texture {
        // Nearest reads the rasterizer's precomputed `uv_start` byte offset
        // rather than re-flooring `frag.uv`, per the Fragment contract.
        Some(texture) => match config.texture_filter {
            TextureFilter::Nearest => texture.sample_nearest_at(frag.uv_start),
            TextureFilter::Bilinear => texture.sample_bilinear(frag.uv[0], frag.uv[1]),
        },
        None => [0.0, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use std::sync::Arc;

    fn fragment_facing_light() -> Fragment {
        let mut f = Fragment::cleared();
        f.eye_pos = [0.0, 0.0, 0.0];
        f.eye_normal = [0.0, 0.0, 1.0];
        f
    }

    #[test]
    fn untextured_fragment_without_texture_ref_shades_to_black() {
        let config = Config::default();
        let frag = fragment_facing_light();
        let color = lit_color(&frag, &config);
        assert_eq!(color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn disabling_texture_falls_back_to_debug_tint() {
        let mut config = Config::default();
        config.texture = false;

        let mut frag = fragment_facing_light();
        frag.color = [0.5, 0.0, 0.0];
        frag.texture = Some(Arc::new(Texture::new(vec![255, 255, 255], 1, 1)));

        let color = lit_color(&frag, &config);
        // lambert > 0 here, so base color (0.5,0,0) should be scaled, not zero.
        assert!(color[0] > 0.0);
        assert_eq!(color[1], 0.0);
    }

    #[test]
    fn depth_debug_mode_writes_grayscale_from_window_z() {
        let mut config = Config::default();
        config.debug_mode = DebugMode::Depth;

        let mut frag = Fragment::cleared();
        frag.window_z = 0.25;

        let color = shade(&frag, &config);
        assert_eq!(color, [0.75, 0.75, 0.75]);
    }

    #[test]
    fn textured_fragment_samples_nearest_texel() {
        let config = Config { texture_filter: TextureFilter::Nearest, ..Config::default() };

        let texture = Arc::new(Texture::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255], 2, 2));
        let uv_start = texture.nearest_index(0.5, 0.5);
        let mut frag = fragment_facing_light();
        frag.texture = Some(texture);
        frag.uv = [0.5, 0.5];
        frag.uv_start = uv_start;

        let base = base_color(&frag, &config);
        assert_eq!(base, [1.0, 0.0, 0.0]);
    }
}
