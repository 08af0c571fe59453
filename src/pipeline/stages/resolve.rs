//! Resolve: box-downsamples the (possibly
//! supersampled) linear framebuffer into an 8-bit RGBA output buffer.

use rayon::prelude::*;

use crate::color::{self, Rgb};

/// For supersampling factor `s`, averages each `s x s` block of
/// `framebuffer` (stored at `ss_width x ss_height`) into one output pixel,
/// then clamps and quantizes to 8-bit RGBA with alpha always `0`.
///
/// With `s = 1` this degenerates to a straight clamp-and-quantize of each pixel.
pub fn dispatch(framebuffer: &[Rgb], dims: (u32, u32), s: u32, output: &mut [u8], out_width: u32) {
    let (ss_width, _ss_height) = dims;

    output.par_chunks_mut(4).enumerate().for_each(|(i, pixel)| {
        let x = i as u32 % out_width;
        let y = i as u32 / out_width;

        let mut sum: Rgb = [0.0, 0.0, 0.0];
        for j in 0..s {
            for k in 0..s {
                let sx = x * s + k;
                let sy = y * s + j;
                let src = framebuffer[sy as usize * ss_width as usize + sx as usize];
                sum = color::add(sum, color::clamp01(src));
            }
        }

        let area = (s * s) as f32;
        let averaged = [sum[0] / area, sum[1] / area, sum[2] / area];
        let rgb = color::to_u8(averaged);

        pixel[0] = rgb[0];
        pixel[1] = rgb[1];
        pixel[2] = rgb[2];
        pixel[3] = 0;
    });
}
