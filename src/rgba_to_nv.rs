/*
 * Copyright (c) Radzivon Bartoshyk, 10/2026. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::buffer::PixelBuffer;
use crate::images::BiPlanarViewMut;
use crate::numerics::qrshr_clamp;
use crate::yuv_error::{check_dimension, YuvError};
use crate::yuv_support::{ConversionMatrix, Direction, RgbPixelFormat, YuvNVOrder};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

const PRECISION: i32 = 13;

fn rgbx_to_yuv_nv420_impl<const ORIGIN_CHANNELS: u8, const UV_ORDER: u8>(
    rgba_image: &PixelBuffer,
    matrix: &ConversionMatrix,
    bi_planar_image: &mut BiPlanarViewMut,
) {
    let src_chans: RgbPixelFormat = ORIGIN_CHANNELS.into();
    let order: YuvNVOrder = UV_ORDER.into();
    let channels = src_chans.bytes_per_pixel();

    let transform = matrix.to_integers(PRECISION as u32);
    let [y_coef, cb_coef, cr_coef] = transform.coefficients;
    let bias_y = transform.bias_y as i64;
    let bias_uv = transform.bias_uv as i64;
    let (y_min, y_max) = transform.clamp[0];
    let (uv_min, uv_max) = transform.clamp[1];

    let width = bi_planar_image.width() as usize;
    let height = bi_planar_image.height() as usize;
    let rgba_stride = rgba_image.row_stride() as usize;
    let rgba = rgba_image.data();

    let (y_plane, uv_plane) = bi_planar_image.planes_mut();
    let y_stride = y_plane.row_stride as usize;
    let uv_stride = uv_plane.row_stride as usize;
    let chroma_width = uv_plane.width as usize;
    let y_len = y_stride * height;
    let uv_len = uv_stride * uv_plane.height as usize;

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = y_plane.data[..y_len]
            .par_chunks_mut(y_stride * 2)
            .zip(uv_plane.data[..uv_len].par_chunks_mut(uv_stride))
            .zip(rgba.par_chunks(rgba_stride * 2));
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = y_plane.data[..y_len]
            .chunks_mut(y_stride * 2)
            .zip(uv_plane.data[..uv_len].chunks_mut(uv_stride))
            .zip(rgba.chunks(rgba_stride * 2));
    }

    iter.for_each(|((y_dst, uv_dst), rgba)| {
        // Last pair of an odd height image holds a single row
        let rows = y_dst.len() / y_stride;

        for cx in 0..chroma_width {
            let x_start = cx * 2;
            let x_end = (x_start + 2).min(width);

            let mut sum_r = 0i64;
            let mut sum_g = 0i64;
            let mut sum_b = 0i64;

            for row in 0..rows {
                let src_row = &rgba[row * rgba_stride..];
                let dst_row = &mut y_dst[row * y_stride..];
                for x in x_start..x_end {
                    let px = &src_row[x * channels..(x + 1) * channels];
                    let r = px[src_chans.get_r_channel_offset()] as i64;
                    let g = px[src_chans.get_g_channel_offset()] as i64;
                    let b = px[src_chans.get_b_channel_offset()] as i64;

                    let y_value = qrshr_clamp(
                        y_coef[0] * r + y_coef[1] * g + y_coef[2] * b + (bias_y << PRECISION),
                        PRECISION,
                        y_min,
                        y_max,
                    );
                    dst_row[x] = y_value as u8;

                    sum_r += r;
                    sum_g += g;
                    sum_b += b;
                }
            }

            // Averaging over 1, 2 or 4 samples folds into the shift
            let samples = (rows * (x_end - x_start)) as u32;
            let shift = PRECISION + samples.trailing_zeros() as i32;
            let cb = qrshr_clamp(
                cb_coef[0] * sum_r + cb_coef[1] * sum_g + cb_coef[2] * sum_b + (bias_uv << shift),
                shift,
                uv_min,
                uv_max,
            );
            let cr = qrshr_clamp(
                cr_coef[0] * sum_r + cr_coef[1] * sum_g + cr_coef[2] * sum_b + (bias_uv << shift),
                shift,
                uv_min,
                uv_max,
            );
            uv_dst[x_start + order.get_u_position()] = cb as u8;
            uv_dst[x_start + order.get_v_position()] = cr as u8;
        }
    });
}

fn rgbx_to_yuv_nv420_ordered<const ORIGIN_CHANNELS: u8>(
    rgba_image: &PixelBuffer,
    matrix: &ConversionMatrix,
    bi_planar_image: &mut BiPlanarViewMut,
) {
    match bi_planar_image.order() {
        YuvNVOrder::UV => rgbx_to_yuv_nv420_impl::<ORIGIN_CHANNELS, { YuvNVOrder::UV as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        YuvNVOrder::VU => rgbx_to_yuv_nv420_impl::<ORIGIN_CHANNELS, { YuvNVOrder::VU as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
    }
}

/// Convert packed RGB to bi-planar YUV 420 (NV12 or NV21).
///
/// Every pixel gets its own luma sample, chroma is computed from the mean of each
/// 2x2 block, blocks cut by an odd edge average only the pixels they contain.
/// Outputs are clamped into the profile code ranges.
///
/// # Arguments
///
/// * `rgba_image` - Source raster in any [RgbPixelFormat], padding and alpha are ignored.
/// * `matrix` - Matrix built for [Direction::RgbToYuv].
/// * `bi_planar_image` - Destination planes, luma size must equal the raster size.
///
/// # Errors
///
/// [YuvError::DimensionMismatch] when sizes differ, [YuvError::UnsupportedFormat] when
/// the matrix has the wrong direction.
pub fn rgbx_to_yuv_nv420(
    rgba_image: &PixelBuffer,
    matrix: &ConversionMatrix,
    bi_planar_image: &mut BiPlanarViewMut,
) -> Result<(), YuvError> {
    if matrix.direction() != Direction::RgbToYuv {
        return Err(YuvError::UnsupportedFormat(format!(
            "matrix for {:?} cannot encode YUV",
            matrix.direction()
        )));
    }
    check_dimension(bi_planar_image.width(), rgba_image.width())?;
    check_dimension(bi_planar_image.height(), rgba_image.height())?;

    match rgba_image.format() {
        RgbPixelFormat::Rgb => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Rgb as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Bgr => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Bgr as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Rgba => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Rgba as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Bgra => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Bgra as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Argb => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Argb as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Xrgb => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Xrgb as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Rgbx => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Rgbx as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
        RgbPixelFormat::Bgrx => rgbx_to_yuv_nv420_ordered::<{ RgbPixelFormat::Bgrx as u8 }>(
            rgba_image,
            matrix,
            bi_planar_image,
        ),
    }
    Ok(())
}
