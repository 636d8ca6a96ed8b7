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
use crate::images::BiPlanarView;
use crate::numerics::qrshr;
use crate::yuv_error::{check_dimension, YuvError};
use crate::yuv_support::{ConversionMatrix, Direction, RgbPixelFormat, YuvNVOrder};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::ParallelSliceMut;

// Wide enough that fixed point rounds every 8-bit input like the f64 matrix does
const PRECISION: i32 = 32;

fn yuv_nv420_to_rgbx_impl<const DESTINATION_CHANNELS: u8, const UV_ORDER: u8>(
    bi_planar_image: &BiPlanarView,
    matrix: &ConversionMatrix,
    rgba_image: &mut PixelBuffer,
    alpha_fill: u8,
) {
    let dst_chans: RgbPixelFormat = DESTINATION_CHANNELS.into();
    let order: YuvNVOrder = UV_ORDER.into();
    let channels = dst_chans.bytes_per_pixel();

    let inverse_transform = matrix.to_integers(PRECISION as u32);
    let [r_coef, g_coef, b_coef] = inverse_transform.coefficients;
    let bias_y = inverse_transform.bias_y as i64;
    let bias_uv = inverse_transform.bias_uv as i64;

    let width = bi_planar_image.width() as usize;
    let y_plane = bi_planar_image.luma();
    let uv_plane = bi_planar_image.chroma();
    let y_stride = y_plane.row_stride as usize;
    let uv_stride = uv_plane.row_stride as usize;
    let uv_row_bytes = uv_plane.width as usize * 2;
    let rgba_stride = rgba_image.row_stride() as usize;
    let rgba = rgba_image.data_mut();

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = rgba.par_chunks_exact_mut(rgba_stride);
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = rgba.chunks_exact_mut(rgba_stride);
    }

    iter.enumerate().for_each(|(y, rgba)| {
        let y_offset = y * y_stride;
        let y_src = &y_plane.data[y_offset..(y_offset + width)];
        // Nearest neighbour: rows 2n and 2n + 1 share chroma row n
        let uv_offset = (y >> 1) * uv_stride;
        let uv_src = &uv_plane.data[uv_offset..(uv_offset + uv_row_bytes)];

        for (x, (rgba, &y_value)) in rgba
            .chunks_exact_mut(channels)
            .zip(y_src.iter())
            .enumerate()
        {
            let uv_x = (x >> 1) * 2;
            let y_value = y_value as i64 - bias_y;
            let cb_value = uv_src[uv_x + order.get_u_position()] as i64 - bias_uv;
            let cr_value = uv_src[uv_x + order.get_v_position()] as i64 - bias_uv;

            let r = qrshr::<PRECISION, 8>(
                r_coef[0] * y_value + r_coef[1] * cb_value + r_coef[2] * cr_value,
            );
            let g = qrshr::<PRECISION, 8>(
                g_coef[0] * y_value + g_coef[1] * cb_value + g_coef[2] * cr_value,
            );
            let b = qrshr::<PRECISION, 8>(
                b_coef[0] * y_value + b_coef[1] * cb_value + b_coef[2] * cr_value,
            );

            rgba[dst_chans.get_r_channel_offset()] = r as u8;
            rgba[dst_chans.get_g_channel_offset()] = g as u8;
            rgba[dst_chans.get_b_channel_offset()] = b as u8;
            if dst_chans.has_alpha() {
                rgba[dst_chans.get_a_channel_offset()] = alpha_fill;
            }
        }
    });
}

fn yuv_nv420_to_rgbx_ordered<const DESTINATION_CHANNELS: u8>(
    bi_planar_image: &BiPlanarView,
    matrix: &ConversionMatrix,
    rgba_image: &mut PixelBuffer,
    alpha_fill: u8,
) {
    match bi_planar_image.order() {
        YuvNVOrder::UV => yuv_nv420_to_rgbx_impl::<DESTINATION_CHANNELS, { YuvNVOrder::UV as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        YuvNVOrder::VU => yuv_nv420_to_rgbx_impl::<DESTINATION_CHANNELS, { YuvNVOrder::VU as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
    }
}

/// Convert bi-planar YUV 420 (NV12 or NV21) to packed 4 channel RGB.
///
/// Chroma is upsampled with nearest neighbour, each channel is rounded to nearest
/// and clamped into `[0, 255]`. The alpha slot of the destination format receives
/// `alpha_fill`, a padding slot (`X`) is left untouched.
///
/// # Arguments
///
/// * `bi_planar_image` - Source bi-planar image.
/// * `matrix` - Matrix built for [Direction::YuvToRgb].
/// * `rgba_image` - Preallocated destination with the same dimensions as the luma plane.
/// * `alpha_fill` - Value written into the alpha channel.
///
/// # Errors
///
/// [YuvError::DimensionMismatch] when destination and source sizes differ,
/// [YuvError::UnsupportedFormat] when the destination is not 4 bytes per pixel or the
/// matrix has the wrong direction. Destination contents are undefined after an error.
pub fn yuv_nv420_to_rgbx(
    bi_planar_image: &BiPlanarView,
    matrix: &ConversionMatrix,
    rgba_image: &mut PixelBuffer,
    alpha_fill: u8,
) -> Result<(), YuvError> {
    if matrix.direction() != Direction::YuvToRgb {
        return Err(YuvError::UnsupportedFormat(format!(
            "matrix for {:?} cannot decode YUV",
            matrix.direction()
        )));
    }
    check_dimension(bi_planar_image.width(), rgba_image.width())?;
    check_dimension(bi_planar_image.height(), rgba_image.height())?;

    match rgba_image.format() {
        RgbPixelFormat::Rgb | RgbPixelFormat::Bgr => {
            return Err(YuvError::UnsupportedFormat(format!(
                "destination {:?} has {} bytes per pixel, 4 expected",
                rgba_image.format(),
                rgba_image.bytes_per_pixel()
            )));
        }
        RgbPixelFormat::Rgba => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Rgba as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        RgbPixelFormat::Bgra => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Bgra as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        RgbPixelFormat::Argb => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Argb as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        RgbPixelFormat::Xrgb => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Xrgb as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        RgbPixelFormat::Rgbx => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Rgbx as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
        RgbPixelFormat::Bgrx => yuv_nv420_to_rgbx_ordered::<{ RgbPixelFormat::Bgrx as u8 }>(
            bi_planar_image,
            matrix,
            rgba_image,
            alpha_fill,
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::PlaneRef;
    use crate::yuv_support::ConversionProfile;

    fn decode_matrix() -> ConversionMatrix {
        ConversionMatrix::build(ConversionProfile::VIDEO_RANGE_BT709, Direction::YuvToRgb).unwrap()
    }

    fn view<'a>(
        luma: &'a [u8],
        chroma: &'a [u8],
        width: u32,
        height: u32,
        order: YuvNVOrder,
    ) -> BiPlanarView<'a> {
        BiPlanarView::new(
            PlaneRef {
                data: luma,
                width,
                height,
                row_stride: width,
            },
            PlaneRef {
                data: chroma,
                width: width.div_ceil(2),
                height: height.div_ceil(2),
                row_stride: width.div_ceil(2) * 2,
            },
            2,
            2,
            order,
        )
        .unwrap()
    }

    #[test]
    fn mid_gray_decodes_to_130() {
        let luma = [128u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(2, 2, RgbPixelFormat::Argb, 1).unwrap();
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 200).unwrap();
        for px in rgba.data().chunks_exact(4) {
            assert_eq!(px, &[200, 130, 130, 130]);
        }
    }

    #[test]
    fn minimum_video_luma_is_black() {
        let luma = [16u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgba, 1).unwrap();
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 255).unwrap();
        for px in rgba.data().chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn neutral_chroma_is_achromatic_for_every_luma() {
        let luma: Vec<u8> = (0..=255u8).collect();
        let chroma = vec![128u8; 8 * 2 * 8];
        let image = view(&luma, &chroma, 16, 16, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(16, 16, RgbPixelFormat::Bgra, 1).unwrap();
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 255).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b] = rgba.rgb_at(x, y);
                assert_eq!(r, g, "luma {}", y * 16 + x);
                assert_eq!(g, b, "luma {}", y * 16 + x);
            }
        }
    }

    #[test]
    fn padding_byte_is_skipped() {
        let luma = [128u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(2, 2, RgbPixelFormat::Xrgb, 1).unwrap();
        rgba.data_mut().fill(0x55);
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 0).unwrap();
        for px in rgba.data().chunks_exact(4) {
            assert_eq!(px, &[0x55, 130, 130, 130]);
        }
    }

    #[test]
    fn saturated_chroma_is_clamped() {
        let luma = [235u8, 16, 235, 16];
        let chroma = [16u8, 240];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgba, 1).unwrap();
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 255).unwrap();
        assert_eq!(rgba.rgb_at(0, 0)[0], 255);
        assert_eq!(rgba.rgb_at(1, 0)[2], 0);
    }

    #[test]
    fn chroma_is_upsampled_with_nearest_neighbour() {
        let luma = [128u8; 8];
        let chroma = [90u8, 200, 200, 90];
        let image = view(&luma, &chroma, 4, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(4, 2, RgbPixelFormat::Rgba, 1).unwrap();
        yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 255).unwrap();
        for y in 0..2 {
            assert_eq!(rgba.rgb_at(0, y), rgba.rgb_at(1, y));
            assert_eq!(rgba.rgb_at(2, y), rgba.rgb_at(3, y));
            assert_ne!(rgba.rgb_at(1, y), rgba.rgb_at(2, y));
            assert_eq!(rgba.rgb_at(0, 0), rgba.rgb_at(0, y));
        }
    }

    #[test]
    fn nv21_swaps_chroma_components() {
        let luma = [100u8; 4];
        let nv12 = [200u8, 60];
        let nv21 = [60u8, 200];
        let matrix = decode_matrix();

        let mut first = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgba, 1).unwrap();
        yuv_nv420_to_rgbx(
            &view(&luma, &nv12, 2, 2, YuvNVOrder::UV),
            &matrix,
            &mut first,
            255,
        )
        .unwrap();
        let mut second = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgba, 1).unwrap();
        yuv_nv420_to_rgbx(
            &view(&luma, &nv21, 2, 2, YuvNVOrder::VU),
            &matrix,
            &mut second,
            255,
        )
        .unwrap();
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn every_triple_rounds_like_reference_matrix() {
        // Block (bx, by) carries Cb = bx and Cr = by, its four pixels carry four luma values
        let size = 512u32;
        let mut chroma = vec![0u8; (size * size / 2) as usize];
        for (by, row) in chroma.chunks_exact_mut(size as usize).enumerate() {
            for (bx, uv) in row.chunks_exact_mut(2).enumerate() {
                uv[0] = bx as u8;
                uv[1] = by as u8;
            }
        }
        let mut luma = vec![0u8; (size * size) as usize];
        let mut rgba = PixelBuffer::allocate(size, size, RgbPixelFormat::Rgba, 64).unwrap();

        for profile in [
            ConversionProfile::VIDEO_RANGE_BT709,
            ConversionProfile::FULL_RANGE_BT709,
        ] {
            let matrix = ConversionMatrix::build(profile, Direction::YuvToRgb).unwrap();
            for pass in 0..64usize {
                for (y, row) in luma.chunks_exact_mut(size as usize).enumerate() {
                    for (x, v) in row.iter_mut().enumerate() {
                        *v = (pass * 4 + (y & 1) * 2 + (x & 1)) as u8;
                    }
                }
                let image = view(&luma, &chroma, size, size, YuvNVOrder::UV);
                yuv_nv420_to_rgbx(&image, &matrix, &mut rgba, 255).unwrap();
                for y in 0..size {
                    for x in 0..size {
                        let input = [luma[(y * size + x) as usize], (x / 2) as u8, (y / 2) as u8];
                        assert_eq!(
                            rgba.rgb_at(x, y),
                            matrix.apply(input),
                            "{} input {:?}",
                            profile.name,
                            input
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn three_channel_destination_is_unsupported() {
        let luma = [128u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgb = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgb, 1).unwrap();
        assert!(matches!(
            yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgb, 255),
            Err(YuvError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn destination_size_must_match() {
        let luma = [128u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let mut rgba = PixelBuffer::allocate(2, 3, RgbPixelFormat::Rgba, 1).unwrap();
        assert!(matches!(
            yuv_nv420_to_rgbx(&image, &decode_matrix(), &mut rgba, 255),
            Err(YuvError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn encode_matrix_is_rejected() {
        let luma = [128u8; 4];
        let chroma = [128u8; 2];
        let image = view(&luma, &chroma, 2, 2, YuvNVOrder::UV);
        let matrix =
            ConversionMatrix::build(ConversionProfile::VIDEO_RANGE_BT709, Direction::RgbToYuv)
                .unwrap();
        let mut rgba = PixelBuffer::allocate(2, 2, RgbPixelFormat::Rgba, 1).unwrap();
        assert!(matches!(
            yuv_nv420_to_rgbx(&image, &matrix, &mut rgba, 255),
            Err(YuvError::UnsupportedFormat(_))
        ));
    }
}
