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
#![no_main]

use libfuzzer_sys::fuzz_target;
use yuvpipe::{
    yuv_nv420_to_rgbx, BiPlanarView, ConversionMatrix, ConversionProfile, Direction, PixelBuffer,
    PlaneRef, RgbPixelFormat, YuvNVOrder,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    fuzz_nv420(data.0, data.1, data.2, data.3, data.4, data.5);
});

fn fuzz_nv420(i_width: u8, i_height: u8, y_value: u8, u_value: u8, v_value: u8, format: u8) {
    if i_height == 0 || i_width == 0 {
        return;
    }
    let width = i_width as u32;
    let height = i_height as u32;
    let y_plane = vec![y_value; width as usize * height as usize];
    let uv_plane: Vec<u8> = [u_value, v_value]
        .iter()
        .copied()
        .cycle()
        .take(width.div_ceil(2) as usize * 2 * height.div_ceil(2) as usize)
        .collect();

    let order = if format & 1 == 0 {
        YuvNVOrder::UV
    } else {
        YuvNVOrder::VU
    };
    let image = BiPlanarView::new(
        PlaneRef {
            data: &y_plane,
            width,
            height,
            row_stride: width,
        },
        PlaneRef {
            data: &uv_plane,
            width: width.div_ceil(2),
            height: height.div_ceil(2),
            row_stride: width.div_ceil(2) * 2,
        },
        2,
        2,
        order,
    )
    .unwrap();

    let destination_format = match format % 6 {
        0 => RgbPixelFormat::Rgba,
        1 => RgbPixelFormat::Bgra,
        2 => RgbPixelFormat::Argb,
        3 => RgbPixelFormat::Xrgb,
        4 => RgbPixelFormat::Rgbx,
        _ => RgbPixelFormat::Bgrx,
    };

    for profile in [
        ConversionProfile::VIDEO_RANGE_BT709,
        ConversionProfile::FULL_RANGE_BT601,
        ConversionProfile::VIDEO_RANGE_BT2020,
    ] {
        let matrix = ConversionMatrix::build(profile, Direction::YuvToRgb).unwrap();
        let mut rgba = PixelBuffer::allocate(width, height, destination_format, 16).unwrap();
        yuv_nv420_to_rgbx(&image, &matrix, &mut rgba, 255).unwrap();
    }
}
