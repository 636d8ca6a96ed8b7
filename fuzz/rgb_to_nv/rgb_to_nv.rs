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
    ConversionPipeline, PipelineOptions, PixelBuffer, RgbPixelFormat, YuvNVOrder,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8)| {
    fuzz_rgb(data.0, data.1, data.2, data.3, data.4);
});

fn fuzz_rgb(i_width: u8, i_height: u8, r: u8, g: u8, b: u8) {
    if i_height == 0 || i_width == 0 {
        return;
    }
    let width = i_width as u32;
    let height = i_height as u32;

    for format in [RgbPixelFormat::Rgb, RgbPixelFormat::Bgra, RgbPixelFormat::Xrgb] {
        let mut raster = PixelBuffer::allocate(width, height, format, 1).unwrap();
        for y in 0..height {
            for px in raster.row_mut(y).chunks_exact_mut(format.bytes_per_pixel()) {
                px[format.get_r_channel_offset()] = r;
                px[format.get_g_channel_offset()] = g;
                px[format.get_b_channel_offset()] = b;
            }
        }
        for order in [YuvNVOrder::UV, YuvNVOrder::VU] {
            let mut pipeline =
                ConversionPipeline::new(PipelineOptions::default().with_order(order)).unwrap();
            let mut frame = pipeline.encode_frame(&raster).unwrap();
            pipeline.convert_frame(&mut frame).unwrap();
        }
    }
}
