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
use criterion::{criterion_group, criterion_main, Criterion};
use yuvpipe::{
    ConversionPipeline, PipelineOptions, PixelBuffer, RgbPixelFormat, YuvNVOrder,
};

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut raster = PixelBuffer::allocate(width, height, RgbPixelFormat::Rgba, 64).unwrap();
    for y in 0..height {
        for (x, px) in raster.row_mut(y).chunks_exact_mut(4).enumerate() {
            px[0] = x as u8;
            px[1] = y as u8;
            px[2] = (x + y as usize) as u8;
            px[3] = 255;
        }
    }
    raster
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let raster = gradient(1920, 1080);

    let mut pipeline = ConversionPipeline::new(PipelineOptions::default()).unwrap();
    let mut frame = pipeline.encode_frame(&raster).unwrap();

    c.bench_function("yuvpipe RGBA -> NV12", |b| {
        b.iter(|| {
            pipeline.encode_raster(&raster, &mut frame).unwrap();
        })
    });

    c.bench_function("yuvpipe NV12 -> XRGB", |b| {
        b.iter(|| {
            pipeline.convert_frame(&mut frame).unwrap();
        })
    });

    let mut nv21_pipeline =
        ConversionPipeline::new(PipelineOptions::default().with_order(YuvNVOrder::VU)).unwrap();
    let mut nv21_frame = nv21_pipeline.encode_frame(&raster).unwrap();

    c.bench_function("yuvpipe NV21 -> XRGB", |b| {
        b.iter(|| {
            nv21_pipeline.convert_frame(&mut nv21_frame).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
