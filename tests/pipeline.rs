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
use rand::Rng;
use std::sync::mpsc::channel;
use std::time::Duration;
use yuvpipe::{
    BiPlanarView, BiPlanarViewMut, ConversionPipeline, ConversionProfile, PipelineOptions,
    PixelBuffer, PlaneAccess, PlaneMut, PlaneProvider, PlaneRef, Presenter, RgbPixelFormat,
    YuvError, YuvNVOrder,
};

/// Frame with padded rows, as handed out by capture hardware.
struct StridedFrame {
    y_plane: Vec<u8>,
    uv_plane: Vec<u8>,
    width: u32,
    height: u32,
    y_stride: u32,
    uv_stride: u32,
    order: YuvNVOrder,
    lock: Option<PlaneAccess>,
}

impl StridedFrame {
    fn new(width: u32, height: u32, order: YuvNVOrder) -> StridedFrame {
        let y_stride = width + 7;
        let uv_stride = width.div_ceil(2) * 2 + 5;
        StridedFrame {
            y_plane: vec![0u8; (y_stride * height) as usize],
            uv_plane: vec![128u8; (uv_stride * height.div_ceil(2)) as usize],
            width,
            height,
            y_stride,
            uv_stride,
            order,
            lock: None,
        }
    }
}

impl PlaneProvider for StridedFrame {
    fn lock(&mut self, access: PlaneAccess) -> Result<(), YuvError> {
        if self.lock.is_some() {
            return Err(YuvError::PlanesLocked);
        }
        self.lock = Some(access);
        Ok(())
    }

    fn unlock(&mut self, _access: PlaneAccess) {
        self.lock = None;
    }

    fn planes(&self) -> Result<BiPlanarView<'_>, YuvError> {
        BiPlanarView::new(
            PlaneRef {
                data: &self.y_plane,
                width: self.width,
                height: self.height,
                row_stride: self.y_stride,
            },
            PlaneRef {
                data: &self.uv_plane,
                width: self.width.div_ceil(2),
                height: self.height.div_ceil(2),
                row_stride: self.uv_stride,
            },
            2,
            2,
            self.order,
        )
    }

    fn planes_mut(&mut self) -> Result<BiPlanarViewMut<'_>, YuvError> {
        if self.lock != Some(PlaneAccess::ReadWrite) {
            return Err(YuvError::ReadOnlyAccess);
        }
        BiPlanarViewMut::new(
            PlaneMut {
                data: &mut self.y_plane,
                width: self.width,
                height: self.height,
                row_stride: self.y_stride,
            },
            PlaneMut {
                data: &mut self.uv_plane,
                width: self.width.div_ceil(2),
                height: self.height.div_ceil(2),
                row_stride: self.uv_stride,
            },
            2,
            2,
            self.order,
        )
    }
}

fn round_trip(pipeline: &mut ConversionPipeline, raster: &PixelBuffer) -> PixelBuffer {
    let mut frame = StridedFrame::new(raster.width(), raster.height(), YuvNVOrder::UV);
    pipeline.encode_raster(raster, &mut frame).unwrap();
    assert!(frame.lock.is_none());
    pipeline.convert_frame(&mut frame).unwrap().try_clone().unwrap()
}

#[test]
fn smooth_raster_survives_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let width = 64u32;
    let height = 48u32;
    let mut raster = PixelBuffer::allocate(width, height, RgbPixelFormat::Rgb, 1).unwrap();
    for y in 0..height {
        for (x, px) in raster.row_mut(y).chunks_exact_mut(3).enumerate() {
            px[0] = (x * 3) as u8;
            px[1] = (y * 4) as u8;
            px[2] = 200 - (x * 2) as u8;
        }
    }
    let mut pipeline = ConversionPipeline::new(PipelineOptions::default()).unwrap();
    let decoded = round_trip(&mut pipeline, &raster);

    let mut max_diff = 0i32;
    let mut sum_diff = 0i64;
    for y in 0..height {
        for x in 0..width {
            let expected = raster.rgb_at(x, y);
            let received = decoded.rgb_at(x, y);
            for c in 0..3 {
                let diff = (expected[c] as i32 - received[c] as i32).abs();
                max_diff = max_diff.max(diff);
                sum_diff += diff as i64;
            }
        }
    }
    let mean_diff = sum_diff as f64 / (width * height * 3) as f64;
    assert!(max_diff <= 7, "max difference {}", max_diff);
    assert!(mean_diff <= 2.0, "mean difference {}", mean_diff);
}

#[test]
fn random_raster_keeps_block_means() {
    let width = 40u32;
    let height = 30u32;
    let mut rng = rand::rng();
    let mut raster = PixelBuffer::allocate(width, height, RgbPixelFormat::Bgra, 16).unwrap();
    for y in 0..height {
        for v in raster.row_mut(y).iter_mut() {
            *v = rng.random_range(96..=160);
        }
    }
    let options = PipelineOptions::default()
        .with_profile(ConversionProfile::VIDEO_RANGE_BT601)
        .with_destination_format(RgbPixelFormat::Rgba);
    let mut pipeline = ConversionPipeline::new(options).unwrap();
    let decoded = round_trip(&mut pipeline, &raster);

    for by in 0..height / 2 {
        for bx in 0..width / 2 {
            let mut expected = [0i32; 3];
            let mut received = [0i32; 3];
            for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let src = raster.rgb_at(bx * 2 + x, by * 2 + y);
                let dst = decoded.rgb_at(bx * 2 + x, by * 2 + y);
                for c in 0..3 {
                    expected[c] += src[c] as i32;
                    received[c] += dst[c] as i32;
                }
            }
            for c in 0..3 {
                let diff = (expected[c] - received[c]).abs();
                assert!(
                    diff <= 12,
                    "block ({}, {}) channel {}: expected sum {}, received {}",
                    bx,
                    by,
                    c,
                    expected[c],
                    received[c]
                );
            }
        }
    }
}

#[test]
fn gray_raster_stays_achromatic() {
    let mut raster = PixelBuffer::allocate(16, 16, RgbPixelFormat::Xrgb, 1).unwrap();
    for y in 0..16u32 {
        for (x, px) in raster.row_mut(y).chunks_exact_mut(4).enumerate() {
            let v = (y as usize * 16 + x) as u8;
            px[1..].copy_from_slice(&[v, v, v]);
        }
    }
    for (profile, max_error) in [
        (ConversionProfile::VIDEO_RANGE_BT709, 1),
        (ConversionProfile::FULL_RANGE_BT709, 0),
    ] {
        let mut pipeline =
            ConversionPipeline::new(PipelineOptions::default().with_profile(profile)).unwrap();
        let mut frame = StridedFrame::new(16, 16, YuvNVOrder::VU);
        pipeline.encode_raster(&raster, &mut frame).unwrap();
        for row in frame.uv_plane.chunks_exact(frame.uv_stride as usize) {
            assert!(row[..16].iter().all(|&v| v == 128));
        }
        let decoded = pipeline.convert_frame(&mut frame).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b] = decoded.rgb_at(x, y);
                assert_eq!(r, g);
                assert_eq!(g, b);
                let expected = (y * 16 + x) as i32;
                assert!(
                    (r as i32 - expected).abs() <= max_error,
                    "{}: {} vs {}",
                    profile.name,
                    r,
                    expected
                );
            }
        }
    }
}

#[test]
fn encode_through_read_lock_is_refused() {
    let raster = PixelBuffer::allocate(4, 4, RgbPixelFormat::Rgb, 1).unwrap();
    let pipeline = ConversionPipeline::new(PipelineOptions::default()).unwrap();
    let mut frame = StridedFrame::new(4, 4, YuvNVOrder::UV);
    frame.lock(PlaneAccess::ReadOnly).unwrap();
    assert!(matches!(
        pipeline.encode_raster(&raster, &mut frame),
        Err(YuvError::PlanesLocked)
    ));
    frame.unlock(PlaneAccess::ReadOnly);
    assert!(pipeline.encode_raster(&raster, &mut frame).is_ok());
}

#[test]
fn frames_of_changing_size_are_presented() {
    let (tx, rx) = channel();
    let presenter = Presenter::spawn(move |raster: PixelBuffer| {
        let _ = tx.send((raster.width(), raster.height()));
    })
    .unwrap();
    let mut pipeline = ConversionPipeline::new(PipelineOptions::default().with_alignment(64)).unwrap();
    for (width, height) in [(8, 8), (8, 8), (17, 9)] {
        let mut frame = StridedFrame::new(width, height, YuvNVOrder::UV);
        pipeline.display_frame(&mut frame, &presenter).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            (width, height)
        );
    }
    let stats = pipeline.shutdown();
    assert_eq!(stats.allocations, 2);
    assert_eq!(stats.reuses, 1);
    assert_eq!(stats.releases, 2);
}
