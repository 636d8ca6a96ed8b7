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
use crate::buffer::{BufferId, PixelBuffer};
use crate::images::{acquire, BiPlanarFrame, PlaneAccess, PlaneProvider};
use crate::lifecycle::{BufferLifecycleManager, LifecycleStats};
use crate::presenter::Presenter;
use crate::rgba_to_nv::rgbx_to_yuv_nv420;
use crate::yuv_error::YuvError;
use crate::yuv_nv_to_rgba::yuv_nv420_to_rgbx;
use crate::yuv_support::{
    ConversionMatrix, ConversionProfile, Direction, RgbPixelFormat, YuvNVOrder,
};
use log::debug;
use std::error::Error;

/// Produces the initial raster of a resource, e.g. by decoding a PNG file.
pub trait ImageDecoder {
    fn decode(&mut self, resource_name: &str) -> Result<PixelBuffer, Box<dyn Error + Send + Sync>>;
}

/// Runtime configuration of a [ConversionPipeline].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PipelineOptions {
    pub profile: ConversionProfile,
    /// Format of the decoded raster, must be 4 bytes per pixel.
    pub destination_format: RgbPixelFormat,
    pub alpha_fill: u8,
    /// Power of two alignment of the destination raster.
    pub alignment: usize,
    pub order: YuvNVOrder,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            profile: ConversionProfile::VIDEO_RANGE_BT709,
            destination_format: RgbPixelFormat::Xrgb,
            alpha_fill: 255,
            alignment: 1,
            order: YuvNVOrder::UV,
        }
    }
}

impl PipelineOptions {
    pub fn with_profile(mut self, profile: ConversionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_destination_format(mut self, format: RgbPixelFormat) -> Self {
        self.destination_format = format;
        self
    }

    pub fn with_alpha_fill(mut self, alpha_fill: u8) -> Self {
        self.alpha_fill = alpha_fill;
        self
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_order(mut self, order: YuvNVOrder) -> Self {
        self.order = order;
        self
    }
}

/// Decode, encode, convert and present flow around a single reusable destination.
///
/// Both matrices are derived once at construction. Any failure short-circuits the
/// frame and nothing is handed to the presenter.
#[derive(Debug)]
pub struct ConversionPipeline {
    options: PipelineOptions,
    forward: ConversionMatrix,
    inverse: ConversionMatrix,
    lifecycle: BufferLifecycleManager,
}

impl ConversionPipeline {
    pub fn new(options: PipelineOptions) -> Result<Self, YuvError> {
        if options.destination_format.bytes_per_pixel() != 4 {
            return Err(YuvError::UnsupportedFormat(format!(
                "destination {:?} has {} bytes per pixel, 4 expected",
                options.destination_format,
                options.destination_format.bytes_per_pixel()
            )));
        }
        let forward = ConversionMatrix::build(options.profile, Direction::RgbToYuv)?;
        let inverse = ConversionMatrix::build(options.profile, Direction::YuvToRgb)?;
        let lifecycle = BufferLifecycleManager::new(options.alignment)?;
        debug!("Pipeline ready with {:?}", options);
        Ok(ConversionPipeline {
            options,
            forward,
            inverse,
            lifecycle,
        })
    }

    #[inline]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Writes `raster` into the planes of `provider`, holding a read-write lock meanwhile.
    pub fn encode_raster<P: PlaneProvider + ?Sized>(
        &self,
        raster: &PixelBuffer,
        provider: &mut P,
    ) -> Result<(), YuvError> {
        let mut guard = acquire(provider, PlaneAccess::ReadWrite)?;
        let mut planes = guard.view_mut()?;
        rgbx_to_yuv_nv420(raster, &self.forward, &mut planes)
    }

    /// Allocates a frame with the raster size and encodes the raster into it.
    pub fn encode_frame(&self, raster: &PixelBuffer) -> Result<BiPlanarFrame, YuvError> {
        let mut frame = BiPlanarFrame::alloc(raster.width(), raster.height(), self.options.order)?;
        self.encode_raster(raster, &mut frame)?;
        Ok(frame)
    }

    /// Decodes the planes of `provider` into the reusable destination.
    ///
    /// The destination is checked against the luma size on every call and
    /// reallocated when the frame geometry changes.
    pub fn convert_frame<P: PlaneProvider + ?Sized>(
        &mut self,
        provider: &mut P,
    ) -> Result<&PixelBuffer, YuvError> {
        let guard = acquire(provider, PlaneAccess::ReadOnly)?;
        let planes = guard.view()?;
        let destination = self.lifecycle.destination(
            planes.width(),
            planes.height(),
            self.options.destination_format,
        )?;
        yuv_nv420_to_rgbx(&planes, &self.inverse, destination, self.options.alpha_fill)?;
        Ok(destination)
    }

    /// Converts the frame and submits a copy of the result to `presenter`.
    pub fn display_frame<P: PlaneProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        presenter: &Presenter,
    ) -> Result<BufferId, YuvError> {
        let snapshot = self.convert_frame(provider)?.try_clone()?;
        let id = snapshot.id();
        presenter.submit(snapshot);
        Ok(id)
    }

    pub fn run<D: ImageDecoder + ?Sized>(
        &mut self,
        decoder: &mut D,
        resource_name: &str,
        presenter: &Presenter,
    ) -> Result<BufferId, YuvError> {
        let raster = decoder.decode(resource_name).map_err(YuvError::Decode)?;
        debug!(
            "Decoded {} into {}x{} {:?}",
            resource_name,
            raster.width(),
            raster.height(),
            raster.format()
        );
        let mut frame = self.encode_frame(&raster)?;
        raster.release();
        self.display_frame(&mut frame, presenter)
    }

    #[inline]
    pub fn lifecycle_stats(&self) -> LifecycleStats {
        self.lifecycle.stats()
    }

    /// Releases the destination and returns the final counters.
    pub fn shutdown(mut self) -> LifecycleStats {
        self.lifecycle.release_all();
        self.lifecycle.stats()
    }
}
