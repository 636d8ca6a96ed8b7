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
use image::{ExtendedColorType, ImageReader};
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use yuvpipe::{DisplaySink, ImageDecoder, PixelBuffer, RgbPixelFormat};

/// Decodes any file `image` understands into an RGBA raster.
pub(crate) struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    fn decode(&mut self, resource_name: &str) -> Result<PixelBuffer, Box<dyn Error + Send + Sync>> {
        let img = ImageReader::open(resource_name)?
            .with_guessed_format()?
            .decode()?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(PixelBuffer::from_vec(
            width,
            height,
            width * 4,
            RgbPixelFormat::Rgba,
            rgba.into_raw(),
        )?)
    }
}

/// Writes every presented raster as PNG, later frames overwrite earlier ones.
pub(crate) struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> Self {
        PngSink { path: path.into() }
    }
}

impl DisplaySink for PngSink {
    fn present(&mut self, raster: PixelBuffer) {
        let mut rgb = Vec::with_capacity(raster.width() as usize * raster.height() as usize * 3);
        for y in 0..raster.height() {
            for x in 0..raster.width() {
                rgb.extend_from_slice(&raster.rgb_at(x, y));
            }
        }
        match image::save_buffer(
            &self.path,
            &rgb,
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgb8,
        ) {
            Ok(()) => info!("Saved {:?} to {}", raster.id(), self.path.display()),
            Err(err) => error!("Saving {} failed: {}", self.path.display(), err),
        }
    }
}
