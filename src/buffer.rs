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
use crate::yuv_error::{check_overflow_v2, check_plane, AllocationError, YuvError};
use crate::yuv_support::RgbPixelFormat;
use log::trace;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique identity of a [PixelBuffer] allocation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Owned packed RGB raster.
///
/// The backing region starts on the requested alignment and every row is padded
/// up to the same boundary. The region is released exactly once, when the buffer
/// is dropped or passed to [PixelBuffer::release].
pub struct PixelBuffer {
    storage: Vec<u8>,
    offset: usize,
    width: u32,
    height: u32,
    row_stride: u32,
    format: RgbPixelFormat,
    alignment: usize,
    id: BufferId,
}

impl PixelBuffer {
    /// Allocates zeroed buffer, `alignment` must be a power of two, `1` means unaligned.
    pub fn allocate(
        width: u32,
        height: u32,
        format: RgbPixelFormat,
        alignment: usize,
    ) -> Result<PixelBuffer, AllocationError> {
        if width == 0 || height == 0 {
            return Err(AllocationError::ZeroBaseSize);
        }
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(AllocationError::InvalidAlignment(alignment));
        }
        let row_bytes = check_overflow_v2(width as usize, format.bytes_per_pixel())?;
        let row_stride = row_bytes
            .checked_next_multiple_of(alignment)
            .ok_or(AllocationError::PointerOverflow)?;
        let row_stride_u32 =
            u32::try_from(row_stride).map_err(|_| AllocationError::PointerOverflow)?;
        let region = check_overflow_v2(row_stride, height as usize)?;
        let capacity = region
            .checked_add(alignment - 1)
            .ok_or(AllocationError::PointerOverflow)?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| AllocationError::OutOfMemory(capacity))?;
        storage.resize(capacity, 0u8);

        let address = storage.as_ptr() as usize;
        let offset = (alignment - address % alignment) % alignment;

        let id = BufferId::next();
        trace!(
            "Allocated buffer {:?} {}x{} {:?}, stride {}, alignment {}",
            id,
            width,
            height,
            format,
            row_stride,
            alignment
        );

        Ok(PixelBuffer {
            storage,
            offset,
            width,
            height,
            row_stride: row_stride_u32,
            format,
            alignment,
            id,
        })
    }

    /// Takes ownership over an already filled raster, e.g. the output of an image decoder.
    pub fn from_vec(
        width: u32,
        height: u32,
        row_stride: u32,
        format: RgbPixelFormat,
        data: Vec<u8>,
    ) -> Result<PixelBuffer, YuvError> {
        if width == 0 || height == 0 {
            return Err(AllocationError::ZeroBaseSize.into());
        }
        check_plane(
            data.len(),
            row_stride,
            width,
            height,
            format.bytes_per_pixel(),
            YuvError::BufferSizeMismatch,
        )?;
        let id = BufferId::next();
        trace!(
            "Adopted buffer {:?} {}x{} {:?}, stride {}",
            id,
            width,
            height,
            format,
            row_stride
        );
        Ok(PixelBuffer {
            storage: data,
            offset: 0,
            width,
            height,
            row_stride,
            format,
            alignment: 1,
            id,
        })
    }

    /// Copies contents into a fresh allocation with the same layout.
    pub fn try_clone(&self) -> Result<PixelBuffer, AllocationError> {
        let mut copy = PixelBuffer::allocate(self.width, self.height, self.format, self.alignment)?;
        if copy.row_stride == self.row_stride {
            copy.data_mut().copy_from_slice(self.data());
        } else {
            let row_bytes = self.row_bytes();
            let row_stride = copy.row_stride as usize;
            for (dst, src) in copy
                .data_mut()
                .chunks_exact_mut(row_stride)
                .zip(self.data().chunks_exact(self.row_stride as usize))
            {
                dst[..row_bytes].copy_from_slice(&src[..row_bytes]);
            }
        }
        Ok(copy)
    }

    /// Releases the backing region.
    pub fn release(self) {
        drop(self)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between starts of consecutive rows.
    #[inline]
    pub fn row_stride(&self) -> u32 {
        self.row_stride
    }

    #[inline]
    pub fn format(&self) -> RgbPixelFormat {
        self.format
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }

    #[inline]
    pub(crate) fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    #[inline]
    pub fn matches(&self, width: u32, height: u32, format: RgbPixelFormat) -> bool {
        self.width == width && self.height == height && self.format == format
    }

    /// Whole region, `row_stride * height` bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        let len = self.row_stride as usize * self.height as usize;
        &self.storage[self.offset..self.offset + len]
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let len = self.row_stride as usize * self.height as usize;
        &mut self.storage[self.offset..self.offset + len]
    }

    /// Meaningful bytes of row `y`, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "Row {} is out of bounds {}", y, self.height);
        let start = y as usize * self.row_stride as usize;
        &self.data()[start..start + self.row_bytes()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "Row {} is out of bounds {}", y, self.height);
        let start = y as usize * self.row_stride as usize;
        let row_bytes = self.row_bytes();
        &mut self.data_mut()[start..start + row_bytes]
    }

    /// Reads `(r, g, b)` of a pixel regardless of channel order.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let bpp = self.bytes_per_pixel();
        let px = &self.row(y)[x as usize * bpp..(x as usize + 1) * bpp];
        [
            px[self.format.get_r_channel_offset()],
            px[self.format.get_g_channel_offset()],
            px[self.format.get_b_channel_offset()],
        ]
    }
}

impl Debug for PixelBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .field("format", &self.format)
            .field("alignment", &self.alignment)
            .finish()
    }
}

impl Drop for PixelBuffer {
    fn drop(&mut self) {
        trace!(
            "Released buffer {:?} of {} bytes",
            self.id,
            self.storage.len()
        );
    }
}
