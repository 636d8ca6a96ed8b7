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
use crate::yuv_error::AllocationError;
use crate::yuv_support::RgbPixelFormat;
use log::debug;

/// Returns `current` when it already has the requested geometry, otherwise releases it
/// and allocates a fresh buffer.
pub fn ensure_destination(
    current: Option<PixelBuffer>,
    width: u32,
    height: u32,
    format: RgbPixelFormat,
    alignment: usize,
) -> Result<PixelBuffer, AllocationError> {
    match current {
        Some(buffer) if buffer.matches(width, height, format) && buffer.alignment() == alignment => {
            debug!("Reusing destination {:?}", buffer.id());
            Ok(buffer)
        }
        Some(buffer) => {
            debug!(
                "Destination {:?} is {}x{} {:?}, requested {}x{} {:?}, reallocating",
                buffer.id(),
                buffer.width(),
                buffer.height(),
                buffer.format(),
                width,
                height,
                format
            );
            buffer.release();
            PixelBuffer::allocate(width, height, format, alignment)
        }
        None => PixelBuffer::allocate(width, height, format, alignment),
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub allocations: u64,
    pub reuses: u64,
    pub releases: u64,
}

/// Owns the single reusable destination raster.
///
/// Every buffer it allocates is released exactly once: on reallocation, on
/// [BufferLifecycleManager::release_all] or when the manager is dropped.
#[derive(Debug)]
pub struct BufferLifecycleManager {
    alignment: usize,
    destination: Option<PixelBuffer>,
    stats: LifecycleStats,
}

impl BufferLifecycleManager {
    pub fn new(alignment: usize) -> Result<Self, AllocationError> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(AllocationError::InvalidAlignment(alignment));
        }
        Ok(BufferLifecycleManager {
            alignment,
            destination: None,
            stats: LifecycleStats::default(),
        })
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Destination for a frame of the given geometry, reused across calls while it fits.
    pub fn destination(
        &mut self,
        width: u32,
        height: u32,
        format: RgbPixelFormat,
    ) -> Result<&mut PixelBuffer, AllocationError> {
        let current = self.destination.take();
        let previous = current.as_ref().map(|buffer| buffer.id());
        let buffer = match ensure_destination(current, width, height, format, self.alignment) {
            Ok(buffer) => buffer,
            Err(err) => {
                if previous.is_some() {
                    self.stats.releases += 1;
                }
                return Err(err);
            }
        };
        if previous == Some(buffer.id()) {
            self.stats.reuses += 1;
        } else {
            if previous.is_some() {
                self.stats.releases += 1;
            }
            self.stats.allocations += 1;
        }
        Ok(self.destination.insert(buffer))
    }

    #[inline]
    pub fn current(&self) -> Option<&PixelBuffer> {
        self.destination.as_ref()
    }

    /// Hands the owned destination to the caller, who becomes responsible for releasing it.
    pub fn take_destination(&mut self) -> Option<PixelBuffer> {
        self.destination.take()
    }

    #[inline]
    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    pub fn release_all(&mut self) {
        if let Some(buffer) = self.destination.take() {
            debug!("Releasing destination {:?}", buffer.id());
            buffer.release();
            self.stats.releases += 1;
        }
    }
}

impl Drop for BufferLifecycleManager {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_destination_is_reused() {
        let first = PixelBuffer::allocate(8, 4, RgbPixelFormat::Xrgb, 1).unwrap();
        let id = first.id();
        let second = ensure_destination(Some(first), 8, 4, RgbPixelFormat::Xrgb, 1).unwrap();
        assert_eq!(second.id(), id);
    }

    #[test]
    fn changed_geometry_reallocates() {
        let first = PixelBuffer::allocate(8, 4, RgbPixelFormat::Xrgb, 1).unwrap();
        let id = first.id();
        let second = ensure_destination(Some(first), 8, 6, RgbPixelFormat::Xrgb, 1).unwrap();
        assert_ne!(second.id(), id);
        assert_eq!((second.width(), second.height()), (8, 6));
        let third = ensure_destination(Some(second), 8, 6, RgbPixelFormat::Bgra, 1).unwrap();
        assert_eq!(third.format(), RgbPixelFormat::Bgra);
    }

    #[test]
    fn zero_width_is_an_allocation_error() {
        assert_eq!(
            ensure_destination(None, 0, 4, RgbPixelFormat::Xrgb, 1).unwrap_err(),
            AllocationError::ZeroBaseSize
        );
    }

    #[test]
    fn manager_counts_every_decision() {
        let mut manager = BufferLifecycleManager::new(16).unwrap();
        let id = manager.destination(4, 4, RgbPixelFormat::Xrgb).unwrap().id();
        assert_eq!(
            manager.destination(4, 4, RgbPixelFormat::Xrgb).unwrap().id(),
            id
        );
        let resized = manager.destination(6, 4, RgbPixelFormat::Xrgb).unwrap();
        assert_ne!(resized.id(), id);
        assert_eq!(resized.row_stride(), 32);
        assert_eq!(
            manager.stats(),
            LifecycleStats {
                allocations: 2,
                reuses: 1,
                releases: 1,
            }
        );
        manager.release_all();
        manager.release_all();
        assert!(manager.current().is_none());
        assert_eq!(manager.stats().releases, 2);
    }

    #[test]
    fn failed_reallocation_still_releases_previous() {
        let mut manager = BufferLifecycleManager::new(1).unwrap();
        manager.destination(4, 4, RgbPixelFormat::Rgba).unwrap();
        assert!(manager.destination(0, 4, RgbPixelFormat::Rgba).is_err());
        assert!(manager.current().is_none());
        assert_eq!(manager.stats().releases, 1);
    }

    #[test]
    fn taken_destination_is_not_released_by_manager() {
        let mut manager = BufferLifecycleManager::new(1).unwrap();
        manager.destination(2, 2, RgbPixelFormat::Rgba).unwrap();
        let taken = manager.take_destination().unwrap();
        manager.release_all();
        assert_eq!(manager.stats().releases, 0);
        assert_eq!(taken.width(), 2);
    }

    #[test]
    fn invalid_alignment_is_rejected() {
        assert_eq!(
            BufferLifecycleManager::new(12).unwrap_err(),
            AllocationError::InvalidAlignment(12)
        );
    }
}
