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
use crate::yuv_error::{
    check_overflow_v2, check_plane, AllocationError, MismatchedSize, YuvError,
};
use crate::yuv_support::YuvNVOrder;
use log::{trace, warn};

/// Borrowed, non-owning plane. For the interleaved chroma plane `width` counts CbCr pairs.
#[derive(Debug, Copy, Clone)]
pub struct PlaneRef<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub row_stride: u32,
}

#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub row_stride: u32,
}

#[inline]
fn check_bi_planar(
    luma: (usize, u32, u32, u32),
    chroma: (usize, u32, u32, u32),
    subsampling_x: u8,
    subsampling_y: u8,
) -> Result<(), YuvError> {
    if subsampling_x != 2 || subsampling_y != 2 {
        return Err(YuvError::UnsupportedFormat(format!(
            "chroma subsampling {}x{}, only 2x2 is supported",
            subsampling_x, subsampling_y
        )));
    }
    let (luma_len, luma_width, luma_height, luma_stride) = luma;
    let (chroma_len, chroma_width, chroma_height, chroma_stride) = chroma;
    if luma_width == 0 || luma_height == 0 {
        return Err(AllocationError::ZeroBaseSize.into());
    }
    let expected_width = luma_width.div_ceil(subsampling_x as u32);
    if chroma_width != expected_width {
        return Err(YuvError::DimensionMismatch(MismatchedSize {
            expected: expected_width as usize,
            received: chroma_width as usize,
        }));
    }
    let expected_height = luma_height.div_ceil(subsampling_y as u32);
    if chroma_height != expected_height {
        return Err(YuvError::DimensionMismatch(MismatchedSize {
            expected: expected_height as usize,
            received: chroma_height as usize,
        }));
    }
    check_plane(
        luma_len,
        luma_stride,
        luma_width,
        luma_height,
        1,
        YuvError::LumaPlaneSizeMismatch,
    )?;
    check_plane(
        chroma_len,
        chroma_stride,
        chroma_width,
        chroma_height,
        2,
        YuvError::ChromaPlaneSizeMismatch,
    )?;
    Ok(())
}

#[derive(Debug, Copy, Clone)]
/// Non-mutable representation of Bi-Planar YUV image
pub struct BiPlanarView<'a> {
    luma: PlaneRef<'a>,
    chroma: PlaneRef<'a>,
    subsampling_x: u8,
    subsampling_y: u8,
    order: YuvNVOrder,
}

impl<'a> BiPlanarView<'a> {
    pub fn new(
        luma: PlaneRef<'a>,
        chroma: PlaneRef<'a>,
        subsampling_x: u8,
        subsampling_y: u8,
        order: YuvNVOrder,
    ) -> Result<Self, YuvError> {
        check_bi_planar(
            (luma.data.len(), luma.width, luma.height, luma.row_stride),
            (chroma.data.len(), chroma.width, chroma.height, chroma.row_stride),
            subsampling_x,
            subsampling_y,
        )?;
        Ok(BiPlanarView {
            luma,
            chroma,
            subsampling_x,
            subsampling_y,
            order,
        })
    }

    #[inline]
    pub fn luma(&self) -> &PlaneRef<'a> {
        &self.luma
    }

    #[inline]
    pub fn chroma(&self) -> &PlaneRef<'a> {
        &self.chroma
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.luma.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.luma.height
    }

    #[inline]
    pub fn subsampling(&self) -> (u8, u8) {
        (self.subsampling_x, self.subsampling_y)
    }

    #[inline]
    pub fn order(&self) -> YuvNVOrder {
        self.order
    }
}

#[derive(Debug)]
/// Mutable representation of Bi-Planar YUV image
pub struct BiPlanarViewMut<'a> {
    luma: PlaneMut<'a>,
    chroma: PlaneMut<'a>,
    subsampling_x: u8,
    subsampling_y: u8,
    order: YuvNVOrder,
}

impl<'a> BiPlanarViewMut<'a> {
    pub fn new(
        luma: PlaneMut<'a>,
        chroma: PlaneMut<'a>,
        subsampling_x: u8,
        subsampling_y: u8,
        order: YuvNVOrder,
    ) -> Result<Self, YuvError> {
        check_bi_planar(
            (luma.data.len(), luma.width, luma.height, luma.row_stride),
            (chroma.data.len(), chroma.width, chroma.height, chroma.row_stride),
            subsampling_x,
            subsampling_y,
        )?;
        Ok(BiPlanarViewMut {
            luma,
            chroma,
            subsampling_x,
            subsampling_y,
            order,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.luma.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.luma.height
    }

    #[inline]
    pub fn order(&self) -> YuvNVOrder {
        self.order
    }

    #[inline]
    pub(crate) fn planes_mut(&mut self) -> (&mut PlaneMut<'a>, &mut PlaneMut<'a>) {
        (&mut self.luma, &mut self.chroma)
    }

    pub fn to_fixed(&self) -> BiPlanarView<'_> {
        BiPlanarView {
            luma: PlaneRef {
                data: &*self.luma.data,
                width: self.luma.width,
                height: self.luma.height,
                row_stride: self.luma.row_stride,
            },
            chroma: PlaneRef {
                data: &*self.chroma.data,
                width: self.chroma.width,
                height: self.chroma.height,
                row_stride: self.chroma.row_stride,
            },
            subsampling_x: self.subsampling_x,
            subsampling_y: self.subsampling_y,
            order: self.order,
        }
    }
}

/// Kind of exclusive access token requested from a [PlaneProvider].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaneAccess {
    ReadOnly,
    ReadWrite,
}

/// Source of lockable bi-planar memory, e.g. a hardware backed frame.
///
/// Plane addresses are only valid between [PlaneProvider::lock] and [PlaneProvider::unlock].
/// Prefer [acquire], which pairs them through [PlaneGuard].
pub trait PlaneProvider {
    fn lock(&mut self, access: PlaneAccess) -> Result<(), YuvError>;

    fn unlock(&mut self, access: PlaneAccess);

    fn planes(&self) -> Result<BiPlanarView<'_>, YuvError>;

    fn planes_mut(&mut self) -> Result<BiPlanarViewMut<'_>, YuvError>;
}

/// Holds the provider locked; unlocks it when dropped, on every exit path.
pub struct PlaneGuard<'a, P: PlaneProvider + ?Sized> {
    provider: &'a mut P,
    access: PlaneAccess,
}

impl<P: PlaneProvider + ?Sized> PlaneGuard<'_, P> {
    pub fn view(&self) -> Result<BiPlanarView<'_>, YuvError> {
        self.provider.planes()
    }

    pub fn view_mut(&mut self) -> Result<BiPlanarViewMut<'_>, YuvError> {
        if self.access != PlaneAccess::ReadWrite {
            return Err(YuvError::ReadOnlyAccess);
        }
        self.provider.planes_mut()
    }
}

impl<P: PlaneProvider + ?Sized> Drop for PlaneGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.unlock(self.access);
        trace!("Unlocked planes ({:?})", self.access);
    }
}

/// Locks `provider` and returns the guard owning the lock.
pub fn acquire<P: PlaneProvider + ?Sized>(
    provider: &mut P,
    access: PlaneAccess,
) -> Result<PlaneGuard<'_, P>, YuvError> {
    provider.lock(access)?;
    trace!("Locked planes ({:?})", access);
    Ok(PlaneGuard { provider, access })
}

/// In-memory NV12/NV21 frame that hands its planes out through the lock protocol.
#[derive(Debug)]
pub struct BiPlanarFrame {
    y_plane: Vec<u8>,
    y_stride: u32,
    uv_plane: Vec<u8>,
    uv_stride: u32,
    width: u32,
    height: u32,
    order: YuvNVOrder,
    lock: Option<PlaneAccess>,
    locks: u64,
    unlocks: u64,
}

impl BiPlanarFrame {
    /// Allocates frame with tightly packed 4:2:0 planes
    pub fn alloc(width: u32, height: u32, order: YuvNVOrder) -> Result<Self, AllocationError> {
        if width == 0 || height == 0 {
            return Err(AllocationError::ZeroBaseSize);
        }
        let chroma_width = width.div_ceil(2);
        let chroma_height = height.div_ceil(2);
        let uv_stride = chroma_width
            .checked_mul(2)
            .ok_or(AllocationError::PointerOverflow)?;
        let y_len = check_overflow_v2(width as usize, height as usize)?;
        let uv_len = check_overflow_v2(uv_stride as usize, chroma_height as usize)?;

        let mut y_plane = Vec::new();
        y_plane
            .try_reserve_exact(y_len)
            .map_err(|_| AllocationError::OutOfMemory(y_len))?;
        y_plane.resize(y_len, 0u8);
        let mut uv_plane = Vec::new();
        uv_plane
            .try_reserve_exact(uv_len)
            .map_err(|_| AllocationError::OutOfMemory(uv_len))?;
        uv_plane.resize(uv_len, 0u8);

        Ok(BiPlanarFrame {
            y_plane,
            y_stride: width,
            uv_plane,
            uv_stride,
            width,
            height,
            order,
            lock: None,
            locks: 0,
            unlocks: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn order(&self) -> YuvNVOrder {
        self.order
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Number of successful locks and of unlocks so far.
    #[inline]
    pub fn lock_counts(&self) -> (u64, u64) {
        (self.locks, self.unlocks)
    }
}

impl PlaneProvider for BiPlanarFrame {
    fn lock(&mut self, access: PlaneAccess) -> Result<(), YuvError> {
        if self.lock.is_some() {
            return Err(YuvError::PlanesLocked);
        }
        self.lock = Some(access);
        self.locks += 1;
        Ok(())
    }

    fn unlock(&mut self, access: PlaneAccess) {
        match self.lock.take() {
            Some(held) if held == access => {}
            held => warn!("Unlock with {:?} while lock was {:?}", access, held),
        }
        self.unlocks += 1;
    }

    fn planes(&self) -> Result<BiPlanarView<'_>, YuvError> {
        if self.lock.is_none() {
            return Err(YuvError::PlanesNotLocked);
        }
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
        match self.lock {
            None => return Err(YuvError::PlanesNotLocked),
            Some(PlaneAccess::ReadOnly) => return Err(YuvError::ReadOnlyAccess),
            Some(PlaneAccess::ReadWrite) => {}
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
