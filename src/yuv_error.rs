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
use crate::yuv_support::Direction;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

/// Failure to obtain backing memory for a [PixelBuffer](crate::PixelBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    ZeroBaseSize,
    PointerOverflow,
    InvalidAlignment(usize),
    OutOfMemory(usize),
}

impl Display for AllocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            AllocationError::PointerOverflow => {
                f.write_str("Image size overflow pointer capabilities")
            }
            AllocationError::InvalidAlignment(alignment) => f.write_fmt(format_args!(
                "Alignment must be a non-zero power of two, but it was {}",
                alignment
            )),
            AllocationError::OutOfMemory(bytes) => {
                f.write_fmt(format_args!("Unable to reserve {} bytes", bytes))
            }
        }
    }
}

impl Error for AllocationError {}

/// Pixel range table cannot produce a conversion matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    DegenerateLumaRange { min: u8, max: u8 },
    DegenerateChromaRange { min: u8, max: u8 },
    DegenerateMatrix { kr: f32, kb: f32 },
    Unsupported {
        profile: &'static str,
        direction: Direction,
    },
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::DegenerateLumaRange { min, max } => f.write_fmt(format_args!(
                "Luma range is degenerate: max {} must be greater than min {}",
                max, min
            )),
            ProfileError::DegenerateChromaRange { min, max } => f.write_fmt(format_args!(
                "Chroma range is degenerate: max {} must be greater than min {}",
                max, min
            )),
            ProfileError::DegenerateMatrix { kr, kb } => f.write_fmt(format_args!(
                "Matrix with kr={} and kb={} has no green contribution",
                kr, kb
            )),
            ProfileError::Unsupported { profile, direction } => f.write_fmt(format_args!(
                "Profile {} is not supported for {:?}",
                profile, direction
            )),
        }
    }
}

impl Error for ProfileError {}

#[derive(Debug)]
pub enum YuvError {
    Allocation(AllocationError),
    Profile(ProfileError),
    DimensionMismatch(MismatchedSize),
    LumaPlaneSizeMismatch(MismatchedSize),
    ChromaPlaneSizeMismatch(MismatchedSize),
    BufferSizeMismatch(MismatchedSize),
    UnsupportedFormat(String),
    PlanesLocked,
    PlanesNotLocked,
    ReadOnlyAccess,
    Decode(Box<dyn Error + Send + Sync>),
}

impl Display for YuvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvError::Allocation(err) => f.write_fmt(format_args!("Allocation failed: {}", err)),
            YuvError::Profile(err) => f.write_fmt(format_args!("Invalid profile: {}", err)),
            YuvError::DimensionMismatch(size) => f.write_fmt(format_args!(
                "Dimension mismatch: expected={}, received={}",
                size.expected, size.received
            )),
            YuvError::LumaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::ChromaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::BufferSizeMismatch(size) => f.write_fmt(format_args!(
                "Buffer must have size at least {} but it is {}",
                size.expected, size.received
            )),
            YuvError::UnsupportedFormat(what) => {
                f.write_fmt(format_args!("Unsupported format: {}", what))
            }
            YuvError::PlanesLocked => f.write_str("Planes are already locked"),
            YuvError::PlanesNotLocked => f.write_str("Planes must be locked before access"),
            YuvError::ReadOnlyAccess => f.write_str("Planes were locked for reading only"),
            YuvError::Decode(err) => f.write_fmt(format_args!("Decoding failed: {}", err)),
        }
    }
}

impl Error for YuvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            YuvError::Allocation(err) => Some(err),
            YuvError::Profile(err) => Some(err),
            YuvError::Decode(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<AllocationError> for YuvError {
    fn from(value: AllocationError) -> Self {
        YuvError::Allocation(value)
    }
}

impl From<ProfileError> for YuvError {
    fn from(value: ProfileError) -> Self {
        YuvError::Profile(value)
    }
}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<usize, AllocationError> {
    v0.checked_mul(v1).ok_or(AllocationError::PointerOverflow)
}

#[inline]
pub(crate) fn check_dimension(expected: u32, received: u32) -> Result<(), YuvError> {
    if expected != received {
        return Err(YuvError::DimensionMismatch(MismatchedSize {
            expected: expected as usize,
            received: received as usize,
        }));
    }
    Ok(())
}

/// Verifies a strided plane of `width * components` meaningful bytes per row.
#[inline]
pub(crate) fn check_plane(
    data_len: usize,
    stride: u32,
    width: u32,
    height: u32,
    components: usize,
    on_mismatch: fn(MismatchedSize) -> YuvError,
) -> Result<(), YuvError> {
    let row_bytes = check_overflow_v2(width as usize, components)?;
    if (stride as usize) < row_bytes {
        return Err(on_mismatch(MismatchedSize {
            expected: row_bytes,
            received: stride as usize,
        }));
    }
    let required = check_overflow_v2(stride as usize, height as usize)?;
    if data_len < required {
        return Err(on_mismatch(MismatchedSize {
            expected: required,
            received: data_len,
        }));
    }
    Ok(())
}
