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
use crate::yuv_error::ProfileError;
use log::debug;

/// Which way a [ConversionMatrix] converts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    YuvToRgb,
    RgbToYuv,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
/// Declares standard prebuilt YUV conversion matrices, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) information for more info
pub enum YuvStandardMatrix {
    Bt601,
    Bt709,
    Bt2020,
    Smpte240,
    Bt470_6,
    /// Custom parameters first goes for kr, second for kb.
    /// Matrix construction fails if 1.0f32 - kr - kb == 0
    Custom(f32, f32),
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvBias {
    pub kr: f32,
    pub kb: f32,
}

impl YuvStandardMatrix {
    pub const fn get_kr_kb(self) -> YuvBias {
        match self {
            YuvStandardMatrix::Bt601 => YuvBias {
                kr: 0.299f32,
                kb: 0.114f32,
            },
            YuvStandardMatrix::Bt709 => YuvBias {
                kr: 0.2126f32,
                kb: 0.0722f32,
            },
            YuvStandardMatrix::Bt2020 => YuvBias {
                kr: 0.2627f32,
                kb: 0.0593f32,
            },
            YuvStandardMatrix::Smpte240 => YuvBias {
                kr: 0.087f32,
                kb: 0.212f32,
            },
            YuvStandardMatrix::Bt470_6 => YuvBias {
                kr: 0.2220f32,
                kb: 0.0713f32,
            },
            YuvStandardMatrix::Custom(kr, kb) => YuvBias { kr, kb },
        }
    }
}

/// Named table of code-value bounds and biases for 8-bit luma/chroma.
///
/// The bias is subtracted before the linear transform when decoding to RGB
/// and added after it when encoding to YUV. Encoded values are clamped into
/// `[min, max]` of their channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConversionProfile {
    pub name: &'static str,
    pub matrix: YuvStandardMatrix,
    pub luma_min: u8,
    pub luma_max: u8,
    pub luma_bias: u8,
    pub chroma_min: u8,
    pub chroma_max: u8,
    pub chroma_bias: u8,
}

impl ConversionProfile {
    /// Limited range Y ∈ [16, 235], CbCr ∈ [16, 240]
    pub const fn video_range(name: &'static str, matrix: YuvStandardMatrix) -> Self {
        ConversionProfile {
            name,
            matrix,
            luma_min: 16,
            luma_max: 235,
            luma_bias: 16,
            chroma_min: 16,
            chroma_max: 240,
            chroma_bias: 128,
        }
    }

    /// Full range Y ∈ [0, 255], CbCr ∈ [0, 255]
    pub const fn full_range(name: &'static str, matrix: YuvStandardMatrix) -> Self {
        ConversionProfile {
            name,
            matrix,
            luma_min: 0,
            luma_max: 255,
            luma_bias: 0,
            chroma_min: 0,
            chroma_max: 255,
            chroma_bias: 128,
        }
    }

    pub const VIDEO_RANGE_BT709: ConversionProfile =
        ConversionProfile::video_range("video-range BT.709", YuvStandardMatrix::Bt709);
    pub const FULL_RANGE_BT709: ConversionProfile =
        ConversionProfile::full_range("full-range BT.709", YuvStandardMatrix::Bt709);
    pub const VIDEO_RANGE_BT601: ConversionProfile =
        ConversionProfile::video_range("video-range BT.601", YuvStandardMatrix::Bt601);
    pub const FULL_RANGE_BT601: ConversionProfile =
        ConversionProfile::full_range("full-range BT.601", YuvStandardMatrix::Bt601);
    pub const VIDEO_RANGE_BT2020: ConversionProfile =
        ConversionProfile::video_range("video-range BT.2020", YuvStandardMatrix::Bt2020);

    /// Zero when the bounds are inverted.
    #[inline]
    pub const fn range_y(&self) -> u32 {
        (self.luma_max as u32).saturating_sub(self.luma_min as u32)
    }

    #[inline]
    pub const fn range_uv(&self) -> u32 {
        (self.chroma_max as u32).saturating_sub(self.chroma_min as u32)
    }

    fn validate(&self, direction: Direction) -> Result<(), ProfileError> {
        if self.luma_max <= self.luma_min {
            return Err(ProfileError::DegenerateLumaRange {
                min: self.luma_min,
                max: self.luma_max,
            });
        }
        if self.chroma_max <= self.chroma_min {
            return Err(ProfileError::DegenerateChromaRange {
                min: self.chroma_min,
                max: self.chroma_max,
            });
        }
        // A bias outside of its clamp window is not representable in 8 bits.
        if !(self.luma_min..=self.luma_max).contains(&self.luma_bias)
            || !(self.chroma_min..=self.chroma_max).contains(&self.chroma_bias)
        {
            return Err(ProfileError::Unsupported {
                profile: self.name,
                direction,
            });
        }
        Ok(())
    }
}

impl Default for ConversionProfile {
    fn default() -> Self {
        ConversionProfile::VIDEO_RANGE_BT709
    }
}

/// Immutable 3x3 transform with its additive offsets and per-channel clamp bounds.
///
/// For [Direction::YuvToRgb] the columns are `(Y, Cb, Cr)` and the rows `(R, G, B)`,
/// offsets are subtracted from the input. For [Direction::RgbToYuv] the columns are
/// `(R, G, B)` and the rows `(Y, Cb, Cr)`, offsets are added to the output.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConversionMatrix {
    coefficients: [[f64; 3]; 3],
    offsets: [f64; 3],
    clamp: [(f64, f64); 3],
    direction: Direction,
    profile: ConversionProfile,
}

impl ConversionMatrix {
    /// Derives coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en),
    /// scaled by the ratio of the usable code range of `profile` to the full 8-bit range.
    pub fn build(profile: ConversionProfile, direction: Direction) -> Result<Self, ProfileError> {
        profile.validate(direction)?;
        let kr_kb = profile.matrix.get_kr_kb();
        let kr = kr_kb.kr as f64;
        let kb = kr_kb.kb as f64;
        let kg = 1f64 - kr - kb;
        if kg.abs() <= f64::EPSILON
            || (1f64 - kr).abs() <= f64::EPSILON
            || (1f64 - kb).abs() <= f64::EPSILON
        {
            return Err(ProfileError::DegenerateMatrix {
                kr: kr_kb.kr,
                kb: kr_kb.kb,
            });
        }

        let range_y = profile.range_y() as f64;
        let range_uv = profile.range_uv() as f64;
        let offsets = [
            profile.luma_bias as f64,
            profile.chroma_bias as f64,
            profile.chroma_bias as f64,
        ];

        let (coefficients, clamp) = match direction {
            Direction::YuvToRgb => {
                let y_coef = 255f64 / range_y;
                let uv_scale = 255f64 / range_uv;
                let cr_coef = 2f64 * (1f64 - kr) * uv_scale;
                let cb_coef = 2f64 * (1f64 - kb) * uv_scale;
                let g_coef_1 = 2f64 * ((1f64 - kr) * kr / kg) * uv_scale;
                let g_coef_2 = 2f64 * ((1f64 - kb) * kb / kg) * uv_scale;
                (
                    [
                        [y_coef, 0f64, cr_coef],
                        [y_coef, -g_coef_2, -g_coef_1],
                        [y_coef, cb_coef, 0f64],
                    ],
                    [(0f64, 255f64); 3],
                )
            }
            Direction::RgbToYuv => {
                let y_scale = range_y / 255f64;
                let uv_scale = range_uv / 255f64;
                (
                    [
                        [kr * y_scale, kg * y_scale, kb * y_scale],
                        [
                            -0.5f64 * kr / (1f64 - kb) * uv_scale,
                            -0.5f64 * kg / (1f64 - kb) * uv_scale,
                            0.5f64 * uv_scale,
                        ],
                        [
                            0.5f64 * uv_scale,
                            -0.5f64 * kg / (1f64 - kr) * uv_scale,
                            -0.5f64 * kb / (1f64 - kr) * uv_scale,
                        ],
                    ],
                    [
                        (profile.luma_min as f64, profile.luma_max as f64),
                        (profile.chroma_min as f64, profile.chroma_max as f64),
                        (profile.chroma_min as f64, profile.chroma_max as f64),
                    ],
                )
            }
        };

        debug!(
            "Built {:?} matrix for profile {}: {:?}",
            direction, profile.name, coefficients
        );

        Ok(ConversionMatrix {
            coefficients,
            offsets,
            clamp,
            direction,
            profile,
        })
    }

    #[inline]
    pub fn coefficients(&self) -> &[[f64; 3]; 3] {
        &self.coefficients
    }

    #[inline]
    pub fn offsets(&self) -> [f64; 3] {
        self.offsets
    }

    #[inline]
    pub fn clamp_bounds(&self) -> [(f64, f64); 3] {
        self.clamp
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn profile(&self) -> &ConversionProfile {
        &self.profile
    }

    /// Converts a single triple in floating point, rounding to nearest and clamping.
    pub fn apply(&self, input: [u8; 3]) -> [u8; 3] {
        let mut v = [0f64; 3];
        for (dst, &src) in v.iter_mut().zip(input.iter()) {
            *dst = src as f64;
        }
        if self.direction == Direction::YuvToRgb {
            for (dst, offset) in v.iter_mut().zip(self.offsets) {
                *dst -= offset;
            }
        }
        let mut out = [0u8; 3];
        for (i, row) in self.coefficients.iter().enumerate() {
            let mut acc = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
            if self.direction == Direction::RgbToYuv {
                acc += self.offsets[i];
            }
            let (min, max) = self.clamp[i];
            out[i] = crate::numerics::round_clamp::<u8>(acc, min, max);
        }
        out
    }

    /// Coefficients scaled by `2^precision`, `precision` must stay below 48.
    pub fn to_integers(&self, precision: u32) -> IntegerMatrix {
        let scale = (1i64 << precision) as f64;
        let mut coefficients = [[0i64; 3]; 3];
        for (dst_row, src_row) in coefficients.iter_mut().zip(self.coefficients.iter()) {
            for (dst, &src) in dst_row.iter_mut().zip(src_row.iter()) {
                *dst = (src * scale).round() as i64;
            }
        }
        IntegerMatrix {
            coefficients,
            bias_y: self.profile.luma_bias as i32,
            bias_uv: self.profile.chroma_bias as i32,
            clamp: [
                (self.clamp[0].0 as i32, self.clamp[0].1 as i32),
                (self.clamp[1].0 as i32, self.clamp[1].1 as i32),
                (self.clamp[2].0 as i32, self.clamp[2].1 as i32),
            ],
            precision: precision as i32,
        }
    }
}

/// Fixed point form of a [ConversionMatrix] used by the row kernels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntegerMatrix {
    pub coefficients: [[i64; 3]; 3],
    pub bias_y: i32,
    pub bias_uv: i32,
    pub clamp: [(i32, i32); 3],
    pub precision: i32,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum YuvNVOrder {
    /// NV12, Cb first
    #[default]
    UV = 0,
    /// NV21, Cr first
    VU = 1,
}

impl YuvNVOrder {
    #[inline(always)]
    pub const fn get_u_position(&self) -> usize {
        match self {
            YuvNVOrder::UV => 0,
            YuvNVOrder::VU => 1,
        }
    }
    #[inline(always)]
    pub const fn get_v_position(&self) -> usize {
        match self {
            YuvNVOrder::UV => 1,
            YuvNVOrder::VU => 0,
        }
    }
}

impl From<u8> for YuvNVOrder {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvNVOrder::UV,
            1 => YuvNVOrder::VU,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

/// Channel layout of a packed 8-bit RGB raster.
///
/// `X` marks a padding byte: it is never written by the decoder and never read by the encoder.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RgbPixelFormat {
    Rgb = 0,
    Bgr = 1,
    Rgba = 2,
    Bgra = 3,
    Argb = 4,
    Xrgb = 5,
    Rgbx = 6,
    Bgrx = 7,
}

impl From<u8> for RgbPixelFormat {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => RgbPixelFormat::Rgb,
            1 => RgbPixelFormat::Bgr,
            2 => RgbPixelFormat::Rgba,
            3 => RgbPixelFormat::Bgra,
            4 => RgbPixelFormat::Argb,
            5 => RgbPixelFormat::Xrgb,
            6 => RgbPixelFormat::Rgbx,
            7 => RgbPixelFormat::Bgrx,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl RgbPixelFormat {
    #[inline(always)]
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            RgbPixelFormat::Rgb | RgbPixelFormat::Bgr => 3,
            _ => 4,
        }
    }

    #[inline(always)]
    pub const fn has_alpha(&self) -> bool {
        matches!(
            self,
            RgbPixelFormat::Rgba | RgbPixelFormat::Bgra | RgbPixelFormat::Argb
        )
    }

    #[inline(always)]
    pub const fn get_r_channel_offset(&self) -> usize {
        match self {
            RgbPixelFormat::Rgb | RgbPixelFormat::Rgba | RgbPixelFormat::Rgbx => 0,
            RgbPixelFormat::Bgr | RgbPixelFormat::Bgra | RgbPixelFormat::Bgrx => 2,
            RgbPixelFormat::Argb | RgbPixelFormat::Xrgb => 1,
        }
    }

    #[inline(always)]
    pub const fn get_g_channel_offset(&self) -> usize {
        match self {
            RgbPixelFormat::Argb | RgbPixelFormat::Xrgb => 2,
            _ => 1,
        }
    }

    #[inline(always)]
    pub const fn get_b_channel_offset(&self) -> usize {
        match self {
            RgbPixelFormat::Rgb | RgbPixelFormat::Rgba | RgbPixelFormat::Rgbx => 2,
            RgbPixelFormat::Bgr | RgbPixelFormat::Bgra | RgbPixelFormat::Bgrx => 0,
            RgbPixelFormat::Argb | RgbPixelFormat::Xrgb => 3,
        }
    }

    #[inline(always)]
    pub const fn get_a_channel_offset(&self) -> usize {
        match self {
            RgbPixelFormat::Argb | RgbPixelFormat::Xrgb => 0,
            RgbPixelFormat::Rgb | RgbPixelFormat::Bgr => 0,
            _ => 3,
        }
    }
}
