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
//! Bi-planar 4:2:0 YUV and packed RGB conversion pipeline.
//!
//! Rasters are encoded into NV12/NV21 planes and decoded back into a reusable,
//! optionally aligned destination which is then handed to a [DisplaySink] through a
//! [Presenter] thread. Enable the `rayon` feature to convert rows in parallel.
mod buffer;
mod images;
mod lifecycle;
mod numerics;
mod pipeline;
mod presenter;
mod rgba_to_nv;
mod yuv_error;
mod yuv_nv_to_rgba;
mod yuv_support;

pub use buffer::BufferId;
pub use buffer::PixelBuffer;

pub use images::acquire;
pub use images::BiPlanarFrame;
pub use images::BiPlanarView;
pub use images::BiPlanarViewMut;
pub use images::PlaneAccess;
pub use images::PlaneGuard;
pub use images::PlaneMut;
pub use images::PlaneProvider;
pub use images::PlaneRef;

pub use yuv_support::ConversionMatrix;
pub use yuv_support::ConversionProfile;
pub use yuv_support::Direction;
pub use yuv_support::IntegerMatrix;
pub use yuv_support::RgbPixelFormat;
pub use yuv_support::YuvBias;
pub use yuv_support::YuvNVOrder;
pub use yuv_support::YuvStandardMatrix;

pub use yuv_error::AllocationError;
pub use yuv_error::MismatchedSize;
pub use yuv_error::ProfileError;
pub use yuv_error::YuvError;

pub use rgba_to_nv::rgbx_to_yuv_nv420;
pub use yuv_nv_to_rgba::yuv_nv420_to_rgbx;

pub use lifecycle::ensure_destination;
pub use lifecycle::BufferLifecycleManager;
pub use lifecycle::LifecycleStats;

pub use presenter::DisplaySink;
pub use presenter::Presenter;

pub use pipeline::ConversionPipeline;
pub use pipeline::ImageDecoder;
pub use pipeline::PipelineOptions;
