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
use log::{debug, trace, warn};
use std::sync::mpsc::{channel, SendError, Sender};
use std::thread::JoinHandle;

/// Receiver of completed rasters, e.g. a window or an encoder.
pub trait DisplaySink: Send {
    fn present(&mut self, raster: PixelBuffer);
}

impl<F> DisplaySink for F
where
    F: FnMut(PixelBuffer) + Send,
{
    fn present(&mut self, raster: PixelBuffer) {
        self(raster)
    }
}

/// Hands rasters to a [DisplaySink] running on its own thread.
///
/// Submission never blocks on the sink. Dropping the presenter closes the queue,
/// lets the sink drain what was already submitted and joins the thread.
pub struct Presenter {
    sender: Option<Sender<PixelBuffer>>,
    worker: Option<JoinHandle<()>>,
}

impl Presenter {
    pub fn spawn<S: DisplaySink + 'static>(mut sink: S) -> std::io::Result<Presenter> {
        let (sender, receiver) = channel::<PixelBuffer>();
        let worker = std::thread::Builder::new()
            .name("yuvpipe-presenter".to_string())
            .spawn(move || {
                for raster in receiver {
                    trace!("Presenting {:?}", raster.id());
                    sink.present(raster);
                }
                debug!("Presenter queue closed");
            })?;
        Ok(Presenter {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queues `raster` for presentation; it is dropped with a warning when the sink is gone.
    pub fn submit(&self, raster: PixelBuffer) {
        if let Some(sender) = &self.sender {
            if let Err(SendError(raster)) = sender.send(raster) {
                warn!(
                    "Presenter thread has stopped, dropping raster {:?}",
                    raster.id()
                );
            }
        }
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Presenter thread panicked");
            }
        }
    }
}
