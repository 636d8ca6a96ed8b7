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
mod support;

use log::error;
use std::process::ExitCode;
use std::time::Instant;
use support::{FileImageDecoder, PngSink};
use yuvpipe::{ConversionPipeline, PipelineOptions, Presenter};

fn main() -> ExitCode {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "./assets/bench.jpg".to_string());
    let output = args.next().unwrap_or_else(|| "converted.png".to_string());

    let presenter = match Presenter::spawn(PngSink::new(output)) {
        Ok(presenter) => presenter,
        Err(err) => {
            error!("Cannot start presenter: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut pipeline =
        match ConversionPipeline::new(PipelineOptions::default().with_alignment(64)) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                error!("Cannot build pipeline: {}", err);
                return ExitCode::FAILURE;
            }
        };

    let start_time = Instant::now();
    let result = pipeline.run(&mut FileImageDecoder, &input, &presenter);
    println!("Pipeline time: {:?}", start_time.elapsed());

    // Wait for the sink to finish writing
    drop(presenter);
    println!("{:?}", pipeline.shutdown());

    match result {
        Ok(id) => {
            println!("Presented {:?}", id);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Conversion of {} failed: {}", input, err);
            ExitCode::FAILURE
        }
    }
}
