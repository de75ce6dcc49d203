//! WAV replay: drives the pipeline from a file instead of a live device.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use super::SpectrumAnalyzer;
use crate::error::{Error, Result};
use crate::params::{buffer_period, CaptureConfig};
use crate::pipeline::FramePipeline;
use crate::transport::TransportSink;

/// Decoded WAV file, replayed one buffer at a time
pub struct WavReplay {
    samples: Vec<f32>,
    channels: u16,
    sample_rate_hz: u32,
    realtime: bool,
}

impl WavReplay {
    /// Decode the whole file; integer formats are scaled to [-1, 1]
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(Error::Config(format!(
                "{} has no usable audio ({} ch @ {}Hz)",
                path.display(),
                spec.channels,
                spec.sample_rate
            )));
        }

        tracing::info!(
            "Replay: {} ({} ch @ {}Hz, {:.1}s)",
            path.display(),
            spec.channels,
            spec.sample_rate,
            samples.len() as f64 / spec.channels as f64 / spec.sample_rate as f64
        );

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate_hz: spec.sample_rate,
            realtime: true,
        })
    }

    /// Pace buffers at the file's sample rate (default) or run flat out
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / self.channels as usize;
        buffer_period(frames, self.sample_rate_hz)
    }

    /// Make the capture settings describe this file
    pub fn apply_to(&self, capture: &mut CaptureConfig) {
        if capture.sample_rate_hz != self.sample_rate_hz || capture.channels != self.channels {
            tracing::info!(
                "Replay overrides audio settings: {} ch @ {}Hz -> {} ch @ {}Hz",
                capture.channels,
                capture.sample_rate_hz,
                self.channels,
                self.sample_rate_hz
            );
        }
        capture.sample_rate_hz = self.sample_rate_hz;
        capture.channels = self.channels;
    }

    /// Feed the file through `pipeline` until it ends or `stop` is set.
    ///
    /// Buffers are `capture.frames_per_buffer` frames long and, when
    /// pacing, one `capture.buffer_period()` apart; `capture` should have
    /// been through [`apply_to`](Self::apply_to). Returns the number of
    /// buffers processed. The last buffer may be short.
    pub fn run<A, S>(
        &self,
        pipeline: &mut FramePipeline<A, S>,
        capture: &CaptureConfig,
        stop: &AtomicBool,
    ) -> usize
    where
        A: SpectrumAnalyzer,
        S: TransportSink,
    {
        let block = (capture.frames_per_buffer as usize).max(1) * self.channels as usize;
        let period = capture.buffer_period();
        let started = Instant::now();
        let mut buffers = 0;

        for chunk in self.samples.chunks(block) {
            if stop.load(Ordering::Relaxed) {
                tracing::debug!("Replay stopped after {} buffers", buffers);
                break;
            }

            pipeline.process(chunk);
            buffers += 1;

            if self.realtime {
                // Sleep to the next buffer boundary so the frame rate matches live capture
                let deadline = started + period * buffers as u32;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
            }
        }

        buffers
    }

    /// Run the replay on its own thread, reporting the buffer count on `done`
    pub fn spawn<A, S>(
        self,
        mut pipeline: FramePipeline<A, S>,
        capture: CaptureConfig,
        stop: Arc<AtomicBool>,
        done: Sender<usize>,
    ) -> Result<JoinHandle<()>>
    where
        A: SpectrumAnalyzer + 'static,
        S: TransportSink + 'static,
    {
        let handle = thread::Builder::new()
            .name("wav-replay".to_string())
            .spawn(move || {
                let buffers = self.run(&mut pipeline, &capture, &stop);
                tracing::info!("Replay finished: {} buffers", buffers);
                // Receiver may already be gone on shutdown
                let _ = done.send(buffers);
            })?;
        Ok(handle)
    }
}
