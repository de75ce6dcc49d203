//! Per-buffer orchestration: samples → spectrum → LED frame → sink.
//!
//! [`FramePipeline::process`] runs inside the audio engine's callback, one
//! buffer at a time. It owns every scratch buffer it touches, so a cycle
//! allocates nothing once the first buffer has been seen, takes no
//! locks, and never returns an error to the engine.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use cpal::{FromSample, Sample};

use crate::audio::SpectrumAnalyzer;
use crate::led::LedBuffer;
use crate::params::{buffer_period, AppConfig};
use crate::transport::TransportSink;
use crate::visualizer::{ActiveVisualizer, VisualizerBank};

/// Where the pipeline is within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PipelineState {
    /// No buffer in flight
    #[default]
    Idle,
    /// Spectral transform running on the current buffer
    Analyzing,
    /// Frame rendered, handing it to the sink
    Dispatching,
}

impl PipelineState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => PipelineState::Analyzing,
            2 => PipelineState::Dispatching,
            _ => PipelineState::Idle,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Analyzing => "analyzing",
            PipelineState::Dispatching => "dispatching",
        };
        f.write_str(name)
    }
}

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Frame handed to the sink
    Sent,
    /// Frame rendered but the sink rejected it
    SendFailed,
    /// Input was unusable; nothing rendered, nothing sent
    Skipped,
}

/// Cycle counters and current state, shared with whoever reports on the pipeline
#[derive(Debug, Default)]
pub struct PipelineStats {
    cycles: AtomicU64,
    frames_sent: AtomicU64,
    send_failures: AtomicU64,
    skipped_cycles: AtomicU64,
    deadline_overruns: AtomicU64,
    state: AtomicU8,
}

/// Point-in-time copy of [`PipelineStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub cycles: u64,
    pub frames_sent: u64,
    pub send_failures: u64,
    pub skipped_cycles: u64,
    pub deadline_overruns: u64,
    pub state: PipelineState,
}

impl PipelineStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            skipped_cycles: self.skipped_cycles.load(Ordering::Relaxed),
            deadline_overruns: self.deadline_overruns.load(Ordering::Relaxed),
            state: self.state(),
        }
    }

    /// State of the cycle in flight, readable from any thread
    pub fn state(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn enter(&self, state: PipelineState) {
        self.state.store(state as u8, Ordering::Release);
        tracing::trace!("Pipeline {}", state);
    }

    /// Bump `counter`, returning the previous value
    fn bump(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycles={} sent={} send_failures={} skipped={} overruns={} state={}",
            self.cycles,
            self.frames_sent,
            self.send_failures,
            self.skipped_cycles,
            self.deadline_overruns,
            self.state
        )
    }
}

/// The per-buffer orchestrator.
///
/// Owns the analyzer, one instance of every visualizer, the reusable LED
/// buffer and the sink. The active visualizer is read once at the top of
/// each cycle, so a switch from another thread takes effect on the next
/// buffer.
pub struct FramePipeline<A, S> {
    analyzer: A,
    sink: S,
    visualizers: VisualizerBank,
    active: ActiveVisualizer,

    leds: LedBuffer,
    /// Widened copy of the current input block
    samples: Vec<f64>,

    channels: usize,
    sample_rate_hz: u32,
    stats: Arc<PipelineStats>,
}

impl<A: SpectrumAnalyzer, S: TransportSink> FramePipeline<A, S> {
    /// Build a pipeline from validated startup configuration
    pub fn new(config: &AppConfig, analyzer: A, sink: S, active: ActiveVisualizer) -> Self {
        Self::with_stats(
            config,
            analyzer,
            sink,
            active,
            Arc::new(PipelineStats::default()),
        )
    }

    /// Like [`new`](Self::new), reporting into caller-owned `stats`
    pub fn with_stats(
        config: &AppConfig,
        analyzer: A,
        sink: S,
        active: ActiveVisualizer,
        stats: Arc<PipelineStats>,
    ) -> Self {
        stats.enter(PipelineState::Idle);
        Self {
            analyzer,
            sink,
            visualizers: VisualizerBank::new(&config.visualizer),
            active,
            leds: LedBuffer::new(config.strip.led_count),
            samples: Vec::with_capacity(config.capture.samples_per_buffer()),
            channels: config.capture.channels.max(1) as usize,
            sample_rate_hz: config.capture.sample_rate_hz,
            stats,
        }
    }

    /// Run one cycle on an interleaved sample block.
    ///
    /// Never fails: transform errors skip the cycle, sink errors are
    /// counted, and both are logged.
    pub fn process<T>(&mut self, input: &[T]) -> CycleOutcome
    where
        T: Sample,
        f64: FromSample<T>,
    {
        let started = Instant::now();
        let kind = self.active.get();
        PipelineStats::bump(&self.stats.cycles);

        self.stats.enter(PipelineState::Analyzing);
        self.samples.clear();
        self.samples
            .extend(input.iter().map(|&sample| f64::from_sample(sample)));

        let spectrum = match self.analyzer.analyze(&self.samples) {
            Ok(spectrum) => spectrum,
            Err(e) => {
                PipelineStats::bump(&self.stats.skipped_cycles);
                tracing::debug!("Skipping cycle: {}", e);
                self.stats.enter(PipelineState::Idle);
                return CycleOutcome::Skipped;
            }
        };

        self.visualizers.render(kind, spectrum, &mut self.leds);

        self.stats.enter(PipelineState::Dispatching);
        let outcome = match self.sink.send(self.leds.as_bytes()) {
            Ok(()) => {
                PipelineStats::bump(&self.stats.frames_sent);
                CycleOutcome::Sent
            }
            Err(e) => {
                if PipelineStats::bump(&self.stats.send_failures) == 0 {
                    tracing::warn!("Frame send failed: {} (further failures logged at debug)", e);
                } else {
                    tracing::debug!("Frame send failed: {}", e);
                }
                CycleOutcome::SendFailed
            }
        };

        let budget = buffer_period(input.len() / self.channels, self.sample_rate_hz);
        let elapsed = started.elapsed();
        if elapsed > budget {
            if PipelineStats::bump(&self.stats.deadline_overruns) == 0 {
                tracing::warn!(
                    "Cycle took {:?}, over its {:?} budget (further overruns logged at debug)",
                    elapsed,
                    budget
                );
            } else {
                tracing::debug!("Cycle overran: {:?} > {:?}", elapsed, budget);
            }
        }

        self.stats.enter(PipelineState::Idle);
        outcome
    }

    pub fn state(&self) -> PipelineState {
        self.stats.state()
    }

    /// Counters shared with reporting threads
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Handle for switching the visualizer from another thread
    pub fn active(&self) -> ActiveVisualizer {
        self.active.clone()
    }

    /// Most recently rendered frame
    pub fn leds(&self) -> &LedBuffer {
        &self.leds
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }
}
