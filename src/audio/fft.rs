//! FFT bar analyzer.
//!
//! Turns interleaved sample blocks into a fixed number of log-spaced
//! frequency bars plus a running normalisation ceiling. All buffers are
//! sized at construction; [`BarAnalyzer::analyze`] never allocates.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::ops::Range;
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::params::AnalyzerConfig;
use crate::spectrum::{channel_range, Spectrum};

/// Weight of the newest frame maximum in `average_max`
const AVERAGE_MAX_RATE: f64 = 0.1;

/// `average_max` never drops below this
const AVERAGE_MAX_FLOOR: f64 = 1e-6;

/// Spectral transform consumed by the frame pipeline
pub trait SpectrumAnalyzer: Send {
    /// Analyze one interleaved block and return the updated spectrum
    fn analyze(&mut self, samples: &[f64]) -> Result<&Spectrum, AnalysisError>;

    fn bar_count(&self) -> usize;
}

/// Windowed-FFT analyzer with per-channel bar groups.
///
/// Stereo input yields left-channel bars first, then right-channel bars,
/// each running low to high frequency.
pub struct BarAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    config: AnalyzerConfig,
    channels: usize,

    /// Per-channel ring buffers of `fft_size` samples
    rings: Vec<Vec<f64>>,
    write_pos: usize,

    window: Vec<f64>,
    /// Undoes the window's gain so a full-scale sine reads ≈ 1.0
    magnitude_scale: f64,
    fft_buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,

    /// FFT bin range of each bar
    bands: Vec<Range<usize>>,
    /// Bar index range owned by each channel
    channel_bars: Vec<Range<usize>>,

    spectrum: Spectrum,
}

impl BarAnalyzer {
    /// Create an analyzer; `config` is expected to be validated already
    pub fn new(
        config: &AnalyzerConfig,
        bar_count: usize,
        sample_rate_hz: u32,
        channels: usize,
    ) -> Self {
        let channels = channels.max(1);
        let fft_size = config.fft_size;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let window: Vec<f64> = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();
        let window_sum: f64 = window.iter().sum();
        let magnitude_scale = if window_sum > 0.0 { 2.0 / window_sum } else { 0.0 };

        let channel_bars = split_bars(bar_count, channels);
        let mut bands = Vec::with_capacity(bar_count);
        for range in &channel_bars {
            bands.extend(log_bands(config, sample_rate_hz, range.len()));
        }

        Self {
            fft,
            config: config.clone(),
            channels,
            rings: vec![vec![0.0; fft_size]; channels],
            write_pos: 0,
            window,
            magnitude_scale,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            bands,
            channel_bars,
            spectrum: Spectrum::new(vec![0.0; bar_count], AVERAGE_MAX_FLOOR)
                .with_channels(channels),
        }
    }

    /// Latest spectrum
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// FFT bin range feeding each bar
    pub fn bands(&self) -> &[Range<usize>] {
        &self.bands
    }

    /// Bars belonging to `channel`
    pub fn channel_bars(&self, channel: usize) -> Range<usize> {
        self.channel_bars.get(channel).cloned().unwrap_or(0..0)
    }

    fn push_samples(&mut self, samples: &[f64]) {
        let fft_size = self.config.fft_size;
        for frame in samples.chunks_exact(self.channels) {
            for (ring, &sample) in self.rings.iter_mut().zip(frame) {
                ring[self.write_pos] = sample;
            }
            self.write_pos = (self.write_pos + 1) % fft_size;
        }
    }
}

impl SpectrumAnalyzer for BarAnalyzer {
    fn analyze(&mut self, samples: &[f64]) -> Result<&Spectrum, AnalysisError> {
        if samples.is_empty() || samples.len() % self.channels != 0 {
            return Err(AnalysisError::MalformedInput {
                len: samples.len(),
                channels: self.channels,
            });
        }

        self.push_samples(samples);

        let fft_size = self.config.fft_size;
        let gate = self.config.noise_gate;
        let keep = self.config.noise_reduction;
        let mut frame_max: f64 = 0.0;

        for (ring, bar_range) in self.rings.iter().zip(&self.channel_bars) {
            // Unroll the ring oldest → newest under the window
            for (i, slot) in self.fft_buffer.iter_mut().enumerate() {
                let sample = ring[(self.write_pos + i) % fft_size];
                *slot = Complex::new(sample * self.window[i], 0.0);
            }
            self.fft
                .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

            let bars = self.spectrum.bars_mut();
            for bar in bar_range.clone() {
                let peak = self.fft_buffer[self.bands[bar].clone()]
                    .iter()
                    .map(|c| c.norm())
                    .fold(0.0, f64::max)
                    * self.magnitude_scale;
                let gated = if peak < gate { 0.0 } else { peak };

                let value = bars[bar] * keep + gated * (1.0 - keep);
                bars[bar] = value;
                frame_max = frame_max.max(value);
            }
        }

        let average_max = self.spectrum.average_max() * (1.0 - AVERAGE_MAX_RATE)
            + frame_max * AVERAGE_MAX_RATE;
        self.spectrum
            .set_average_max(average_max.max(AVERAGE_MAX_FLOOR));

        Ok(&self.spectrum)
    }

    fn bar_count(&self) -> usize {
        self.spectrum.len()
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f64 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f64) / (size as f64 - 1.0)).cos())
}

/// Share `bar_count` bars between channels, earlier channels taking the remainder
fn split_bars(bar_count: usize, channels: usize) -> Vec<Range<usize>> {
    (0..channels)
        .map(|ch| channel_range(bar_count, channels, ch))
        .collect()
}

/// Log-spaced bin ranges between the cutoffs, each at least one bin wide
fn log_bands(config: &AnalyzerConfig, sample_rate_hz: u32, bars: usize) -> Vec<Range<usize>> {
    let bin_count = config.bin_count().max(1);
    let ratio = config.high_cutoff_hz / config.low_cutoff_hz;
    let edge = |k: usize| config.low_cutoff_hz * ratio.powf(k as f64 / bars as f64);

    (0..bars)
        .map(|k| {
            let lo = config
                .hz_to_bin(edge(k), sample_rate_hz)
                .min(bin_count - 1);
            let hi = config
                .hz_to_bin(edge(k + 1), sample_rate_hz)
                .clamp(lo + 1, bin_count);
            lo..hi
        })
        .collect()
}
