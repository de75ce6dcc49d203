//! Spectrum vector shared between the analyzer and the visualizers.

use std::ops::Range;

/// One cycle's frequency bars plus the analyzer's running ceiling.
///
/// Bars are non-negative magnitudes. `average_max` is an estimate, not a
/// bound: any bar may exceed it, so consumers go through [`Spectrum::level`].
///
/// Bars are grouped per input channel, one group after another, each
/// group running low to high frequency. Earlier groups take the
/// remainder when the bars do not split evenly (see [`channel_range`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bars: Vec<f64>,
    average_max: f64,
    channels: usize,
}

impl Spectrum {
    /// Single-channel spectrum
    pub fn new(bars: Vec<f64>, average_max: f64) -> Self {
        Self {
            bars,
            average_max,
            channels: 1,
        }
    }

    /// Regroup the bars into `channels` per-channel groups
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.max(1);
        self
    }

    /// All-zero spectrum of `bar_count` bars
    pub fn silent(bar_count: usize) -> Self {
        Self::new(vec![0.0; bar_count], 0.0)
    }

    pub fn bars(&self) -> &[f64] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn average_max(&self) -> f64 {
        self.average_max
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Bars of one channel, lowest frequency first; empty past the last channel
    pub fn channel(&self, channel: usize) -> &[f64] {
        &self.bars[channel_range(self.bars.len(), self.channels, channel)]
    }

    /// Bar `index` scaled by `average_max`, clamped to [0, 1].
    /// Missing bars read as 0.
    pub fn level(&self, index: usize) -> f64 {
        self.bars
            .get(index)
            .map_or(0.0, |&magnitude| normalize(magnitude, self.average_max))
    }

    /// Refill in place from the analyzer without reallocating
    pub(crate) fn bars_mut(&mut self) -> &mut [f64] {
        &mut self.bars
    }

    pub(crate) fn set_average_max(&mut self, average_max: f64) {
        self.average_max = average_max;
    }
}

/// Bars owned by `channel` when `bar_count` bars are shared between
/// `channels` channels
pub fn channel_range(bar_count: usize, channels: usize, channel: usize) -> Range<usize> {
    let channels = channels.max(1);
    if channel >= channels {
        return bar_count..bar_count;
    }
    let base = bar_count / channels;
    let extra = bar_count % channels;
    let start = channel * base + channel.min(extra);
    start..start + base + usize::from(channel < extra)
}

/// `magnitude / ceiling` clamped to [0, 1]; degenerate inputs give 0
pub fn normalize(magnitude: f64, ceiling: f64) -> f64 {
    if ceiling.is_nan() || ceiling <= 0.0 {
        return 0.0;
    }
    let level = magnitude / ceiling;
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
