//! Peak-frequency tracker: the whole strip follows the loudest bar.

use super::{flood, Visualizer, VisualizerKind};
use crate::led::LedBuffer;
use crate::spectrum::Spectrum;

/// Distance at which the tracked index snaps onto the peak
const SNAP_DISTANCE: f64 = 0.01;

/// Smoothed loudest-bar tracker.
///
/// The first observed peak seeds the tracker; after that the tracked
/// index moves a `smoothing` fraction of the way toward each new peak,
/// so a peak flipping between neighbours does not make the strip flicker.
#[derive(Debug, Clone)]
pub struct PeakFrequency {
    smoothing: f64,
    tracked: Option<f64>,
}

impl PeakFrequency {
    /// `smoothing` in (0, 1]; 1 follows the peak without lag
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing,
            tracked: None,
        }
    }

    /// Smoothed peak index, `None` before the first render
    pub fn tracked(&self) -> Option<f64> {
        self.tracked
    }

    /// Bars searched for the peak.
    ///
    /// Mono spectra are searched over their lower half; multi-channel
    /// spectra over the whole first channel group, which is the left
    /// channel's own low-to-high run.
    pub fn search_len(spectrum: &Spectrum) -> usize {
        let bar_count = spectrum.len();
        if spectrum.channels() > 1 {
            spectrum.channel(0).len()
        } else {
            (bar_count / 2).max(1).min(bar_count)
        }
    }

    fn track(&mut self, peak: usize) -> f64 {
        let target = peak as f64;
        let next = match self.tracked {
            None => target,
            Some(previous) => {
                let moved = previous + (target - previous) * self.smoothing;
                if (target - moved).abs() < SNAP_DISTANCE {
                    target
                } else {
                    moved
                }
            }
        };
        self.tracked = Some(next);
        next
    }
}

/// Index of the first largest bar
fn loudest_bar(bars: &[f64]) -> usize {
    let mut best = 0;
    for (i, &bar) in bars.iter().enumerate() {
        if bar > bars[best] {
            best = i;
        }
    }
    best
}

impl Visualizer for PeakFrequency {
    fn render(&mut self, spectrum: &Spectrum, out: &mut LedBuffer) {
        let search_len = Self::search_len(spectrum);
        if search_len == 0 {
            flood(out, 0.0, 0.0);
            return;
        }

        let peak = loudest_bar(&spectrum.bars()[..search_len]);
        let tracked = self.track(peak);

        let bar = (tracked.round() as usize).min(search_len - 1);
        let hue = tracked / search_len as f64 * 360.0;
        flood(out, hue, spectrum.level(bar));
    }

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::PeakFrequency
    }
}
