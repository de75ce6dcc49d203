//! Loudness meter: whole strip red, brightness from the mean bar.

use super::{flood, Visualizer, VisualizerKind};
use crate::led::LedBuffer;
use crate::spectrum::{normalize, Spectrum};

#[derive(Debug, Clone, Copy, Default)]
pub struct AverageLoudness;

impl Visualizer for AverageLoudness {
    fn render(&mut self, spectrum: &Spectrum, out: &mut LedBuffer) {
        let bars = spectrum.bars();
        let mean = if bars.is_empty() {
            0.0
        } else {
            bars.iter().sum::<f64>() / bars.len() as f64
        };
        flood(out, 0.0, normalize(mean, spectrum.average_max()));
    }

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::AverageLoudness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_off() {
        let mut out = LedBuffer::new(4);
        AverageLoudness.render(&Spectrum::new(vec![0.0; 6], 1.0), &mut out);
        assert!(out.pixels().all(|p| p == [0, 0, 0]));
    }

    #[test]
    fn test_brightness_follows_mean() {
        let mut out = LedBuffer::new(4);
        AverageLoudness.render(&Spectrum::new(vec![1.0, 0.0, 0.5, 0.5], 1.0), &mut out);
        assert!(out.pixels().all(|p| p == [128, 0, 0]));
    }
}
