//! Bass meter: whole strip in one warm hue.

use super::{flood, Visualizer, VisualizerKind};
use crate::led::LedBuffer;
use crate::spectrum::{normalize, Spectrum};

#[derive(Debug, Clone, Copy)]
pub struct BassIntensity {
    hue_deg: f64,
}

impl BassIntensity {
    pub fn new(hue_deg: f64) -> Self {
        Self { hue_deg }
    }

    /// Bars counted as bass within one channel group: the lowest quarter, at least one
    pub fn bass_len(bar_count: usize) -> usize {
        (bar_count / 4).max(1).min(bar_count)
    }
}

impl Visualizer for BassIntensity {
    fn render(&mut self, spectrum: &Spectrum, out: &mut LedBuffer) {
        // stereo spectra hold one low-to-high run per channel; read the left one
        let group = spectrum.channel(0);
        let bass = &group[..Self::bass_len(group.len())];
        let loudest = bass.iter().copied().fold(0.0, f64::max);
        flood(out, self.hue_deg, normalize(loudest, spectrum.average_max()));
    }

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::BassIntensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_off() {
        let mut out = LedBuffer::new(5);
        BassIntensity::new(30.0).render(&Spectrum::new(vec![0.0; 8], 1.0), &mut out);
        assert!(out.pixels().all(|p| p == [0, 0, 0]));
    }

    #[test]
    fn test_uses_loudest_bass_bar_only() {
        // bass = bars 0..2; the loud bar 5 must not count
        let spectrum = Spectrum::new(vec![0.25, 0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 1.0);
        let mut out = LedBuffer::new(3);
        BassIntensity::new(0.0).render(&spectrum, &mut out);
        assert!(out.pixels().all(|p| p == [128, 0, 0]));
    }

    #[test]
    fn test_warm_hue_at_full_level() {
        let mut out = LedBuffer::new(2);
        BassIntensity::new(30.0).render(&Spectrum::new(vec![3.0; 4], 1.0), &mut out);
        assert!(out.pixels().all(|p| p == [255, 128, 0]));
    }

    #[test]
    fn test_stereo_reads_lowest_quarter_of_left_group() {
        // 16 bars over two channels: left 0..8 (bass 0..2), right 8..16
        let mut bars = vec![0.0; 16];
        // a quarter of the whole spectrum, but mid band for the left channel
        bars[3] = 1.0;
        // lowest right bar is left alone too
        bars[8] = 1.0;
        let spectrum = Spectrum::new(bars, 1.0).with_channels(2);

        let mut out = LedBuffer::new(4);
        BassIntensity::new(30.0).render(&spectrum, &mut out);
        assert!(out.pixels().all(|p| p == [0, 0, 0]));

        let mut bars = vec![0.0; 16];
        bars[1] = 1.0;
        let spectrum = Spectrum::new(bars, 1.0).with_channels(2);
        BassIntensity::new(30.0).render(&spectrum, &mut out);
        assert!(out.pixels().all(|p| p == [255, 128, 0]));
    }
}
