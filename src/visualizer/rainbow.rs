//! Mirrored rainbow: hue by position, brightness by bar.

use super::{Visualizer, VisualizerKind};
use crate::color::Hsv;
use crate::led::LedBuffer;
use crate::spectrum::Spectrum;

/// Left half runs up the strip, right half runs back down from the far
/// end, so both ends show the same part of the spectrum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rainbow;

impl Rainbow {
    /// Mirrored source position for `slot`
    pub fn source_position(slot: usize, led_count: usize) -> usize {
        let half = led_count / 2;
        if slot < half {
            slot
        } else {
            led_count - 1 - (slot - half)
        }
    }

    /// Bar feeding a source position; bars are spread evenly over the strip
    pub fn bar_for_position(position: usize, led_count: usize, bar_count: usize) -> usize {
        if led_count == 0 {
            return 0;
        }
        position * bar_count / led_count
    }

    /// Hue for a source position, restarting at 0° for the second half
    pub fn hue_for_position(position: usize, led_count: usize) -> f64 {
        let half = led_count / 2;
        let offset = if position < half {
            position
        } else {
            position - half
        };
        offset as f64 / half.max(1) as f64 * 360.0
    }
}

impl Visualizer for Rainbow {
    fn render(&mut self, spectrum: &Spectrum, out: &mut LedBuffer) {
        let led_count = out.len();
        for slot in 0..led_count {
            let position = Self::source_position(slot, led_count);
            let bar = Self::bar_for_position(position, led_count, spectrum.len());
            let hue = Self::hue_for_position(position, led_count);
            out.set_color(slot, Hsv::new(hue, 1.0, spectrum.level(bar)).to_rgb());
        }
    }

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Rainbow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_leds_two_bars_full_level() {
        let spectrum = Spectrum::new(vec![2.0, 2.0], 2.0);
        let mut out = LedBuffer::new(4);
        Rainbow.render(&spectrum, &mut out);

        // 0° red on the outer pair, 180° cyan on the inner pair
        assert_eq!(out.pixel(0), Some([255, 0, 0]));
        assert_eq!(out.pixel(1), Some([0, 255, 255]));
        assert_eq!(out.pixel(2), Some([0, 255, 255]));
        assert_eq!(out.pixel(3), Some([255, 0, 0]));
    }

    #[test]
    fn test_right_half_reads_tail_of_spectrum() {
        // only the last bar is lit, so only the right half lights up
        let spectrum = Spectrum::new(vec![0.0, 1.0], 1.0);
        let mut out = LedBuffer::new(4);
        Rainbow.render(&spectrum, &mut out);

        assert_eq!(out.pixel(0), Some([0, 0, 0]));
        assert_eq!(out.pixel(1), Some([0, 0, 0]));
        assert_ne!(out.pixel(2), Some([0, 0, 0]));
        assert_ne!(out.pixel(3), Some([0, 0, 0]));
    }

    #[test]
    fn test_mirrored_positions_cover_strip() {
        let led_count = 150;
        let mut seen: Vec<usize> = (0..led_count)
            .map(|slot| Rainbow::source_position(slot, led_count))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..led_count).collect::<Vec<_>>());

        assert_eq!(Rainbow::source_position(75, led_count), 149);
        assert_eq!(Rainbow::source_position(149, led_count), 75);
    }

    #[test]
    fn test_bar_mapping_spans_spectrum() {
        assert_eq!(Rainbow::bar_for_position(0, 150, 75), 0);
        assert_eq!(Rainbow::bar_for_position(149, 150, 75), 74);
        assert_eq!(Rainbow::bar_for_position(10, 10, 0), 0);
    }

    #[test]
    fn test_odd_strip_is_fully_written() {
        let spectrum = Spectrum::new(vec![1.0; 3], 1.0);
        let mut out = LedBuffer::new(7);
        Rainbow.render(&spectrum, &mut out);
        assert!(out.pixels().all(|p| p != [0, 0, 0]));
    }
}
