//! Visualizer strategies: spectrum → LED colors.
//!
//! Every strategy overwrites the whole [`LedBuffer`] on each call and keeps
//! no reference to its inputs. Levels always pass through
//! [`Spectrum::level`], so channel bytes stay in range whatever the
//! analyzer produced.

mod bass;
mod loudness;
mod peak;
mod rainbow;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::Hsv;
use crate::led::LedBuffer;
use crate::params::VisualizerParams;
use crate::spectrum::Spectrum;

pub use bass::BassIntensity;
pub use loudness::AverageLoudness;
pub use peak::PeakFrequency;
pub use rainbow::Rainbow;

/// Maps one spectrum to one full LED frame
pub trait Visualizer: Send {
    fn render(&mut self, spectrum: &Spectrum, out: &mut LedBuffer);

    fn kind(&self) -> VisualizerKind;
}

/// Strategy selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizerKind {
    /// Position-keyed rainbow, brightness per bar, mirrored halves
    #[default]
    Rainbow,
    /// Whole strip in the color of the loudest bar
    #[serde(alias = "peak")]
    #[value(alias = "peak")]
    PeakFrequency,
    /// Whole strip in a warm hue, brightness from the bass bars
    #[serde(alias = "bass")]
    #[value(alias = "bass")]
    BassIntensity,
    /// Whole strip red, brightness from the mean of all bars
    #[serde(alias = "loudness")]
    #[value(alias = "loudness")]
    AverageLoudness,
}

impl VisualizerKind {
    pub const ALL: [VisualizerKind; 4] = [
        VisualizerKind::Rainbow,
        VisualizerKind::PeakFrequency,
        VisualizerKind::BassIntensity,
        VisualizerKind::AverageLoudness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VisualizerKind::Rainbow => "rainbow",
            VisualizerKind::PeakFrequency => "peak-frequency",
            VisualizerKind::BassIntensity => "bass-intensity",
            VisualizerKind::AverageLoudness => "average-loudness",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            VisualizerKind::Rainbow => "rainbow",
            VisualizerKind::PeakFrequency => "peak",
            VisualizerKind::BassIntensity => "bass",
            VisualizerKind::AverageLoudness => "loudness",
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }

    fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(value as usize)
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for VisualizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted || kind.short_name() == wanted)
            .ok_or_else(|| format!("Unknown visualizer '{}'", s.trim()))
    }
}

/// Shared handle to the active strategy.
///
/// Written from the control thread, read once per cycle by the pipeline.
/// A single atomic byte, so a switch never tears and never blocks the
/// audio callback.
#[derive(Debug, Clone, Default)]
pub struct ActiveVisualizer {
    kind: Arc<AtomicU8>,
}

impl ActiveVisualizer {
    pub fn new(kind: VisualizerKind) -> Self {
        Self {
            kind: Arc::new(AtomicU8::new(kind.to_u8())),
        }
    }

    pub fn get(&self) -> VisualizerKind {
        VisualizerKind::from_u8(self.kind.load(Ordering::Acquire))
    }

    /// Switch strategy, returning the previous one
    pub fn set(&self, kind: VisualizerKind) -> VisualizerKind {
        VisualizerKind::from_u8(self.kind.swap(kind.to_u8(), Ordering::AcqRel))
    }
}

/// One instance of every strategy.
///
/// Stateful strategies keep their history while another one is active.
pub struct VisualizerBank {
    rainbow: Rainbow,
    peak: PeakFrequency,
    bass: BassIntensity,
    loudness: AverageLoudness,
}

impl VisualizerBank {
    pub fn new(params: &VisualizerParams) -> Self {
        Self {
            rainbow: Rainbow,
            peak: PeakFrequency::new(params.peak_smoothing),
            bass: BassIntensity::new(params.bass_hue_deg),
            loudness: AverageLoudness,
        }
    }

    pub fn get_mut(&mut self, kind: VisualizerKind) -> &mut dyn Visualizer {
        match kind {
            VisualizerKind::Rainbow => &mut self.rainbow,
            VisualizerKind::PeakFrequency => &mut self.peak,
            VisualizerKind::BassIntensity => &mut self.bass,
            VisualizerKind::AverageLoudness => &mut self.loudness,
        }
    }

    pub fn render(&mut self, kind: VisualizerKind, spectrum: &Spectrum, out: &mut LedBuffer) {
        self.get_mut(kind).render(spectrum, out);
    }
}

impl Default for VisualizerBank {
    fn default() -> Self {
        Self::new(&VisualizerParams::default())
    }
}

/// Flood the strip with one fully saturated color
fn flood(out: &mut LedBuffer, hue_deg: f64, level: f64) {
    out.fill(Hsv::new(hue_deg, 1.0, level).to_rgb());
}
