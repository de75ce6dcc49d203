//! LED strip frame buffer.

use crate::color::Rgb;

/// Bytes per LED slot on the wire (R, G, B)
pub const BYTES_PER_LED: usize = 3;

/// Fixed-length RGB buffer for one strip.
///
/// Storage is the flat `len × 3` byte layout sent to the strip, so a
/// rendered buffer can be handed to the transport without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBuffer {
    bytes: Vec<u8>,
}

impl LedBuffer {
    /// Create an all-off buffer for `led_count` slots
    pub fn new(led_count: usize) -> Self {
        Self {
            bytes: vec![0; led_count * BYTES_PER_LED],
        }
    }

    /// Number of LED slots
    pub fn len(&self) -> usize {
        self.bytes.len() / BYTES_PER_LED
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write one slot. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, rgb: [u8; 3]) {
        let start = index * BYTES_PER_LED;
        if let Some(slot) = self.bytes.get_mut(start..start + BYTES_PER_LED) {
            slot.copy_from_slice(&rgb);
        }
    }

    /// Write one slot from a fractional color
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        self.set(index, color.to_bytes());
    }

    /// Flood every slot with one color
    pub fn fill(&mut self, color: Rgb) {
        let rgb = color.to_bytes();
        for slot in self.bytes.chunks_exact_mut(BYTES_PER_LED) {
            slot.copy_from_slice(&rgb);
        }
    }

    /// Read one slot
    pub fn pixel(&self, index: usize) -> Option<[u8; 3]> {
        let start = index * BYTES_PER_LED;
        self.bytes
            .get(start..start + BYTES_PER_LED)
            .map(|slot| [slot[0], slot[1], slot[2]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.bytes
            .chunks_exact(BYTES_PER_LED)
            .map(|slot| [slot[0], slot[1], slot[2]])
    }

    /// Wire frame: one RGB triple per LED in strip order, no header
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
