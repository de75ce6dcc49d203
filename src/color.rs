//! RGB ↔ HSV color conversion.
//!
//! Both directions are total: every input maps to some output, and no
//! call can fail. Channels are fractions in [0, 1], hue is in degrees.

/// Below this chroma a color is treated as gray.
pub const ACHROMATIC_EPSILON: f64 = 0.00001;

/// Color with channel fractions in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Color as hue (degrees, [0, 360)), saturation and value (fractions)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Quantise to 8-bit channels, clamping anything outside [0, 1]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
        ]
    }

    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self)
    }
}

/// Convert RGB to HSV.
///
/// Grays (max - min below [`ACHROMATIC_EPSILON`]) come back with
/// saturation 0 and hue 0. Hue is meaningless for them; 0 is only a
/// placeholder.
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let delta = max - min;

    // delta == 0 also covers max == 0, so the division below is safe
    if delta < ACHROMATIC_EPSILON {
        return Hsv::new(0.0, 0.0, max);
    }

    let sector = if rgb.r >= max {
        (rgb.g - rgb.b) / delta
    } else if rgb.g >= max {
        2.0 + (rgb.b - rgb.r) / delta
    } else {
        4.0 + (rgb.r - rgb.g) / delta
    };

    let mut h = sector * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    Hsv::new(h, delta / max, max)
}

/// Convert HSV to RGB using the six-sector p/q/t table.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let v = hsv.v;
    if hsv.s <= 0.0 {
        return Rgb::new(v, v, v);
    }

    let hh = hsv.h.rem_euclid(360.0) / 60.0;
    let sector = hh.floor();
    let ff = hh - sector;

    let p = v * (1.0 - hsv.s);
    let q = v * (1.0 - hsv.s * ff);
    let t = v * (1.0 - hsv.s * (1.0 - ff));

    match (sector as i64).rem_euclid(6) {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

fn channel_to_byte(c: f64) -> u8 {
    // clamp passes NaN through
    if c.is_nan() {
        return 0;
    }
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
