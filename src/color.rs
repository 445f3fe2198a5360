//! Color assignment: fixed colors, ordinal palettes, and magnitude gradients.

use serde::{Deserialize, Serialize};

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation; `t` outside `[0, 1]` extrapolates and saturates.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
/// Returned when a category is not part of an ordinal domain.
pub const NEUTRAL: Rgb = Rgb::new(0x99, 0x99, 0x99);
pub const LEGEND_BORDER: Rgb = Rgb::new(0xe0, 0xe0, 0xe0);

/// Ten-color categorical palette (d3 `schemeCategory10`).
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0x17, 0xbe, 0xcf),
];

/// Blue/orange pair used for year series.
pub const SERIES_PAIR: [Rgb; 2] = [Rgb::new(0x3b, 0x82, 0xf6), Rgb::new(0xf9, 0x73, 0x16)];

/// How a gradient's input domain is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientDomain {
    /// Fixed `[lo, hi]`; intensities clamp to `[0, 1]`.
    Fixed(f64, f64),
    /// Extent of the measure over the rendered subset; not clamped.
    Extent,
}

/// Declarative color policy attached to a measure or series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorPolicy {
    Fixed(Rgb),
    Sequential {
        low: Rgb,
        high: Rgb,
        domain: GradientDomain,
    },
    /// Categories cycle through the palette in domain order.
    Ordinal(&'static [Rgb]),
}

/// Interpolated color keyed by magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub low: Rgb,
    pub high: Rgb,
    pub domain: (f64, f64),
    pub clamp: bool,
}

impl Gradient {
    pub fn color(&self, value: f64) -> Rgb {
        let (d0, d1) = self.domain;
        let mut t = if d1 != d0 {
            (value - d0) / (d1 - d0)
        } else {
            0.5
        };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        if !t.is_finite() {
            t = 0.5;
        }
        self.low.lerp(self.high, t)
    }
}

/// Category → color, cycling through a palette in domain order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    domain: Vec<String>,
    palette: Vec<Rgb>,
}

impl OrdinalScale {
    pub fn new(domain: Vec<String>, palette: &[Rgb]) -> Self {
        Self {
            domain,
            palette: palette.to_vec(),
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn color(&self, category: &str) -> Rgb {
        if self.palette.is_empty() {
            return NEUTRAL;
        }
        self.domain
            .iter()
            .position(|c| c == category)
            .map(|i| self.palette[i % self.palette.len()])
            .unwrap_or(NEUTRAL)
    }
}

/// Resolved color scale for one measure or series family.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    Fixed(Rgb),
    Gradient(Gradient),
    Ordinal(OrdinalScale),
}

impl ColorScale {
    /// Color for a primitive with the given category and magnitude.
    /// Each variant reads only the input it is keyed by.
    pub fn color(&self, category: &str, value: f64) -> Rgb {
        match self {
            ColorScale::Fixed(c) => *c,
            ColorScale::Gradient(g) => g.color(value),
            ColorScale::Ordinal(o) => o.color(category),
        }
    }

    /// Representative color for a legend swatch. Gradients are sampled at `at`,
    /// or halfway along their domain.
    pub fn swatch(&self, at: Option<f64>) -> Rgb {
        match self {
            ColorScale::Fixed(c) => *c,
            ColorScale::Gradient(g) => {
                g.color(at.unwrap_or((g.domain.0 + g.domain.1) / 2.0))
            }
            ColorScale::Ordinal(_) => NEUTRAL,
        }
    }

    /// Resolve a policy against the categories and values actually rendered.
    pub fn resolve(policy: &ColorPolicy, categories: Vec<String>, values: &[f64]) -> Self {
        match *policy {
            ColorPolicy::Fixed(c) => ColorScale::Fixed(c),
            ColorPolicy::Sequential { low, high, domain } => {
                let (domain, clamp) = match domain {
                    GradientDomain::Fixed(lo, hi) => ((lo, hi), true),
                    GradientDomain::Extent => (
                        crate::stats::extent(values.iter().copied()).unwrap_or((0.0, 0.0)),
                        false,
                    ),
                };
                ColorScale::Gradient(Gradient {
                    low,
                    high,
                    domain,
                    clamp,
                })
            }
            ColorPolicy::Ordinal(palette) => {
                ColorScale::Ordinal(OrdinalScale::new(categories, palette))
            }
        }
    }
}
