//! Colour scales and value normalization for heatmaps and legends.

use crate::{RenderError, RenderResult};
use serde::{Deserialize, Serialize};

/// Opaque colour.
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

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RenderError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| RenderError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA bytes with full opacity.
    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Maps a percent in `[0, 1]` onto an ordered list of colour stops.
///
/// Percents at or below 0 give the first stop, at or above 1 the last. A
/// discrete scale picks stop `floor(p * n)`; a continuous scale blends the
/// two neighbouring stops and floors each channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<Rgb>,
    discrete: bool,
}

impl ColorScale {
    pub fn new(stops: Vec<Rgb>, discrete: bool) -> RenderResult<Self> {
        if stops.is_empty() {
            return Err(RenderError::InvalidPalette(
                "colour scale needs at least one stop".to_string(),
            ));
        }
        Ok(Self { stops, discrete })
    }

    pub fn from_hex<S: AsRef<str>>(stops: &[S], discrete: bool) -> RenderResult<Self> {
        let stops = stops
            .iter()
            .map(|s| Rgb::from_hex(s.as_ref()))
            .collect::<RenderResult<Vec<_>>>()?;
        Self::new(stops, discrete)
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    pub fn is_discrete(&self) -> bool {
        self.discrete
    }

    /// Colour for `percent`. NaN maps to the first stop.
    pub fn color(&self, percent: f64) -> Rgb {
        let n = self.stops.len();
        let first = self.stops[0];
        let last = self.stops[n - 1];

        if percent.is_nan() || percent <= 0.0 {
            return first;
        }
        if percent >= 1.0 {
            return last;
        }
        if n == 1 {
            return first;
        }

        if self.discrete {
            let idx = ((percent * n as f64).floor() as usize).min(n - 1);
            return self.stops[idx];
        }

        let span = (n - 1) as f64;
        let idx = ((percent * span).floor() as usize).min(n - 2);
        let (c1, c2) = (self.stops[idx], self.stops[idx + 1]);
        let lo = idx as f64 / span;
        let hi = (idx + 1) as f64 / span;
        let t = (percent - lo) / (hi - lo);

        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).floor().clamp(0.0, 255.0) as u8;
        Rgb::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b))
    }

    /// Diverging blue-to-red scale for water temperature (15 discrete stops).
    pub fn ice_to_fire() -> Self {
        Self {
            stops: vec![
                Rgb::new(0, 30, 77),
                Rgb::new(0, 55, 134),
                Rgb::new(14, 88, 168),
                Rgb::new(32, 126, 184),
                Rgb::new(48, 164, 202),
                Rgb::new(83, 200, 223),
                Rgb::new(155, 228, 239),
                Rgb::new(225, 233, 209),
                Rgb::new(243, 213, 115),
                Rgb::new(231, 176, 0),
                Rgb::new(218, 130, 0),
                Rgb::new(198, 84, 0),
                Rgb::new(172, 35, 0),
                Rgb::new(130, 0, 0),
                Rgb::new(76, 0, 0),
            ],
            discrete: true,
        }
    }

    /// Light teal to deep blue (5 discrete stops).
    pub fn lagoon() -> Self {
        Self {
            stops: vec![
                Rgb::new(153, 218, 196),
                Rgb::new(81, 171, 173),
                Rgb::new(0, 123, 150),
                Rgb::new(0, 76, 119),
                Rgb::new(0, 30, 77),
            ],
            discrete: true,
        }
    }

    /// Near-black to bright blue, continuous. Used for current speed.
    pub fn dark_ocean() -> Self {
        Self {
            stops: vec![
                Rgb::new(0x01, 0x01, 0x08),
                Rgb::new(0x00, 0x02, 0x40),
                Rgb::new(0x22, 0x22, 0x6b),
                Rgb::new(0x37, 0x37, 0x7d),
                Rgb::new(0x2c, 0x6f, 0xc7),
            ],
            discrete: false,
        }
    }

    /// Look up a built-in scale by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "ice_to_fire" => Some(Self::ice_to_fire()),
            "lagoon" => Some(Self::lagoon()),
            "dark_ocean" => Some(Self::dark_ocean()),
            _ => None,
        }
    }
}

/// Palette as written in configuration: hex stops plus the discrete flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDefinition {
    pub colors: Vec<String>,
    #[serde(default)]
    pub discrete: bool,
}

impl PaletteDefinition {
    pub fn to_scale(&self) -> RenderResult<ColorScale> {
        ColorScale::from_hex(&self.colors, self.discrete)
    }
}

impl From<&ColorScale> for PaletteDefinition {
    fn from(scale: &ColorScale) -> Self {
        Self {
            colors: scale.stops.iter().map(Rgb::to_hex).collect(),
            discrete: scale.discrete,
        }
    }
}

/// Linear map from a data domain onto `[0, 1]`. Not clamped; the colour
/// scale clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn linear(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.5;
        }
        (value - self.min) / span
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn value_at(&self, percent: f64) -> f64 {
        self.min + (self.max - self.min) * percent
    }
}
