//! Color string parsing and conversion
//!
//! Independent of token resolution: emitters call [`is_color_token`] to decide
//! whether a resolved value should be rewritten with [`convert_color`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static HEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([a-f0-9]{3}|[a-f0-9]{6}|[a-f0-9]{8})$").unwrap()
});

static RGB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)(?:\s*,\s*([0-9.]+))?\s*\)$").unwrap()
});

static HSL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^hsla?\(\s*(\d+)\s*,\s*([0-9.]+)%\s*,\s*([0-9.]+)%(?:\s*,\s*([0-9.]+))?\s*\)$").unwrap()
});

const COLOR_KEYWORDS: &[&str] = &[
    "color", "colour", "bg", "background", "fg", "foreground", "text", "border", "fill", "stroke",
];

/// Target notation for color values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// Leave colors exactly as authored
    #[default]
    Auto,
    Hex,
    Rgb,
    Hsl,
}

/// A parsed color, kept in the notation it was written in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb { r: u8, g: u8, b: u8, a: f64 },
    Hsl { h: u16, s: f64, l: f64, a: f64 },
}

impl Color {
    fn alpha(&self) -> f64 {
        match *self {
            Color::Rgb { a, .. } | Color::Hsl { a, .. } => a,
        }
    }

    fn to_rgb_channels(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb { r, g, b, .. } => (r, g, b),
            Color::Hsl { h, s, l, .. } => hsl_to_rgb(h as f64, s, l),
        }
    }

    fn to_hsl_channels(self) -> (u16, f64, f64) {
        match self {
            Color::Hsl { h, s, l, .. } => (h, s, l),
            Color::Rgb { r, g, b, .. } => rgb_to_hsl(r, g, b),
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when translucent
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb_channels();
        let a = self.alpha();
        if a < 1.0 {
            let alpha = (a * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, alpha)
        } else {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        }
    }

    /// `rgb(r, g, b)`, or `rgba(r, g, b, a)` when translucent
    pub fn to_rgb(self) -> String {
        let (r, g, b) = self.to_rgb_channels();
        let a = self.alpha();
        if a < 1.0 {
            format!("rgba({}, {}, {}, {})", r, g, b, a)
        } else {
            format!("rgb({}, {}, {})", r, g, b)
        }
    }

    /// `hsl(h, s%, l%)`, or `hsla(h, s%, l%, a)` when translucent
    pub fn to_hsl(self) -> String {
        let (h, s, l) = self.to_hsl_channels();
        let a = self.alpha();
        if a < 1.0 {
            format!("hsla({}, {}%, {}%, {})", h, s, l, a)
        } else {
            format!("hsl({}, {}%, {}%)", h, s, l)
        }
    }
}

/// Parse a hex, rgb(a) or hsl(a) color string
pub fn parse_color(input: &str) -> Option<Color> {
    let trimmed = input.trim().to_lowercase();

    if let Some(caps) = HEX_REGEX.captures(&trimmed) {
        let hex = &caps[1];
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let double = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Some(Color::Rgb { r: double(0)?, g: double(1)?, b: double(2)?, a: 1.0 })
            }
            6 | 8 => {
                let a = if hex.len() == 8 {
                    let raw = channel(&hex[6..8])? as f64;
                    (raw / 255.0 * 1000.0).round() / 1000.0
                } else {
                    1.0
                };
                Some(Color::Rgb {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                    a,
                })
            }
            _ => None,
        };
    }

    if let Some(caps) = RGB_REGEX.captures(&trimmed) {
        let r: u32 = caps[1].parse().ok()?;
        let g: u32 = caps[2].parse().ok()?;
        let b: u32 = caps[3].parse().ok()?;
        let a = parse_alpha(caps.get(4).map(|m| m.as_str()))?;
        if r <= 255 && g <= 255 && b <= 255 && (0.0..=1.0).contains(&a) {
            return Some(Color::Rgb { r: r as u8, g: g as u8, b: b as u8, a });
        }
        return None;
    }

    if let Some(caps) = HSL_REGEX.captures(&trimmed) {
        let h: u32 = caps[1].parse().ok()?;
        let s: f64 = caps[2].parse().ok()?;
        let l: f64 = caps[3].parse().ok()?;
        let a = parse_alpha(caps.get(4).map(|m| m.as_str()))?;
        if h <= 360
            && (0.0..=100.0).contains(&s)
            && (0.0..=100.0).contains(&l)
            && (0.0..=1.0).contains(&a)
        {
            return Some(Color::Hsl { h: h as u16, s, l, a });
        }
    }

    None
}

fn parse_alpha(raw: Option<&str>) -> Option<f64> {
    match raw {
        Some(s) => s.parse().ok(),
        None => Some(1.0),
    }
}

pub(crate) fn is_color(input: &str) -> bool {
    parse_color(input).is_some()
}

/// Rewrite a color string in `format`; non-colors and `Auto` pass through.
pub fn convert_color(input: &str, format: ColorFormat) -> String {
    if format == ColorFormat::Auto {
        return input.to_string();
    }
    match parse_color(input) {
        Some(color) => match format {
            ColorFormat::Hex => color.to_hex(),
            ColorFormat::Rgb => color.to_rgb(),
            ColorFormat::Hsl => color.to_hsl(),
            ColorFormat::Auto => input.to_string(),
        },
        None => input.to_string(),
    }
}

/// Whether a flat entry looks like a color: a color-ish key holding a color string.
pub fn is_color_token(key: &str, value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let key = key.to_lowercase();
    COLOR_KEYWORDS.iter().any(|k| key.contains(k)) && is_color(s)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    let hue_to_rgb = |p: f64, q: f64, mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };

    let to_byte = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (u16, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    ((h * 360.0).round() as u16, (s * 100.0).round(), (l * 100.0).round())
}
