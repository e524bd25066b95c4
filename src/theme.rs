//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::grid::{ColorId, PALETTE};
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Board palette and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Cell colours, one per palette entry: red, green, blue, cyan, magenta, yellow, orange, pink.
    pub flood: [Color; 8],
    /// Board background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Text (moves, time).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text and cells left over when a game is lost.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const ONEDARK_FLOOD: [Color; 8] = [
    Color::Rgb(0xE0, 0x6C, 0x75), // red
    Color::Rgb(0x98, 0xC3, 0x79), // green
    Color::Rgb(0x61, 0xAF, 0xEF), // blue
    Color::Rgb(0x56, 0xB6, 0xC2), // cyan
    Color::Rgb(0xC6, 0x78, 0xDD), // magenta
    Color::Rgb(0xE5, 0xC0, 0x7B), // yellow
    Color::Rgb(0xD1, 0x9A, 0x66), // orange
    Color::Rgb(0xF2, 0x9E, 0xC4), // pink
];

impl Theme {
    /// One Dark defaults.
    pub fn onedark_default() -> Self {
        Self {
            flood: ONEDARK_FLOOD,
            bg: Color::Rgb(0x28, 0x2C, 0x34),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    /// `palette` then selects the cell colour variant.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map)?;
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Default theme for a palette when no file is loaded.
    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override cell colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.flood = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x66, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0xFF, 0xAA, 0xCC),
                ];
            }
            crate::Palette::Colorblind => {
                // Tol "bright"/"vibrant" mix: distinguishable without relying on red/green alone.
                self.flood = [
                    Color::Rgb(0xCC, 0x33, 0x11),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0x33, 0xBB, 0xEE),
                    Color::Rgb(0xEE, 0x33, 0x77),
                    Color::Rgb(0xCC, 0xBB, 0x44),
                    Color::Rgb(0xEE, 0x77, 0x33),
                    Color::Rgb(0xBB, 0xBB, 0xBB),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let defaults = Self::onedark_default();
        let get = |key: &str, fallback: Color| -> Result<Color, ThemeError> {
            map.get(key).map_or(Ok(fallback), |v| parse_hex(v))
        };
        let mut flood = defaults.flood;
        for (slot, name) in flood.iter_mut().zip(PALETTE) {
            *slot = get(&format!("flood_{name}"), *slot)?;
        }
        let bg = match map.get("main_bg") {
            Some(v) => parse_hex(v)?,
            None => get("meter_bg", defaults.bg)?,
        };
        Ok(Self {
            flood,
            bg,
            div_line: get("div_line", defaults.div_line)?,
            main_fg: get("main_fg", defaults.main_fg)?,
            title: get("title", defaults.title)?,
            inactive_fg: get("inactive_fg", defaults.inactive_fg)?,
        })
    }

    /// Terminal colour of a palette entry.
    #[inline]
    pub fn flood_color(&self, index: ColorId) -> Color {
        self.flood[(index as usize) % self.flood.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
