//! Line styles written the short way: a color letter followed by a line type,
//! e.g. `r-`, `b--`, `k:`, `g-.`, or a `#rrggbb` color instead of the letter.

use crate::{CompareError, CompareResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLUE: Color = Color(0, 0, 255);
    pub const GREEN: Color = Color(0, 128, 0);
    pub const RED: Color = Color(255, 0, 0);
    pub const CYAN: Color = Color(0, 191, 191);
    pub const MAGENTA: Color = Color(191, 0, 191);
    pub const YELLOW: Color = Color(191, 191, 0);
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    /// Colors handed out to series that do not choose one.
    pub const PALETTE: [Color; 7] = [
        Color::BLUE,
        Color::RED,
        Color::GREEN,
        Color::MAGENTA,
        Color::CYAN,
        Color::YELLOW,
        Color::BLACK,
    ];

    pub fn palette(index: usize) -> Color {
        Color::PALETTE[index % Color::PALETTE.len()]
    }

    pub fn from_letter(c: char) -> Option<Color> {
        let color = match c {
            'b' => Color::BLUE,
            'g' => Color::GREEN,
            'r' => Color::RED,
            'c' => Color::CYAN,
            'm' => Color::MAGENTA,
            'y' => Color::YELLOW,
            'k' => Color::BLACK,
            'w' => Color::WHITE,
            _ => return None,
        };
        Some(color)
    }

    /// `#rrggbb`
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineDash {
    fn from_marker(s: &str) -> Option<LineDash> {
        let dash = match s {
            "" | "-" => LineDash::Solid,
            "--" => LineDash::Dashed,
            ":" => LineDash::Dotted,
            "-." => LineDash::DashDot,
            _ => return None,
        };
        Some(dash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: Color,
    pub dash: LineDash,
    pub width: u32,
}

impl LineStyle {
    pub const DEFAULT_WIDTH: u32 = 2;

    pub fn solid(color: Color) -> LineStyle {
        LineStyle {
            color,
            dash: LineDash::Solid,
            width: LineStyle::DEFAULT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: u32) -> LineStyle {
        self.width = width.max(1);
        self
    }

    /// Parse a format string, `default_color` is used when it names no color.
    pub fn from_format(fmt: &str, default_color: Color) -> CompareResult<LineStyle> {
        let fmt = fmt.trim();
        let (color, rest) = if fmt.starts_with('#') {
            let end = fmt.len().min(7);
            let color = fmt
                .get(..end)
                .and_then(Color::from_hex)
                .ok_or_else(|| CompareError::Config(format!("invalid hex color in style '{}'", fmt)))?;
            (color, &fmt[end..])
        } else {
            match fmt.chars().next().and_then(Color::from_letter) {
                Some(color) => (color, &fmt[1..]),
                None => (default_color, fmt),
            }
        };
        let dash = LineDash::from_marker(rest)
            .ok_or_else(|| CompareError::Config(format!("unknown line type '{}' in style '{}'", rest, fmt)))?;
        Ok(LineStyle {
            color,
            dash,
            width: LineStyle::DEFAULT_WIDTH,
        })
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::solid(Color::palette(0))
    }
}

impl FromStr for LineStyle {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineStyle::from_format(s, Color::BLACK)
    }
}
