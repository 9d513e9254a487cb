use ratatui::style::Color;
use std::str::FromStr;

use crate::models::TaskCategory;

/// Parse a theme colour: anything ratatui's `Color::from_str` takes (names,
/// `#RRGGBB`, palette indexes) plus `#RGB` and `rgb(r, g, b)`.
/// Unrecognised input renders as white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();
    if let Some(color) = short_hex(&s).or_else(|| rgb_function(&s)) {
        return color;
    }
    Color::from_str(&s).unwrap_or(Color::White)
}

/// `#rgb`, each digit doubled
fn short_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 3 {
        return None;
    }
    let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
    Some(Color::Rgb(digits.next()??, digits.next()??, digits.next()??))
}

fn rgb_function(s: &str) -> Option<Color> {
    let body = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let channels: Vec<u8> = body
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match channels[..] {
        [r, g, b] => Some(Color::Rgb(r, g, b)),
        _ => None,
    }
}

/// Approximate sRGB channels of a terminal colour
fn channels(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (190, 190, 190),
        Color::DarkGray => (127, 127, 127),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (92, 92, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        Color::Indexed(_) | Color::Reset => (128, 128, 128),
    }
}

/// WCAG relative luminance, 0.0 (black) to 1.0 (white)
fn luminance(color: Color) -> f64 {
    let linear = |channel: u8| {
        let c = f64::from(channel) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = channels(color);
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black or white, whichever reads better on `background`
pub fn get_contrast_text_color(background: Color) -> Color {
    if luminance(background) < 0.4 {
        Color::White
    } else {
        Color::Black
    }
}

/// Accent used for a task category in lists and the stats breakdown
pub fn category_color(category: TaskCategory) -> Color {
    match category {
        TaskCategory::Work => Color::Blue,
        TaskCategory::Learning => Color::Green,
        TaskCategory::Meetings => Color::Magenta,
        TaskCategory::Admin => Color::Yellow,
        TaskCategory::Break => Color::Cyan,
    }
}
