// Terminal color palette
// Colors are resolved once at startup and handed to the UI as a Theme

use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Color depth of the attached terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

impl Depth {
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed256
        } else {
            Depth::Basic
        }
    }
}

/// Windows Terminal "Campbell" sample for an ANSI color: ((R, G, B), 256-color index)
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    match color {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::Red => Some(((197, 15, 31), 160)),
        Color::Green => Some(((19, 161, 14), 28)),
        Color::Yellow => Some(((193, 156, 0), 178)),
        Color::Blue => Some(((0, 55, 218), 20)),
        Color::Gray => Some(((204, 204, 204), 250)),
        Color::DarkGray => Some(((118, 118, 118), 243)),
        Color::LightRed => Some(((231, 72, 86), 203)),
        Color::LightGreen => Some(((22, 198, 12), 46)),
        Color::LightBlue => Some(((59, 120, 255), 63)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    }
}

/// Adjust an ANSI color so it looks the same across terminals of the given depth
pub fn resolve(color: Color, depth: Depth) -> Color {
    match (campbell(color), depth) {
        (Some(((r, g, b), _)), Depth::TrueColor) => Color::Rgb(r, g, b),
        (Some((_, index)), Depth::Indexed256) => Color::Indexed(index),
        _ => color,
    }
}

/// Resolved colors for every element the UI draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub hidden_bg: Color,
    pub hidden_fg: Color,
    pub empty_bg: Color,
    pub mine_bg: Color,
    pub cell_fg: Color,
    pub cursor_bg: Color,
    pub board_bg: Color,
    pub text: Color,
    pub accent: Color,
    pub success: Color,
    pub failure: Color,
    pub highlight: Color,
}

impl Theme {
    pub fn new(depth: Depth) -> Self {
        let c = |color| resolve(color, depth);
        Theme {
            hidden_bg: c(Color::Gray),
            hidden_fg: c(Color::Black),
            empty_bg: c(Color::Green),
            mine_bg: c(Color::Red),
            cell_fg: c(Color::White),
            cursor_bg: c(Color::LightBlue),
            board_bg: c(Color::DarkGray),
            text: c(Color::White),
            accent: c(Color::Yellow),
            success: c(Color::LightGreen),
            failure: c(Color::LightRed),
            highlight: c(Color::Blue),
        }
    }
}
