use crossterm::style::{Color, ContentStyle};

use crate::config::{Palette, StyleConfig};

use super::classify::{classify, Style};

/// Turns raw output lines into what gets printed. Built once at startup and
/// shared read-only with the streamer.
#[derive(Debug, Clone)]
pub struct Renderer {
    palette: Palette,
    skip_no_tests: bool,
    ansi: bool,
}

impl Renderer {
    pub fn new(cfg: &StyleConfig) -> Self {
        Self::with_ansi(cfg.palette, cfg.skip_no_tests, cfg.color_mode.resolve())
    }

    pub fn with_ansi(palette: Palette, skip_no_tests: bool, ansi: bool) -> Self {
        Self {
            palette,
            skip_no_tests,
            ansi,
        }
    }

    pub fn color_for(&self, style: Style) -> Option<Color> {
        match style {
            Style::Pass => Some(self.palette.pass),
            Style::Fail => Some(self.palette.fail),
            Style::Skip => Some(self.palette.skip),
            Style::Plain => None,
        }
    }

    /// `None` means the line is suppressed and nothing should be written.
    pub fn render(&self, line: &str) -> Option<String> {
        let style = classify(line, self.skip_no_tests)?;
        let color = match self.color_for(style) {
            Some(color) if self.ansi => color,
            _ => return Some(line.to_string()),
        };

        Some(paint(color, line))
    }
}

fn paint(color: Color, line: &str) -> String {
    // crossterm writes `38;5;N` even for the 16 basic colors; plain 16-color
    // terminals only understand `3x`/`9x`.
    if let Some(code) = basic_sgr(color) {
        return format!("\x1b[{code}m{line}\x1b[0m");
    }
    let mut content_style = ContentStyle::new();
    content_style.foreground_color = Some(color);
    content_style.apply(line).to_string()
}

fn basic_sgr(color: Color) -> Option<u8> {
    let index = match color {
        Color::AnsiValue(n) if n < 16 => n,
        Color::Black => 0,
        Color::DarkRed => 1,
        Color::DarkGreen => 2,
        Color::DarkYellow => 3,
        Color::DarkBlue => 4,
        Color::DarkMagenta => 5,
        Color::DarkCyan => 6,
        Color::Grey => 7,
        Color::DarkGrey => 8,
        Color::Red => 9,
        Color::Green => 10,
        Color::Yellow => 11,
        Color::Blue => 12,
        Color::Magenta => 13,
        Color::Cyan => 14,
        Color::White => 15,
        _ => return None,
    };
    Some(if index < 8 { 30 + index } else { 90 + index - 8 })
}
