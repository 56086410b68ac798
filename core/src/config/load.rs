use crossterm::style::Color;

use super::types::{AppConfig, ColorMode, LoggingConfig, Palette};

pub const COLORS_ENV: &str = "GOTEST_COLORS";
pub const SKIP_NO_TESTS_ENV: &str = "GOTEST_SKIPNOTESTS";
pub const LOG_ENV: &str = "GOTEST_LOG";
pub const LOG_DIR_ENV: &str = "GOTEST_LOG_DIR";
pub const NO_COLOR_ENV: &str = "NO_COLOR";
pub const CLICOLOR_FORCE_ENV: &str = "CLICOLOR_FORCE";

/// Build the configuration from defaults plus the process environment.
pub fn load_default() -> AppConfig {
    load_from(|key| std::env::var(key).ok())
}

/// Logging settings only. Read before the subscriber exists, so nothing here
/// may log.
pub fn load_logging() -> LoggingConfig {
    logging_from(&|key| std::env::var(key).ok())
}

fn logging_from(lookup: &dyn Fn(&str) -> Option<String>) -> LoggingConfig {
    let mut logging = LoggingConfig::default();
    if let Some(v) = lookup(LOG_ENV) {
        if !v.trim().is_empty() {
            logging.level = v.trim().to_string();
        }
    }
    if let Some(v) = lookup(LOG_DIR_ENV) {
        if !v.trim().is_empty() {
            logging.directory = Some(v.trim().to_string());
        }
    }
    logging
}

/// Build the configuration from defaults plus whatever `lookup` returns for
/// each recognised variable.
pub fn load_from<F>(lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = AppConfig {
        logging: logging_from(&lookup),
        ..AppConfig::default()
    };

    if let Some(v) = lookup(COLORS_ENV) {
        apply_colors(&mut cfg.style.palette, &v);
    }

    if let Some(v) = lookup(SKIP_NO_TESTS_ENV) {
        cfg.style.skip_no_tests = v.eq_ignore_ascii_case("true");
    }

    cfg.style.color_mode = color_mode(
        lookup(NO_COLOR_ENV).as_deref(),
        lookup(CLICOLOR_FORCE_ENV).as_deref(),
    );

    cfg
}

/// Apply a `pass,fail,skip` override. Anything other than exactly three
/// segments is ignored; empty segments keep the current color.
fn apply_colors(palette: &mut Palette, value: &str) {
    if value.is_empty() {
        return;
    }
    let segments: Vec<&str> = value.split(',').collect();
    let [pass, fail, skip] = segments.as_slice() else {
        tracing::debug!(value, "ignoring {COLORS_ENV}: expected three segments");
        return;
    };

    for (slot, spec, name) in [
        (&mut palette.pass, pass, "pass"),
        (&mut palette.fail, fail, "fail"),
        (&mut palette.skip, skip, "skip"),
    ] {
        if spec.is_empty() {
            continue;
        }
        match parse_color(spec) {
            Some(color) => *slot = color,
            None => {
                tracing::warn!(style = name, spec = *spec, "unrecognised color, keeping default")
            }
        }
    }
}

fn color_mode(no_color: Option<&str>, force: Option<&str>) -> ColorMode {
    if force.is_some_and(|v| !v.is_empty() && v != "0") {
        return ColorMode::Always;
    }
    if no_color.is_some_and(|v| !v.is_empty()) {
        return ColorMode::Never;
    }
    ColorMode::Auto
}

/// Parse a color specifier: an ANSI palette index (`"10"`), a hex triplet
/// (`"#f80"`, `"#ff8800"`), or a crossterm color name (`"dark_green"`).
pub fn parse_color(spec: &str) -> Option<Color> {
    let spec = spec.trim();
    if let Ok(idx) = spec.parse::<u8>() {
        return Some(Color::AnsiValue(idx));
    }
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    Color::try_from(spec.to_ascii_lowercase().as_str()).ok()
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::Rgb {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            })
        }
        6 => Some(Color::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}
