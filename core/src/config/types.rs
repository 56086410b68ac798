use crossterm::style::Color;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub style: StyleConfig,
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// EnvFilter string, e.g. "warn" or "gotest_core=debug".
    pub level: String,

    /// If set, diagnostics are also written to a file in this directory.
    pub directory: Option<String>,
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Foreground colors for the three non-plain styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub pass: Color,
    pub fail: Color,
    pub skip: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pass: Color::AnsiValue(10),
            fail: Color::AnsiValue(9),
            skip: Color::AnsiValue(11),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether ANSI escapes should be written to stdout.
    pub fn resolve(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleConfig {
    pub palette: Palette,

    /// Drop `[no test files]` lines instead of printing them.
    pub skip_no_tests: bool,

    pub color_mode: ColorMode,
}

/// The command that gets launched; passthrough arguments follow `subcommand`.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub program: String,
    pub subcommand: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            subcommand: "test".to_string(),
        }
    }
}
