mod load;
mod types;

pub use load::{
    load_default, load_from, load_logging, parse_color, CLICOLOR_FORCE_ENV, COLORS_ENV,
    LOG_DIR_ENV, LOG_ENV, NO_COLOR_ENV, SKIP_NO_TESTS_ENV,
};
pub use types::{AppConfig, ColorMode, LoggingConfig, Palette, RunnerConfig, StyleConfig};
