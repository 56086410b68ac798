use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("signal relay error: {0}")]
    Signal(String),
}
