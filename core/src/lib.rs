//! Core of `gotest`: configuration, line classification, output streaming and
//! the process supervisor that ties a test subprocess to this program's stdout.

pub mod api;
pub mod config;
pub mod error;
pub mod runner;
pub mod style;
