pub mod app;
pub mod app_config;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod generator;
pub mod ui;
pub mod version_file;
pub mod warning;

pub use error::{Result, TimeverError};
