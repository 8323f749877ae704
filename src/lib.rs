use std::path::Path;

use crate::domain::engine::BookingEngine;
use crate::error::Result;
use crate::loader::config::EngineConfig;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Builds the engine from the compiled-in defaults, or from the JSON file at `config_path`.
///
/// `data_file` takes precedence over the table location of either.
pub fn open_engine(config_path: Option<&Path>, data_file: Option<&Path>) -> Result<BookingEngine> {
    let mut config = match config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    if let Some(data_file) = data_file {
        config.data_file = data_file.to_path_buf();
    }

    BookingEngine::open(config)
}
