//! Construction-time configuration errors.

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("number of colours must be between {min} and {max}, got {requested}")]
    ColorCount { requested: u8, min: u8, max: u8 },
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size must be at most {max}, got {requested}")]
    GridTooLarge { requested: usize, max: usize },
    #[error("difficulty divisor must be at least 1")]
    ZeroDifficulty,
}

pub type Result<T> = core::result::Result<T, ConfigError>;
