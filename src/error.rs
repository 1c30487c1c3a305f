use thiserror::Error;

/// Errors raised while configuring or generating a level.
#[derive(Error, Debug)]
pub enum Error {
    /// A grid needs at least one interior cell, so both sides must be >= 3.
    #[error("grid dimensions must be at least 3x3, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("no open interior cell in a {rows}x{cols} grid")]
    NoOpenCell { rows: usize, cols: usize },

    #[error("invalid world config: {0}")]
    InvalidWorldConfig(String),

    #[error("invalid value {value:?} for setting {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("cannot parse grid: {0}")]
    GridParse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
