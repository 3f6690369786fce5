use thiserror::Error;

/// Reasons a [`Settings`](crate::Settings) value cannot start a game
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f32 },
    #[error("min_tube_pos must not be negative (got {0})")]
    NegativeMargin(f32),
    #[error("at least one tube is required")]
    NoTubes,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed settings file")]
    Parse(#[from] serde_json::Error),
}
