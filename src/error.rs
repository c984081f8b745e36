//! Error types. None of these are fatal to the page: callers log them and
//! keep scrolling.

use thiserror::Error;

/// Why an arming command was not applied. The prior session stays untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmError {
    #[error("target word is empty")]
    EmptyTarget,
    #[error("rank must be at least 1, got {0}")]
    InvalidRank(u32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{lower}` must be below `{upper}`")]
    ThresholdOrder {
        lower: &'static str,
        upper: &'static str,
    },
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
    #[error("invalid config json: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Parse(String),
    #[error("catalog contains no usable words")]
    Empty,
}
