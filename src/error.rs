use thiserror::Error;

/// Failures raised by the pricing calculator. Either variant means no report
/// was produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input for '{item}': {reason}")]
    InvalidInput { item: String, reason: String },

    #[error("Tier {tier} for '{item}' has no entry in the tier table")]
    UnknownTier { item: String, tier: u8 },
}

impl CalcError {
    pub fn invalid(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

/// Everything that can go wrong around the calculator: reading config and
/// quantity files, writing exports.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Calc(#[from] CalcError),
}
