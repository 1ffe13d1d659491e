use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Engine input errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Category execution not found: execution_id={execution_id}")]
    ExecutionNotFound { execution_id: u64 },

    #[error("Match not found in bracket: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Category not found in catalog: category_id={category_id}")]
    CategoryNotFound { category_id: u64 },

    #[error("Athlete {athlete_id} is not a participant of match {match_id}")]
    InvalidWinner { match_id: String, athlete_id: u64 },

    // Persistence and serialization errors
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    pub fn execution_not_found(execution_id: u64) -> Self {
        Self::ExecutionNotFound { execution_id }
    }

    pub fn match_not_found(match_id: impl Into<String>) -> Self {
        Self::MatchNotFound {
            match_id: match_id.into(),
        }
    }

    pub fn category_not_found(category_id: u64) -> Self {
        Self::CategoryNotFound { category_id }
    }

    /// Create an invalid winner error for a manual winner selection
    pub fn invalid_winner(match_id: impl Into<String>, athlete_id: u64) -> Self {
        Self::InvalidWinner {
            match_id: match_id.into(),
            athlete_id,
        }
    }

    /// Check if error refers to a missing execution, match or category
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ExecutionNotFound { .. }
                | AppError::MatchNotFound { .. }
                | AppError::CategoryNotFound { .. }
        )
    }
}
