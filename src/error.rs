use thiserror::Error;

/// Main error type for the photostrip library
#[derive(Error, Debug)]
pub enum StripError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset loading error: {0}")]
    Asset(#[from] AssetError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Configuration-specific errors
///
/// Invalid configuration is rejected at the boundary, before any geometry or
/// drawing runs. Degenerate values never reach the planner.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Asset-specific errors
///
/// These are recovered locally during composition: a failed photo leaves its
/// slot empty, a failed decoration or font draws nothing.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to load asset: {source_ref}")]
    LoadFailed { source_ref: String },

    #[error("Failed to decode asset: {source_ref} - {reason}")]
    DecodeFailed { source_ref: String, reason: String },

    #[error("Asset load timed out after {seconds:.1}s: {source_ref}")]
    TimedOut { source_ref: String, seconds: f64 },

    #[error("No usable font for {role}")]
    FontUnavailable { role: String },
}

/// Render-specific errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },

    #[error("Strip encoding failed: {reason}")]
    EncodingFailed { reason: String },
}

/// Convenience type alias for Results using StripError
pub type Result<T> = std::result::Result<T, StripError>;

impl StripError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // Asset loads might work on retry
            Self::Asset(AssetError::LoadFailed { .. }) => true,
            Self::Asset(AssetError::TimedOut { .. }) => true,
            // Most other errors are permanent
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Asset(AssetError::LoadFailed { source_ref }) => {
                format!(
                    "Could not load '{}'. Please check the source exists and is a supported format.",
                    source_ref
                )
            }
            Self::Asset(AssetError::TimedOut { source_ref, seconds }) => {
                format!(
                    "Loading '{}' took longer than {:.0}s and was skipped.",
                    source_ref, seconds
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Render(RenderError::SurfaceUnavailable { reason }) => {
                format!("Could not create a drawing surface: {}.", reason)
            }
            _ => self.to_string(),
        }
    }
}
