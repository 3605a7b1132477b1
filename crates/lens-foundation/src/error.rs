//! Error handling for the Lens system
//!
//! Every user-visible failure is one of the seven kinds below; the
//! dispatcher renders them as `Error: <message>` text. `Cancelled` is
//! internal and reported when a cooperative cancellation fires mid-request.

use thiserror::Error;

/// Core error type used throughout the Lens system
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LensError {
    /// Solution, project, type, symbol, or file does not exist
    #[error("NotFound: {0}")]
    NotFound(String),

    /// Malformed identifier, invalid scope, wrong-kind symbol, or a
    /// parameter reference to a non-existent name
    #[error("InvalidInput: {0}")]
    InvalidInput(String),

    /// More than one distinct resolution for a name; the message
    /// enumerates the candidates
    #[error("Ambiguous: {0}")]
    Ambiguous(String),

    /// The semantic-model provider could not build a compilation
    #[error("LoadFailed: {0}")]
    LoadFailed(String),

    /// Publishing changed documents into the workspace was rejected
    #[error("ConflictFailed: {0}")]
    ConflictFailed(String),

    /// The provider raised an error during reference / rename / search
    #[error("AnalysisFailed: {0}")]
    AnalysisFailed(String),

    /// A file-content request exceeded the size ceiling
    #[error("TooLarge: {0}")]
    TooLarge(String),

    /// The request's cancellation signal fired
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl LensError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous(message.into())
    }

    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictFailed(message.into())
    }

    pub fn analysis_failed(message: impl Into<String>) -> Self {
        Self::AnalysisFailed(message.into())
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        Self::TooLarge(message.into())
    }

    pub fn cancelled() -> Self {
        Self::Cancelled("operation cancelled".to_string())
    }

    /// JSON-RPC error code for this kind, used when a request fails before
    /// a tool result can be produced.
    pub fn jsonrpc_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::TooLarge(_) => -32602,
            _ => -32603,
        }
    }
}

/// Malformed tool arguments surface as `InvalidInput`.
impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("invalid arguments: {err}"))
    }
}

/// Result type alias for convenience
pub type LensResult<T> = Result<T, LensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_leads_with_kind_name() {
        let err = LensError::too_large("file is 6.0 MiB (limit 5 MiB)");
        assert_eq!(err.to_string(), "TooLarge: file is 6.0 MiB (limit 5 MiB)");

        let err = LensError::not_found("no project named 'App'");
        assert!(err.to_string().starts_with("NotFound: "));
    }

    #[test]
    fn invalid_arguments_map_to_invalid_input() {
        let parse_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: LensError = parse_err.into();
        assert!(matches!(err, LensError::InvalidInput(_)));
    }

    #[test]
    fn jsonrpc_codes() {
        assert_eq!(LensError::invalid_input("x").jsonrpc_code(), -32602);
        assert_eq!(LensError::not_found("x").jsonrpc_code(), -32603);
    }
}
