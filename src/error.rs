//! Game error taxonomy

/// Errors surfaced by round setup and the orchestrator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// One image failed to load or decode (recoverable for decoys)
    #[error("failed to load image {url}: {reason}")]
    AssetLoad { url: String, reason: String },
    /// Invalid configuration or unresolvable target (fatal to setup)
    #[error("invalid configuration: {0}")]
    Config(String),
    /// API used out of order (e.g. starting before the round is loaded)
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
    /// GPU adapter, device or surface could not be set up
    #[error("graphics setup failed: {0}")]
    Graphics(String),
}

impl GameError {
    pub fn asset_load(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the round can proceed without the failed piece
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AssetLoad { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GameError::asset_load("/assets/flower-cuts/4.png", "404");
        assert_eq!(
            err.to_string(),
            "failed to load image /assets/flower-cuts/4.png: 404"
        );
        assert!(err.is_recoverable());
        assert!(!GameError::Config("num_shapes".into()).is_recoverable());
    }
}
