use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Required prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Invalid map config '{map}': {message}")]
    InvalidMapConfig { map: String, message: String },

    #[error("Map '{0}' not found")]
    UnknownMap(String),

    #[error("Invalid fragment table: {0}")]
    InvalidFragmentTable(String),

    #[error("Invalid region {name}: {message}")]
    InvalidRegion { name: String, message: String },

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Text recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Whether this error means a file simply wasn't there
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Build an [`Error::InvalidMapConfig`] for the given map
    pub fn invalid_map(map: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidMapConfig {
            map: map.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_map_message() {
        let err = Error::invalid_map("Poland", "missing field `cell_size_m`");
        assert_eq!(
            err.to_string(),
            "Invalid map config 'Poland': missing field `cell_size_m`"
        );
    }

    #[test]
    fn test_is_not_found() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.is_not_found());

        let err = Error::ConfigParseError("bad".to_string());
        assert!(!err.is_not_found());
    }
}
