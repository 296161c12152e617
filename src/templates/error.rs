//! Template error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// The corpus root could not be scanned. Fatal at startup.
    #[error("failed to index template directory '{}': {source}", root.display())]
    Index {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No template matched the requested name.
    #[error("Template \"{0}\" not found.")]
    NotFound(String),

    /// A matched template file could not be read as UTF-8 text.
    #[error("failed to read template '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    /// HTTP status code the error maps to
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Index { .. } | Self::Read { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_template() {
        let err = TemplateError::NotFound("cobol".to_string());
        assert_eq!(err.to_string(), "Template \"cobol\" not found.");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_index_error_carries_root() {
        let err = TemplateError::Index {
            root: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        let message = err.to_string();
        assert!(message.contains("/missing"));
        assert!(message.contains("no such directory"));
        assert_eq!(err.status_code(), 500);
    }
}
