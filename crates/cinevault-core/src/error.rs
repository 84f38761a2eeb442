use thiserror::Error;

use crate::media::MediaKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Content not found: {}", describe_missing(.id, .kind))]
    NotFound { id: u64, kind: Option<MediaKind> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the upstream API answered 404 for the requested record
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Upstream { status, .. } => *status == 404,
            _ => false,
        }
    }
}

fn describe_missing(id: &u64, kind: &Option<MediaKind>) -> String {
    match kind {
        Some(kind) => format!("{} {}", kind.label().to_lowercase(), id),
        None => format!("id {}", id),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(Error::NotFound { id: 1, kind: None }.is_not_found());
        assert!(Error::Upstream { status: 404, message: "missing".into() }.is_not_found());
        assert!(!Error::Upstream { status: 500, message: "boom".into() }.is_not_found());
        assert!(!Error::Network("timeout".into()).is_not_found());
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound { id: 42, kind: Some(MediaKind::Series) };
        assert_eq!(err.to_string(), "Content not found: tv 42");

        let err = Error::NotFound { id: 7, kind: None };
        assert_eq!(err.to_string(), "Content not found: id 7");
    }
}
