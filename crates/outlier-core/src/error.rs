//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutlierError {
    /// A filter, sort or engine option is nonsensical. Raised before any
    /// computation starts.
    #[error("CONFIG/{0}")]
    InvalidConfiguration(String),

    /// A channel or video the caller asked for does not exist upstream.
    #[error("MISSING/{kind} {id}")]
    MissingData { kind: &'static str, id: String },

    /// The stats provider failed to answer.
    #[error("PROVIDER/{0}")]
    Provider(String),

    /// A profile or fixture document could not be read.
    #[error("PARSE/{0}")]
    Parse(String),
}

impl OutlierError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn missing_channel(id: impl Into<String>) -> Self {
        Self::MissingData {
            kind: "channel",
            id: id.into(),
        }
    }

    pub fn missing_video(id: impl Into<String>) -> Self {
        Self::MissingData {
            kind: "video",
            id: id.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}
