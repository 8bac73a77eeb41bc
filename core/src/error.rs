//! Error type shared by the corpus loaders, the index builder and config I/O.
//!
//! Only resource provisioning fails with an `Err`. Per-query outcomes such as an
//! empty query, no match or an out-of-range selection are ordinary values (see
//! `session::Notice`).

use thiserror::Error;

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The corpus could not be provided, or it provided zero usable entries.
    ///
    /// Fatal at startup: no index, ranker or session can be built without it.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// A corpus file line could not be parsed.
    #[error("corpus format error at line {line}: {reason}")]
    CorpusFormat { line: usize, reason: String },

    /// A configuration value is out of its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether the error prevents the engine from starting at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CorpusUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::CorpusUnavailable("zero entries".into());
        assert_eq!(e.to_string(), "corpus unavailable: zero entries");
        assert!(e.is_fatal());

        let e = Error::CorpusFormat {
            line: 3,
            reason: "missing canonical form".into(),
        };
        assert_eq!(
            e.to_string(),
            "corpus format error at line 3: missing canonical form"
        );
        assert!(!e.is_fatal());
    }
}
