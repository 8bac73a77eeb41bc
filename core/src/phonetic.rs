//! Pluggable phonetic-code provider.
//!
//! The linguistic rules of a soundex-style algorithm live in the language crate;
//! the core only needs a deterministic `&str -> String` function. An empty code
//! means "no phonetic bucket": lookups then rely on prefix and scan matching.

/// Which row field the corpus-side code is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeSource {
    /// Encode the romanized form (Latin-only algorithms).
    #[default]
    Romanized,
    /// Encode the canonical Thai-script form (cross-language algorithms).
    Canonical,
}

/// Trait that phonetic-code algorithms implement to plug into the index and
/// the ranker.
///
/// Closures can be plugged in through [`FnCoder`].
pub trait PhoneticCoder: Send + Sync {
    /// Encode text into a phonetic code. Must be total and deterministic.
    fn encode(&self, text: &str) -> String;

    /// Short identifier, used in logs and index statistics.
    fn name(&self) -> &str {
        "custom"
    }

    fn source(&self) -> CodeSource {
        CodeSource::Romanized
    }
}

/// Adapter turning a plain function or closure into a coder.
pub struct FnCoder<F>(pub F);

impl<F> PhoneticCoder for FnCoder<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn encode(&self, text: &str) -> String {
        (self.0)(text)
    }
}

/// A coder that never yields a bucket. Ranking then relies on prefix and scan
/// candidates only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhoneticCode;

impl PhoneticCoder for NoPhoneticCode {
    fn encode(&self, _text: &str) -> String {
        String::new()
    }

    fn name(&self) -> &str {
        "none"
    }
}
