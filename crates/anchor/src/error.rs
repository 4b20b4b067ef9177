use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnchorFailure>;

/// Why a single quote could not be anchored.
///
/// Anchoring is best-effort per item: these never escape [`crate::anchor`],
/// they only downgrade the item to `matched = false`.
#[derive(Error, Debug)]
pub enum AnchorFailure {
    /// The quote contained no word characters to search for.
    #[error("quote produced no searchable tokens")]
    NoTokens,

    /// The generated pattern failed to compile (for example, it exceeded the
    /// regex size limit on a pathologically long quote).
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
