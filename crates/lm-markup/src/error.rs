//! Error types for content compilation.

/// Error raised at the boundary of the compilation pipeline.
///
/// Stages inside [`compile`](crate::compile) never return these: a failing
/// stage is downgraded to a warning and leaves its input untouched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkupError {
    /// Markup could not be read as a tree.
    #[error("markup parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Malformed attribute list.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding text.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Instance prefix contains characters outside the prefix alphabet.
    #[error("invalid instance prefix {0:?}: use ASCII letters, digits or '_'")]
    InvalidPrefix(String),
}
