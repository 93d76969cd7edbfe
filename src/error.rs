use crate::maybestd::fmt;

/// An error that occurred while trying to decode a membership proof from its
/// byte encoding.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProofDecodeError {
    /// The input ended in the middle of a proof element - a direction tag
    /// must always be followed by a full digest.
    UnexpectedEnd,
    /// A direction tag was neither the left nor the right marker.
    InvalidDirectionTag(u8),
}

impl fmt::Display for ProofDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => f.write_str("proof bytes ended mid-element"),
            Self::InvalidDirectionTag(tag) => write!(f, "invalid direction tag: {:#04x}", tag),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProofDecodeError {}

/// The error returned when failing to convert a byte slice to a root
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidRootBytes;

impl fmt::Display for InvalidRootBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InvalidRootBytes")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidRootBytes {}
