//! Errors raised while building, encoding or decoding Klaytn transactions.

use crate::tx::tx_type::KlayTxType;

/// Result alias for this crate.
pub type KlayTxResult<T> = Result<T, KlayTxError>;

/// Errors produced by the codec, the variant parsers and the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KlayTxError {
    /// Header/length inconsistency, non-canonical integer, truncated or trailing bytes.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] alloy_rlp::Error),
    /// No decoder is registered for the leading type byte.
    #[error("unknown transaction type tag 0x{0:02x}")]
    UnknownTypeTag(u8),
    /// The decoded field list does not have a length the variant accepts.
    #[error("{tx_type} expects {expected} fields, got {got}")]
    FieldCountMismatch {
        /// Variant being decoded.
        tx_type: KlayTxType,
        /// Accepted field counts, human readable.
        expected: &'static str,
        /// Number of fields found.
        got: usize,
    },
    /// A field carries a value outside its domain.
    #[error("invalid {field}: {reason}")]
    InvalidFieldValue {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Raw input is larger than the configured limit.
    #[error("raw transaction of {size} bytes exceeds limit of {limit} bytes")]
    Oversized {
        /// Size of the input.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl KlayTxError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue { field, reason: reason.into() }
    }

    /// Returns `true` for errors that stem from the byte representation rather than from a value
    /// check.
    pub const fn is_decoding(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding(_) | Self::UnknownTypeTag(_) | Self::FieldCountMismatch { .. }
        )
    }
}

impl From<alloy_primitives::hex::FromHexError> for KlayTxError {
    fn from(err: alloy_primitives::hex::FromHexError) -> Self {
        Self::InvalidHex(err.to_string())
    }
}
