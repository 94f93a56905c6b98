//! Codec and encoder errors.

use borsh::io;
use thiserror::Error;

/// Errors raised while decoding account data or encoding instructions.
///
/// Decode failures are all forms of a malformed record; the remaining variants are
/// caller contract violations caught before any bytes are produced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StableSwapError {
    /// Record or payload length does not match the fixed span
    #[error("malformed record: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// A bounded field holds a value outside its allowed range
    #[error("malformed record: field `{field}` out of range ({value})")]
    FieldOutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: u64,
    },

    /// Borsh rejected the bytes (short input, trailing bytes, non-`0`/`1` flag)
    #[error("malformed {target}: {reason}")]
    Malformed {
        /// What was being decoded
        target: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Borsh failed to write the value into its buffer
    #[error("failed to encode {target}: {reason}")]
    Encode {
        /// What was being encoded
        target: &'static str,
        /// Encoder message
        reason: String,
    },

    /// Instruction payload starts with an unknown discriminant
    #[error("unknown instruction discriminant {0}")]
    UnknownInstruction(u8),

    /// Pool asset count is zero or larger than `MAX_N_COINS`
    #[error("invalid asset count {count}, expected 1..={max}")]
    InvalidAssetCount {
        /// Requested asset count
        count: usize,
        /// Largest supported asset count
        max: usize,
    },

    /// A per-asset vector does not line up with the pool's asset count
    #[error("`{field}` has {actual} entries, pool has {expected} assets")]
    AssetCountMismatch {
        /// Argument name
        field: &'static str,
        /// Pool asset count
        expected: usize,
        /// Provided entry count
        actual: usize,
    },
}

impl StableSwapError {
    /// Returns true if this error describes a malformed record or payload.
    pub const fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. }
                | Self::FieldOutOfRange { .. }
                | Self::Malformed { .. }
                | Self::UnknownInstruction(_)
        )
    }

    pub(crate) fn malformed(target: &'static str, error: &io::Error) -> Self {
        Self::Malformed {
            target,
            reason: error.to_string(),
        }
    }

    pub(crate) fn encode(target: &'static str, error: &io::Error) -> Self {
        Self::Encode {
            target,
            reason: error.to_string(),
        }
    }
}
