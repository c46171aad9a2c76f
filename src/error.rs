//! Error taxonomy for the splitting and recovery core
//!
//! Every error is raised where the violated contract is checked. Nothing is
//! silently corrected: a typo, a wrong share or a wrong prime all surface as an
//! error rather than a guessed value.

use thiserror::Error;

/// Errors raised by the mnemonic codec, the field arithmetic and the sharing engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Entropy length is not on the 128/160/192/224/256-bit ladder.
    #[error("invalid strength: {0} bits (must be one of 128, 160, 192, 224 or 256)")]
    InvalidStrength(usize),

    /// Word count is not on the 12/15/18/21/24-word ladder.
    #[error("invalid word count: {0} (must be one of 12, 15, 18, 21 or 24)")]
    InvalidWordCount(usize),

    /// A word is not in the BIP39 English wordlist.
    #[error("word #{position} '{word}' is not in the BIP39 wordlist")]
    UnknownWord {
        /// The offending word, as typed.
        word: String,
        /// 1-based position of the word in the sentence.
        position: usize,
    },

    /// Recomputed checksum disagrees with the checksum bits of the mnemonic.
    #[error(
        "checksum mismatch: a word is mistyped or out of order, or the shares are \
         insufficient, mismatched or from a different split"
    )]
    ChecksumMismatch,

    /// Threshold, share count, strength or prime do not fit together.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The same share index was supplied twice.
    #[error("duplicate share index: {0}")]
    DuplicateShare(u8),

    /// A value does not fit the number of bits available for it.
    #[error("value of {bits} bits does not fit in {strength} bits")]
    ValueTooLarge {
        /// Bit length of the value.
        bits: u64,
        /// Bits available.
        strength: usize,
    },

    /// Modular inverse of zero was requested.
    #[error("value is not invertible modulo the prime")]
    NotInvertible,

    /// The cryptographically secure random source failed.
    #[error("secure random source unavailable: {0}")]
    InsufficientEntropy(String),
}

/// Result alias for the core
pub type Result<T> = std::result::Result<T, Error>;
