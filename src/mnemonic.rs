//! BIP39 mnemonic encoding
//!
//! Maps entropy on the strength ladder to and from word sentences:
//!
//! ```text
//! entropy (S bits) || SHA-256(entropy)[..S/32 bits]  ->  (S + S/32) / 11 words
//! ```
//!
//! The wordlist is the BIP39 English list shipped with the `bip39` crate. It is
//! immutable, loaded once, and reached only through [`word_at`] and [`index_of`].
//! Any change to it would break every mnemonic ever produced.
//!
//! # Examples
//!
//! ```rust
//! use mnemoshare::mnemonic::{self, Entropy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entropy = Entropy::from_bytes(&[0x7f; 16])?;
//! let sentence = mnemonic::encode(&entropy);
//! assert_eq!(
//!     sentence.as_str(),
//!     "legal winner thank year wave sausage worth useful legal winner thank yellow"
//! );
//!
//! let decoded = mnemonic::decode(sentence.as_str())?;
//! assert_eq!(decoded.as_bytes(), &[0x7f; 16]);
//! # Ok(())
//! # }
//! ```

use bip39::Language;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::LazyLock;
use zeroize::Zeroizing;

use crate::domain::Strength;
use crate::error::{Error, Result};

/// Bits carried by one word
pub const BITS_PER_WORD: usize = 11;

/// Number of words in the wordlist
pub const WORDLIST_LEN: usize = 1 << BITS_PER_WORD;

/// Static `HashMap` for O(1) word-to-index lookups
static WORD_TO_INDEX_MAP: LazyLock<HashMap<&'static str, u16>> = LazyLock::new(|| {
    Language::English
        .word_list()
        .iter()
        .zip(0u16..)
        .map(|(&word, idx)| (word, idx))
        .collect()
});

/// The word with 11-bit code `index`, if `index < 2048`
#[must_use]
pub fn word_at(index: u16) -> Option<&'static str> {
    Language::English.word_list().get(usize::from(index)).copied()
}

/// The 11-bit code of `word` (case-insensitive)
#[must_use]
pub fn index_of(word: &str) -> Option<u16> {
    let word_lower = Zeroizing::new(word.to_lowercase());
    WORD_TO_INDEX_MAP.get(word_lower.as_str()).copied()
}

/// Raw entropy of a seed or share, without checksum
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy {
    strength: Strength,
    bytes: Zeroizing<Vec<u8>>,
}

impl Entropy {
    /// Copies entropy bytes, inferring the strength from their length
    ///
    /// # Errors
    /// Returns [`Error::InvalidStrength`] if `8 * bytes.len()` is not on the ladder
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let strength = Strength::from_entropy_len(bytes.len())?;
        Ok(Self {
            strength,
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    /// Fresh entropy from a cryptographically secure source
    ///
    /// # Errors
    /// Returns [`Error::InsufficientEntropy`] if the source fails
    pub fn generate<R: RngCore + CryptoRng>(strength: Strength, rng: &mut R) -> Result<Self> {
        let mut bytes = Zeroizing::new(vec![0u8; strength.bytes()]);
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| Error::InsufficientEntropy(e.to_string()))?;
        Ok(Self { strength, bytes })
    }

    /// Strength of the entropy
    #[must_use]
    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Raw bytes, big-endian
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entropy({}, <redacted>)", self.strength)
    }
}

/// A validated BIP39 sentence, lowercase, words separated by single spaces
///
/// Wraps the sentence in `Zeroizing` to ensure secure memory cleanup.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(Zeroizing<String>);

impl Mnemonic {
    /// Parses and normalizes a sentence
    ///
    /// # Errors
    /// Same as [`decode`]
    pub fn parse(phrase: &str) -> Result<Self> {
        Ok(encode(&decode(phrase)?))
    }

    /// Gets the mnemonic as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The words of the sentence
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }

    /// Number of words
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words().count()
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &*self.0)
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic({} words, <redacted>)", self.word_count())
    }
}

/// Leading `strength / 32` bits of SHA-256(entropy), right-aligned
fn checksum(entropy: &[u8], strength: Strength) -> u8 {
    let digest = Sha256::digest(entropy);
    digest[0] >> (8 - strength.checksum_bits())
}

/// Encodes entropy as a mnemonic
///
/// The strength is fixed by the [`Entropy`] itself, so encoding cannot fail;
/// use [`Entropy::from_bytes`] to validate raw bytes first.
#[must_use]
pub fn encode(entropy: &Entropy) -> Mnemonic {
    let strength = entropy.strength();
    let entropy_bits = strength.bits();
    let cs_bits = strength.checksum_bits();
    let cs = checksum(entropy.as_bytes(), strength);

    let bit_at = |i: usize| -> u16 {
        if i < entropy_bits {
            u16::from((entropy.as_bytes()[i / 8] >> (7 - i % 8)) & 1)
        } else {
            u16::from((cs >> (cs_bits - 1 - (i - entropy_bits))) & 1)
        }
    };

    let mut sentence = Zeroizing::new(String::with_capacity(strength.word_count() * 9));
    let mut word_index: u16 = 0;
    for i in 0..entropy_bits + cs_bits {
        word_index = (word_index << 1) | bit_at(i);
        if (i + 1) % BITS_PER_WORD == 0 {
            if !sentence.is_empty() {
                sentence.push(' ');
            }
            // 11-bit values always index into the 2048-word list
            sentence.push_str(word_at(word_index).unwrap_or_default());
            word_index = 0;
        }
    }

    Mnemonic(sentence)
}

/// Decodes a mnemonic back to its entropy, verifying the checksum
///
/// Words are matched case-insensitively and may be separated by any whitespace.
///
/// # Errors
/// - [`Error::InvalidWordCount`] if the sentence is not 12, 15, 18, 21 or 24 words
/// - [`Error::UnknownWord`] naming the first word not in the wordlist
/// - [`Error::ChecksumMismatch`] if the checksum bits disagree with the entropy
pub fn decode(phrase: &str) -> Result<Entropy> {
    let strength = Strength::from_word_count(phrase.split_whitespace().count())?;

    let mut indices = Zeroizing::new(Vec::with_capacity(strength.word_count()));
    for (pos, word) in phrase.split_whitespace().enumerate() {
        let index = index_of(word).ok_or_else(|| Error::UnknownWord {
            word: word.to_string(),
            position: pos + 1,
        })?;
        indices.push(index);
    }

    let entropy_bits = strength.bits();
    let mut bytes = Zeroizing::new(vec![0u8; strength.bytes()]);
    let mut cs: u8 = 0;
    for (w, index) in indices.iter().enumerate() {
        for b in 0..BITS_PER_WORD {
            let bit = ((index >> (BITS_PER_WORD - 1 - b)) & 1) as u8;
            let i = w * BITS_PER_WORD + b;
            if i < entropy_bits {
                bytes[i / 8] |= bit << (7 - i % 8);
            } else {
                cs = (cs << 1) | bit;
            }
        }
    }

    if checksum(&bytes, strength) != cs {
        return Err(Error::ChecksumMismatch);
    }

    Ok(Entropy { strength, bytes })
}
