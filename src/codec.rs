//! Share mnemonics
//!
//! A share's field value is written as the entropy of an ordinary BIP39 mnemonic
//! of the share strength. This bare form is the default wire format: it carries
//! neither the share index nor the threshold nor the prime, which the holder
//! must record separately ("share 2 of 5, prime 2^128 - 159").
//!
//! # Tagged shares
//!
//! As an opt-in extension, one or two parameter words may be prepended to carry
//! the threshold (M) and share index (O):
//!
//! ```text
//! 11-bit parameter word = [continuation (1)][M bits (5)][O bits (5)]
//! ```
//!
//! When M or O does not fit in 5 bits, a first word with continuation = 1
//! carries the high bits and a second word with continuation = 0 the low bits.
//! Tagged sentences have 13, 14, 16, 17, ... 26 words, never a ladder count, so
//! both formats are recognized by word count alone.
//!
//! # Examples
//!
//! ```rust
//! use mnemoshare::codec::{ShareMnemonic, share_to_mnemonic, share_to_tagged_mnemonic};
//! use mnemoshare::domain::{ShareIndex, Strength, Threshold};
//! use mnemoshare::field::PrimeField;
//! use mnemoshare::sharing::Share;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let field = PrimeField::for_strength(Strength::Bits128);
//! let share = Share::new(ShareIndex::new(2)?, field.from_u64(0xBEEF));
//!
//! let bare = share_to_mnemonic(&share, Strength::Bits128)?;
//! assert_eq!(bare.word_count(), 12);
//!
//! let tagged = share_to_tagged_mnemonic(&share, Threshold::new(3)?, Strength::Bits128)?;
//! let parsed = ShareMnemonic::parse(tagged.as_str())?;
//! assert_eq!(parsed.threshold(), Some(Threshold::new(3)?));
//! assert_eq!(parsed.to_share(None, &field)?, share);
//! # Ok(())
//! # }
//! ```

use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::domain::{ShareIndex, Strength, Threshold};
use crate::error::{Error, Result};
use crate::field::PrimeField;
use crate::mnemonic::{self, Entropy, Mnemonic};
use crate::sharing::Share;

/// A tagged share sentence: parameter words followed by the bare share mnemonic
///
/// Wraps the sentence in `Zeroizing` to ensure secure memory cleanup.
#[derive(Clone, PartialEq)]
pub struct TaggedMnemonic(Zeroizing<String>);

impl TaggedMnemonic {
    /// Gets the sentence as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TaggedMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaggedMnemonic(<redacted>)")
    }
}

impl std::fmt::Display for TaggedMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &*self.0)
    }
}

/// Encodes a share's value as a bare mnemonic of `strength`
///
/// # Errors
/// Returns [`Error::ValueTooLarge`] if the value needs more than `strength` bits,
/// which cannot happen when the share comes from the tier prime of `strength`
pub fn share_to_mnemonic(share: &Share, strength: Strength) -> Result<Mnemonic> {
    let bytes = share.value().to_bytes_be_padded(strength.bytes())?;
    let entropy = Entropy::from_bytes(&bytes)?;
    Ok(mnemonic::encode(&entropy))
}

/// Decodes a bare share mnemonic; the index must come from the holder's records
///
/// # Errors
/// - Any [`mnemonic::decode`] error
/// - [`Error::InvalidParameters`] if the value is not below the field prime
pub fn mnemonic_to_share(
    mnemonic: &Mnemonic,
    index: ShareIndex,
    field: &PrimeField,
) -> Result<Share> {
    let entropy = mnemonic::decode(mnemonic.as_str())?;
    let value = field.element(BigUint::from_bytes_be(entropy.as_bytes()))?;
    Ok(Share::new(index, value))
}

/// Encodes a share with its threshold and index embedded in front
///
/// # Errors
/// Same as [`share_to_mnemonic`]
pub fn share_to_tagged_mnemonic(
    share: &Share,
    threshold: Threshold,
    strength: Strength,
) -> Result<TaggedMnemonic> {
    let bare = share_to_mnemonic(share, strength)?;
    let mut sentence = Zeroizing::new(encode_parameters(threshold, share.index())?.join(" "));
    sentence.push(' ');
    sentence.push_str(bare.as_str());
    Ok(TaggedMnemonic(sentence))
}

/// A parsed share sentence, bare or tagged
#[derive(Debug, Clone, PartialEq)]
pub struct ShareMnemonic {
    threshold: Option<Threshold>,
    index: Option<ShareIndex>,
    mnemonic: Mnemonic,
}

impl ShareMnemonic {
    /// Parses a bare or tagged share sentence, verifying its checksum
    ///
    /// # Errors
    /// - [`Error::InvalidWordCount`] if neither format fits the word count
    /// - [`Error::UnknownWord`] with the position in the full sentence
    /// - [`Error::ChecksumMismatch`] if the share words fail their checksum
    /// - [`Error::InvalidParameters`] if the parameter words are malformed
    pub fn parse(phrase: &str) -> Result<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();

        if Strength::from_word_count(words.len()).is_ok() {
            return Ok(Self {
                threshold: None,
                index: None,
                mnemonic: Mnemonic::parse(phrase)?,
            });
        }

        let first = words.first().ok_or(Error::InvalidWordCount(0))?;
        let first_index = mnemonic::index_of(first).ok_or_else(|| Error::UnknownWord {
            word: (*first).to_string(),
            position: 1,
        })?;
        let param_word_count = if (first_index >> 10) & 1 == 1 { 2 } else { 1 };

        if words.len() <= param_word_count {
            return Err(Error::InvalidWordCount(words.len()));
        }
        Strength::from_word_count(words.len() - param_word_count)
            .map_err(|_| Error::InvalidWordCount(words.len()))?;

        let (threshold, index) = decode_parameters(&words[..param_word_count])?;
        let rest = Zeroizing::new(words[param_word_count..].join(" "));
        let mnemonic = Mnemonic::parse(&rest).map_err(|e| match e {
            Error::UnknownWord { word, position } => Error::UnknownWord {
                word,
                position: position + param_word_count,
            },
            other => other,
        })?;

        Ok(Self {
            threshold: Some(threshold),
            index: Some(index),
            mnemonic,
        })
    }

    /// Embedded threshold, for tagged shares
    #[must_use]
    pub fn threshold(&self) -> Option<Threshold> {
        self.threshold
    }

    /// Embedded index, for tagged shares
    #[must_use]
    pub fn index(&self) -> Option<ShareIndex> {
        self.index
    }

    /// Strength of the share words
    #[must_use]
    pub fn strength(&self) -> Strength {
        // Mnemonic::parse guarantees a ladder word count
        Strength::from_word_count(self.mnemonic.word_count()).unwrap_or(Strength::Bits128)
    }

    /// The bare share mnemonic
    #[must_use]
    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    /// Resolves the share, taking the index from the tag or from `index`
    ///
    /// # Errors
    /// - [`Error::InvalidParameters`] if no index is known, or the supplied index
    ///   disagrees with the embedded one, or the value is not below the prime
    pub fn to_share(&self, index: Option<ShareIndex>, field: &PrimeField) -> Result<Share> {
        let index = match (self.index, index) {
            (Some(embedded), Some(given)) if embedded != given => {
                return Err(Error::InvalidParameters(format!(
                    "share is tagged as #{embedded} but was entered as #{given}"
                )));
            }
            (Some(i), _) | (None, Some(i)) => i,
            (None, None) => {
                return Err(Error::InvalidParameters(
                    "share index is required for untagged shares".to_string(),
                ));
            }
        };
        mnemonic_to_share(&self.mnemonic, index, field)
    }
}

/// Encodes threshold (M) and share index (O) into BIP39 words
///
/// Uses 11-bit word encoding: [`continuation_bit` (1)][M bits (5)][O bits (5)]
/// - `continuation_bit` = 1: more words follow
/// - `continuation_bit` = 0: final word
fn encode_parameters(threshold: Threshold, index: ShareIndex) -> Result<Vec<&'static str>> {
    let m = u16::from(*threshold);
    let o = u16::from(*index);

    // We need continuation if either M or O requires more than 5 bits
    let needs_continuation = m >= 32 || o >= 32;

    let mut codes = Vec::with_capacity(2);
    if needs_continuation {
        // First word: continuation=1, M high bits (bits 5-9), O high bits (bits 5-9)
        codes.push((1 << 10) | (((m >> 5) & 0b11111) << 5) | ((o >> 5) & 0b11111));
        // Second word: continuation=0, M low bits (bits 0-4), O low bits (bits 0-4)
        codes.push(((m & 0b11111) << 5) | (o & 0b11111));
    } else {
        codes.push((m << 5) | o);
    }

    codes
        .into_iter()
        .map(|code| {
            mnemonic::word_at(code).ok_or_else(|| {
                Error::InvalidParameters(format!("parameter code {code} out of range"))
            })
        })
        .collect()
}

/// Decodes threshold and share index from BIP39 parameter words
fn decode_parameters(words: &[&str]) -> Result<(Threshold, ShareIndex)> {
    let code = |pos: usize| -> Result<u16> {
        let word = words
            .get(pos)
            .ok_or_else(|| Error::InvalidParameters("missing parameter word".to_string()))?;
        mnemonic::index_of(word).ok_or_else(|| Error::UnknownWord {
            word: (*word).to_string(),
            position: pos + 1,
        })
    };

    let first = code(0)?;
    let (m, o) = if (first >> 10) & 1 == 1 {
        let second = code(1)?;
        if (second >> 10) & 1 != 0 {
            return Err(Error::InvalidParameters(
                "second parameter word has continuation bit set".to_string(),
            ));
        }
        // Combine into full values (10 bits each)
        (
            (((first >> 5) & 0b11111) << 5) | ((second >> 5) & 0b11111),
            ((first & 0b11111) << 5) | (second & 0b11111),
        )
    } else {
        ((first >> 5) & 0b11111, first & 0b11111)
    };

    let m = u8::try_from(m)
        .map_err(|_| Error::InvalidParameters(format!("threshold {m} exceeds 255")))?;
    let o = u8::try_from(o)
        .map_err(|_| Error::InvalidParameters(format!("share index {o} exceeds 255")))?;

    Ok((Threshold::new(m)?, ShareIndex::new(o)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn share(index: u8, field: &PrimeField) -> Share {
        Share::new(ShareIndex::new(index).unwrap(), field.random(&mut OsRng).unwrap())
    }

    #[test]
    fn test_single_word_parameters() {
        // M=2, O=1 should fit in single word
        let words =
            encode_parameters(Threshold::new(2).unwrap(), ShareIndex::new(1).unwrap()).unwrap();
        assert_eq!(words.len(), 1);

        let (m, o) = decode_parameters(&words).unwrap();
        assert_eq!(*m, 2);
        assert_eq!(*o, 1);
    }

    #[test]
    fn test_two_word_parameters() {
        // M=35, O=10 requires two words
        let words =
            encode_parameters(Threshold::new(35).unwrap(), ShareIndex::new(10).unwrap()).unwrap();
        assert_eq!(words.len(), 2);

        let (m, o) = decode_parameters(&words).unwrap();
        assert_eq!(*m, 35);
        assert_eq!(*o, 10);
    }

    #[test]
    fn test_maximum_parameters() {
        let words =
            encode_parameters(Threshold::new(255).unwrap(), ShareIndex::new(255).unwrap()).unwrap();
        let (m, o) = decode_parameters(&words).unwrap();
        assert_eq!((*m, *o), (255, 255));
    }

    #[test]
    fn test_parameter_word_rejects_threshold_one() {
        // M=1, O=1 -> code 33
        let word = mnemonic::word_at(33).unwrap();
        assert!(matches!(
            decode_parameters(&[word]),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_bare_round_trip_every_strength() {
        for strength in Strength::ALL {
            let field = PrimeField::for_strength(strength);
            let original = share(4, &field);

            let m = share_to_mnemonic(&original, strength).unwrap();
            assert_eq!(m.word_count(), strength.word_count());

            let back = mnemonic_to_share(&m, original.index(), &field).unwrap();
            assert_eq!(back, original);
        }
    }

    #[test]
    fn test_small_value_padded_to_strength() {
        let field = PrimeField::for_strength(Strength::Bits256);
        let s = Share::new(ShareIndex::new(1).unwrap(), field.zero());
        let m = share_to_mnemonic(&s, Strength::Bits256).unwrap();
        assert!(m.as_str().ends_with("abandon art"));
    }

    #[test]
    fn test_value_too_large_for_strength() {
        let field = PrimeField::for_strength(Strength::Bits256);
        let s = Share::new(ShareIndex::new(1).unwrap(), field.reduce(BigUint::from(1u8) << 200));
        assert!(matches!(
            share_to_mnemonic(&s, Strength::Bits128),
            Err(Error::ValueTooLarge { strength: 128, .. })
        ));
    }

    #[test]
    fn test_mnemonic_above_prime_rejected() {
        // all-ones entropy is above 2^128 - 159
        let field = PrimeField::for_strength(Strength::Bits128);
        let m = Mnemonic::parse("zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong").unwrap();
        assert!(matches!(
            mnemonic_to_share(&m, ShareIndex::new(1).unwrap(), &field),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_tagged_round_trip() {
        let field = PrimeField::for_strength(Strength::Bits192);
        for (m, i) in [(2u8, 1u8), (3, 31), (40, 7), (5, 200)] {
            let original = share(i, &field);
            let threshold = Threshold::new(m).unwrap();
            let tagged = share_to_tagged_mnemonic(&original, threshold, Strength::Bits192).unwrap();

            let parsed = ShareMnemonic::parse(tagged.as_str()).unwrap();
            assert_eq!(parsed.threshold(), Some(threshold));
            assert_eq!(parsed.index(), Some(original.index()));
            assert_eq!(parsed.strength(), Strength::Bits192);
            assert_eq!(parsed.to_share(None, &field).unwrap(), original);
        }
    }

    #[test]
    fn test_tagged_word_counts_avoid_ladder() {
        let field = PrimeField::for_strength(Strength::Bits128);
        let one = share_to_tagged_mnemonic(&share(1, &field), Threshold::new(2).unwrap(), Strength::Bits128)
            .unwrap();
        let two = share_to_tagged_mnemonic(&share(99, &field), Threshold::new(2).unwrap(), Strength::Bits128)
            .unwrap();
        assert_eq!(one.as_str().split(' ').count(), 13);
        assert_eq!(two.as_str().split(' ').count(), 14);
    }

    #[test]
    fn test_bare_share_requires_index() {
        let field = PrimeField::for_strength(Strength::Bits128);
        let m = share_to_mnemonic(&share(3, &field), Strength::Bits128).unwrap();
        let parsed = ShareMnemonic::parse(m.as_str()).unwrap();

        assert_eq!(parsed.threshold(), None);
        assert!(matches!(
            parsed.to_share(None, &field),
            Err(Error::InvalidParameters(_))
        ));
        assert!(parsed.to_share(Some(ShareIndex::new(3).unwrap()), &field).is_ok());
    }

    #[test]
    fn test_tagged_index_conflict() {
        let field = PrimeField::for_strength(Strength::Bits128);
        let tagged =
            share_to_tagged_mnemonic(&share(3, &field), Threshold::new(2).unwrap(), Strength::Bits128)
                .unwrap();
        let parsed = ShareMnemonic::parse(tagged.as_str()).unwrap();

        assert!(parsed.to_share(Some(ShareIndex::new(3).unwrap()), &field).is_ok());
        assert!(matches!(
            parsed.to_share(Some(ShareIndex::new(4).unwrap()), &field),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_unknown_word_position_counts_parameter_words() {
        let field = PrimeField::for_strength(Strength::Bits128);
        let tagged =
            share_to_tagged_mnemonic(&share(1, &field), Threshold::new(2).unwrap(), Strength::Bits128)
                .unwrap();
        let mut words: Vec<&str> = tagged.as_str().split(' ').collect();
        words[4] = "notaword";

        assert_eq!(
            ShareMnemonic::parse(&words.join(" ")).unwrap_err(),
            Error::UnknownWord {
                word: "notaword".to_string(),
                position: 5
            }
        );
    }

    #[test]
    fn test_bad_word_counts() {
        let eleven = vec!["abandon"; 11].join(" ");
        assert!(matches!(
            ShareMnemonic::parse(&eleven),
            Err(Error::InvalidWordCount(11))
        ));
        assert!(matches!(
            ShareMnemonic::parse(""),
            Err(Error::InvalidWordCount(0))
        ));
    }

    #[test]
    fn test_checksum_validation_detects_corruption() {
        let field = PrimeField::for_strength(Strength::Bits128);
        let tagged =
            share_to_tagged_mnemonic(&share(2, &field), Threshold::new(2).unwrap(), Strength::Bits128)
                .unwrap();
        let mut words: Vec<&str> = tagged.as_str().split(' ').collect();
        let last = words.len() - 1;
        // flipping the lowest bit of the last word flips a checksum bit only
        let flipped = mnemonic::index_of(words[last]).unwrap() ^ 1;
        words[last] = mnemonic::word_at(flipped).unwrap();

        assert_eq!(
            ShareMnemonic::parse(&words.join(" ")).unwrap_err(),
            Error::ChecksumMismatch
        );
    }
}
