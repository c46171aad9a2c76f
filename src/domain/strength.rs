//! Entropy strength ladder

use crate::error::{Error, Result};

/// Entropy length of a seed or share, drawn from the BIP39 ladder
///
/// | strength | bytes | checksum bits | words |
/// |---------:|------:|--------------:|------:|
/// | 128      | 16    | 4             | 12    |
/// | 160      | 20    | 5             | 15    |
/// | 192      | 24    | 6             | 18    |
/// | 224      | 28    | 7             | 21    |
/// | 256      | 32    | 8             | 24    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    Bits128,
    Bits160,
    Bits192,
    Bits224,
    Bits256,
}

impl Strength {
    /// Every strength, weakest first
    pub const ALL: [Strength; 5] = [
        Strength::Bits128,
        Strength::Bits160,
        Strength::Bits192,
        Strength::Bits224,
        Strength::Bits256,
    ];

    /// Looks up a strength by its bit count
    ///
    /// # Errors
    /// Returns [`Error::InvalidStrength`] if `bits` is not on the ladder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::Strength;
    ///
    /// assert_eq!(Strength::from_bits(192).unwrap(), Strength::Bits192);
    /// assert!(Strength::from_bits(512).is_err());
    /// ```
    pub fn from_bits(bits: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.bits() == bits)
            .ok_or(Error::InvalidStrength(bits))
    }

    /// Looks up a strength by the length of its entropy in bytes
    ///
    /// # Errors
    /// Returns [`Error::InvalidStrength`] if `len * 8` is not on the ladder
    pub fn from_entropy_len(len: usize) -> Result<Self> {
        Self::from_bits(len * 8)
    }

    /// Looks up a strength by mnemonic word count
    ///
    /// # Errors
    /// Returns [`Error::InvalidWordCount`] if `count` is not 12, 15, 18, 21 or 24
    pub fn from_word_count(count: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.word_count() == count)
            .ok_or(Error::InvalidWordCount(count))
    }

    /// Entropy bits
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Strength::Bits128 => 128,
            Strength::Bits160 => 160,
            Strength::Bits192 => 192,
            Strength::Bits224 => 224,
            Strength::Bits256 => 256,
        }
    }

    /// Entropy bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }

    /// Checksum bits appended to the entropy (one per 32 bits of entropy)
    #[must_use]
    pub const fn checksum_bits(self) -> usize {
        self.bits() / 32
    }

    /// Words in a mnemonic of this strength
    #[must_use]
    pub const fn word_count(self) -> usize {
        (self.bits() + self.checksum_bits()) / 11
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counts_follow_ladder() {
        let counts: Vec<_> = Strength::ALL.iter().map(|s| s.word_count()).collect();
        assert_eq!(counts, vec![12, 15, 18, 21, 24]);
    }

    #[test]
    fn test_bits_are_whole_words() {
        for s in Strength::ALL {
            assert_eq!((s.bits() + s.checksum_bits()) % 11, 0);
        }
    }

    #[test]
    fn test_lookups_reject_off_ladder_values() {
        assert_eq!(Strength::from_bits(100), Err(Error::InvalidStrength(100)));
        assert_eq!(Strength::from_word_count(13), Err(Error::InvalidWordCount(13)));
        assert_eq!(Strength::from_entropy_len(17), Err(Error::InvalidStrength(136)));
        assert_eq!(Strength::from_entropy_len(32).unwrap(), Strength::Bits256);
    }

    #[test]
    fn test_ordering_matches_bits() {
        assert!(Strength::Bits128 < Strength::Bits256);
        assert!(Strength::Bits224 > Strength::Bits192);
    }
}
