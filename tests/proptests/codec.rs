//! Property tests for mnemonic and share encoding

use bip39::Mnemonic as Bip39Mnemonic;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use mnemoshare::Error;
use mnemoshare::codec::{self, ShareMnemonic};
use mnemoshare::domain::{ShareIndex, Strength, Threshold};
use mnemoshare::field::PrimeField;
use mnemoshare::mnemonic::{self, Entropy};
use mnemoshare::sharing::Share;

/// Wrapper for random entropy of any ladder strength
#[derive(Clone, Debug)]
struct ValidEntropy(Vec<u8>);

impl Arbitrary for ValidEntropy {
    fn arbitrary(g: &mut Gen) -> Self {
        let strength = *g.choose(&Strength::ALL).unwrap_or(&Strength::Bits128);
        let bytes = (0..strength.bytes()).map(|_| u8::arbitrary(g)).collect();
        ValidEntropy(bytes)
    }
}

/// Wrapper for valid tagged-share parameters
#[derive(Clone, Copy, Debug)]
struct TagParams {
    threshold: u8,
    index: u8,
}

impl Arbitrary for TagParams {
    fn arbitrary(g: &mut Gen) -> Self {
        // 2..=255 and 1..=255
        let threshold = (u8::arbitrary(g) % 254) + 2;
        let index = (u8::arbitrary(g) % 255) + 1;
        TagParams { threshold, index }
    }
}

/// Encoding then decoding returns the entropy and agrees with the bip39 crate
#[quickcheck]
fn prop_mnemonic_matches_bip39_crate(entropy: ValidEntropy) -> bool {
    let ValidEntropy(bytes) = entropy;
    let Ok(entropy) = Entropy::from_bytes(&bytes) else {
        return false;
    };
    let ours = mnemonic::encode(&entropy);
    let Ok(theirs) = Bip39Mnemonic::from_entropy(&bytes) else {
        return false;
    };

    ours.as_str() == theirs.to_string()
        && mnemonic::decode(ours.as_str()).is_ok_and(|back| back.as_bytes() == bytes.as_slice())
}

/// Flipping any checksum bit is always detected
#[quickcheck]
fn prop_checksum_bit_flip_detected(entropy: ValidEntropy, bit: u8) -> bool {
    let ValidEntropy(bytes) = entropy;
    let Ok(entropy) = Entropy::from_bytes(&bytes) else {
        return false;
    };
    let sentence = mnemonic::encode(&entropy);
    let mut words: Vec<&str> = sentence.words().collect();

    // the checksum occupies the low bits of the last word
    let bit = usize::from(bit) % entropy.strength().checksum_bits();
    let last = words.len() - 1;
    let Some(code) = mnemonic::index_of(words[last]) else {
        return false;
    };
    let Some(flipped) = mnemonic::word_at(code ^ (1 << bit)) else {
        return false;
    };
    words[last] = flipped;

    mnemonic::decode(&words.join(" ")).is_err_and(|e| e == Error::ChecksumMismatch)
}

/// Flipping an entropy bit never decodes back to the original entropy
#[quickcheck]
fn prop_entropy_bit_flip_never_silent(entropy: ValidEntropy, word: u8, bit: u8) -> bool {
    let ValidEntropy(bytes) = entropy;
    let Ok(entropy) = Entropy::from_bytes(&bytes) else {
        return false;
    };
    let sentence = mnemonic::encode(&entropy);
    let mut words: Vec<&str> = sentence.words().collect();

    // every word but the last is pure entropy
    let pos = usize::from(word) % (words.len() - 1);
    let Some(code) = mnemonic::index_of(words[pos]) else {
        return false;
    };
    let Some(flipped) = mnemonic::word_at(code ^ (1 << (bit % 11))) else {
        return false;
    };
    words[pos] = flipped;

    match mnemonic::decode(&words.join(" ")) {
        Ok(decoded) => decoded.as_bytes() != bytes.as_slice(),
        Err(e) => e == Error::ChecksumMismatch,
    }
}

/// Tagged shares carry their threshold and index through encoding
#[quickcheck]
fn prop_tagged_metadata_preserved(entropy: ValidEntropy, params: TagParams) -> bool {
    let ValidEntropy(bytes) = entropy;
    let Ok(strength) = Strength::from_entropy_len(bytes.len()) else {
        return false;
    };
    let field = PrimeField::for_strength(strength);
    let Ok(threshold) = Threshold::new(params.threshold) else {
        return false;
    };
    let Ok(index) = ShareIndex::new(params.index) else {
        return false;
    };

    // reduce so the value is a valid field element
    let value = field.reduce(num_bigint::BigUint::from_bytes_be(&bytes));
    let share = Share::new(index, value);

    let Ok(tagged) = codec::share_to_tagged_mnemonic(&share, threshold, strength) else {
        return false;
    };
    let Ok(parsed) = ShareMnemonic::parse(tagged.as_str()) else {
        return false;
    };

    let expected_words = strength.word_count() + if params.threshold >= 32 || params.index >= 32 { 2 } else { 1 };

    parsed.threshold() == Some(threshold)
        && parsed.index() == Some(index)
        && parsed.strength() == strength
        && tagged.as_str().split(' ').count() == expected_words
        && parsed.to_share(None, &field).is_ok_and(|s| s == share)
}
