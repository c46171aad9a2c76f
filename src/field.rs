//! Arithmetic in Z_p for a prime p
//!
//! All values are arbitrary precision ([`BigUint`]) so the 256-bit tier never
//! overflows. Intermediate products are wiped once reduced; `num-bigint` offers no
//! constant-time guarantees, so timing is kept uniform only at the level of the
//! operations performed (no branches on secret values in this module).

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::domain::Strength;
use crate::error::{Error, Result};
use crate::prime;

/// Attempts before rejection sampling gives up on the random source
const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// Overwrites every limb of `value` with zeros, then leaves it as zero.
///
/// Clearing bit by bit from the least significant end keeps the allocation in
/// place until the top limb is cleared, so every limb is overwritten.
pub(crate) fn wipe(value: &mut BigUint) {
    let bits = value.bits();
    for bit in 0..bits {
        value.set_bit(bit, false);
    }
}

/// An element of Z_p, always reduced below the modulus of the field that made it
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// The element as an integer in `[0, p)`
    #[must_use]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Bit length of the element
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Whether the element is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Big-endian bytes left-padded with zeros to exactly `len` bytes
    ///
    /// # Errors
    /// Returns [`Error::ValueTooLarge`] if the element needs more than `len` bytes
    pub fn to_bytes_be_padded(&self, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        padded_bytes(&self.0, len)
    }
}

/// Big-endian bytes of `value`, left-padded with zeros to exactly `len` bytes
pub(crate) fn padded_bytes(value: &BigUint, len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if value.bits() > (len * 8) as u64 {
        return Err(Error::ValueTooLarge {
            bits: value.bits(),
            strength: len * 8,
        });
    }
    let mut out = Zeroizing::new(vec![0u8; len]);
    // to_bytes_be() yields [0] for zero; the padded buffer is already all zeros
    if !value.is_zero() {
        let raw = Zeroizing::new(value.to_bytes_be());
        out[len - raw.len()..].copy_from_slice(&raw);
    }
    Ok(out)
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        wipe(&mut self.0);
    }
}

impl Drop for FieldElement {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement(<redacted>)")
    }
}

/// The field Z_p
///
/// # Examples
///
/// ```rust
/// use mnemoshare::domain::Strength;
/// use mnemoshare::field::PrimeField;
///
/// let field = PrimeField::for_strength(Strength::Bits128);
/// let a = field.from_u64(7);
/// let b = field.from_u64(5);
///
/// let quotient = field.mul(&a, &field.inv(&b).unwrap());
/// assert_eq!(field.mul(&quotient, &b), a);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// The field of a strength tier, using the versioned tier prime
    #[must_use]
    pub fn for_strength(strength: Strength) -> Self {
        Self {
            modulus: prime::tier_prime(strength),
        }
    }

    /// A field over a caller-supplied prime
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if `modulus` fails the primality test
    pub fn new(modulus: BigUint) -> Result<Self> {
        if !prime::is_probable_prime(&modulus) {
            return Err(Error::InvalidParameters(format!(
                "{} is not a prime number",
                prime::display(&modulus)
            )));
        }
        Ok(Self { modulus })
    }

    /// The prime p
    #[must_use]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Short printable form of p
    #[must_use]
    pub fn display(&self) -> String {
        prime::display(&self.modulus)
    }

    /// Reduces an integer into the field, wiping the input
    #[must_use]
    pub fn reduce(&self, mut value: BigUint) -> FieldElement {
        let reduced = &value % &self.modulus;
        wipe(&mut value);
        FieldElement(reduced)
    }

    /// Wraps an integer already in `[0, p)`
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if `value >= p`
    pub fn element(&self, mut value: BigUint) -> Result<FieldElement> {
        if value >= self.modulus {
            wipe(&mut value);
            return Err(Error::InvalidParameters(format!(
                "value is not below the prime {}",
                self.display()
            )));
        }
        Ok(FieldElement(value))
    }

    /// The element `value mod p`
    #[must_use]
    pub fn from_u64(&self, value: u64) -> FieldElement {
        self.reduce(BigUint::from(value))
    }

    /// Additive identity
    #[must_use]
    pub fn zero(&self) -> FieldElement {
        FieldElement(BigUint::zero())
    }

    /// Multiplicative identity
    #[must_use]
    pub fn one(&self) -> FieldElement {
        FieldElement(BigUint::one())
    }

    /// `a + b mod p`
    #[must_use]
    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        self.reduce(&a.0 + &b.0)
    }

    /// `a - b mod p`
    #[must_use]
    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let mut shifted = &a.0 + &self.modulus;
        shifted -= &b.0;
        self.reduce(shifted)
    }

    /// `-a mod p`
    #[must_use]
    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        self.sub(&self.zero(), a)
    }

    /// `a * b mod p`
    #[must_use]
    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        self.reduce(&a.0 * &b.0)
    }

    /// `a^-1 mod p`, computed as `a^(p-2)` since p is prime
    ///
    /// # Errors
    /// Returns [`Error::NotInvertible`] if `a` is zero
    pub fn inv(&self, a: &FieldElement) -> Result<FieldElement> {
        if a.0.is_zero() {
            return Err(Error::NotInvertible);
        }
        let exponent = &self.modulus - 2u32;
        Ok(FieldElement(a.0.modpow(&exponent, &self.modulus)))
    }

    /// A uniformly random element of `[0, p)`
    ///
    /// Draws `bits(p)` random bits and rejects values `>= p`.
    ///
    /// # Errors
    /// Returns [`Error::InsufficientEntropy`] if the random source fails or keeps
    /// producing out-of-range values
    pub fn random<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<FieldElement> {
        let bits = self.modulus.bits();
        let len = bits.div_ceil(8) as usize;
        let excess = len as u64 * 8 - bits;
        let mut buf = Zeroizing::new(vec![0u8; len]);

        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            rng.try_fill_bytes(&mut buf)
                .map_err(|e| Error::InsufficientEntropy(e.to_string()))?;
            buf[0] &= 0xff >> excess;
            let candidate = BigUint::from_bytes_be(&buf);
            if let Ok(element) = self.element(candidate) {
                return Ok(element);
            }
        }
        Err(Error::InsufficientEntropy(
            "random source keeps producing out-of-range values".to_string(),
        ))
    }
}
