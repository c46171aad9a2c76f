//! Shamir Secret Sharing over Z_p
//!
//! [`split`] hides the secret as the constant term of a random polynomial of
//! degree `M - 1` and hands out its values at `x = 1..=N`. [`recover`] rebuilds
//! the constant term from any `M` of those points by Lagrange interpolation at
//! `x = 0`:
//!
//! ```text
//! secret = sum_i y_i * prod_{j != i} (0 - x_j) / (x_i - x_j)   (mod p)
//! ```
//!
//! Interpolation uses every share it is given. It cannot tell a consistent set of
//! shares from an inconsistent one: a wrong, foreign or missing share yields a
//! wrong secret, which only the mnemonic checksum (or a size check) downstream
//! can catch.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::{ShareCount, ShareIndex, Strength, Threshold};
use crate::error::{Error, Result};
use crate::field::{FieldElement, PrimeField, padded_bytes, wipe};
use crate::mnemonic::Entropy;
use crate::polynomial::Polynomial;

/// The shared secret: seed entropy read as a big-endian integer
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(BigUint);

impl Secret {
    /// Reads entropy as a big-endian integer
    #[must_use]
    pub fn from_entropy(entropy: &Entropy) -> Self {
        Self(BigUint::from_bytes_be(entropy.as_bytes()))
    }

    /// Writes the secret back as entropy of the given strength
    ///
    /// # Errors
    /// Returns [`Error::ValueTooLarge`] if the secret needs more bits than `strength`
    pub fn to_entropy(&self, strength: Strength) -> Result<Entropy> {
        let bytes = padded_bytes(&self.0, strength.bytes())?;
        Entropy::from_bytes(&bytes)
    }

    /// Bit length of the secret
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        wipe(&mut self.0);
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

/// One point `(index, P(index))` of the sharing polynomial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    index: ShareIndex,
    value: FieldElement,
}

impl Share {
    /// Pairs an index with a field value
    #[must_use]
    pub fn new(index: ShareIndex, value: FieldElement) -> Self {
        Self { index, value }
    }

    /// The x coordinate
    #[must_use]
    pub fn index(&self) -> ShareIndex {
        self.index
    }

    /// The y coordinate
    #[must_use]
    pub fn value(&self) -> &FieldElement {
        &self.value
    }
}

/// Splits `secret` into `count` shares, any `threshold` of which recover it
///
/// Shares are returned in index order `1..=count`.
///
/// # Errors
/// - [`Error::InvalidParameters`] if `threshold > count` or the secret is not
///   below the field prime
/// - [`Error::InsufficientEntropy`] if the random source fails
pub fn split<R: RngCore + CryptoRng>(
    secret: &Secret,
    threshold: Threshold,
    count: ShareCount,
    field: &PrimeField,
    rng: &mut R,
) -> Result<Vec<Share>> {
    if *threshold > *count {
        return Err(Error::InvalidParameters(format!(
            "threshold {} cannot exceed share count {}",
            *threshold, *count
        )));
    }
    let constant = field.element(secret.0.clone()).map_err(|_| {
        Error::InvalidParameters(format!(
            "the seed does not fit below the prime {}; choose a larger share strength",
            field.display()
        ))
    })?;

    let polynomial = Polynomial::generate(field, &constant, usize::from(*threshold) - 1, rng)?;
    debug!(
        threshold = *threshold,
        count = *count,
        degree = polynomial.degree(),
        "sharing polynomial generated"
    );

    (1..=*count)
        .map(|x| {
            Ok(Share {
                index: ShareIndex::new(x)?,
                value: polynomial.evaluate(&field.from_u64(u64::from(x))),
            })
        })
        .collect()
}

/// Recovers the secret from shares by Lagrange interpolation at `x = 0`
///
/// Supplying at least the split's threshold of shares is the caller's
/// responsibility; fewer (or inconsistent) shares produce a wrong secret
/// rather than an error.
///
/// # Errors
/// - [`Error::InvalidParameters`] if no share is given or a value is not below the prime
/// - [`Error::DuplicateShare`] if two shares carry the same index
pub fn recover(shares: &[Share], field: &PrimeField) -> Result<Secret> {
    if shares.is_empty() {
        return Err(Error::InvalidParameters("no shares provided".to_string()));
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if !seen.insert(share.index) {
            return Err(Error::DuplicateShare(*share.index));
        }
        if share.value.as_biguint() >= field.modulus() {
            return Err(Error::InvalidParameters(format!(
                "share #{} is not below the prime {}",
                share.index,
                field.display()
            )));
        }
    }

    let xs: Vec<FieldElement> = shares
        .iter()
        .map(|s| field.from_u64(u64::from(*s.index)))
        .collect();

    let mut secret = field.zero();
    for (i, share) in shares.iter().enumerate() {
        let mut numerator = field.one();
        let mut denominator = field.one();
        for (j, x_j) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = field.mul(&numerator, &field.neg(x_j));
            denominator = field.mul(&denominator, &field.sub(&xs[i], x_j));
        }
        let basis = field.mul(&numerator, &field.inv(&denominator)?);
        secret = field.add(&secret, &field.mul(share.value(), &basis));
    }
    debug!(shares = shares.len(), "secret interpolated");

    Ok(Secret(secret.as_biguint().clone()))
}
