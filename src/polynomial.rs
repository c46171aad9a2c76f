//! Random polynomials over Z_p
//!
//! A polynomial only lives for the duration of one split. Its coefficients are
//! wiped when it is dropped.

use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::field::{FieldElement, PrimeField};

/// `c0 + c1*x + ... + cd*x^d` with `c0` the shared secret
pub struct Polynomial<'f> {
    field: &'f PrimeField,
    coefficients: Vec<FieldElement>,
}

impl<'f> Polynomial<'f> {
    /// Builds `[secret, c1, ..., c_degree]` with each `ci` uniform in `[0, p)`
    ///
    /// # Errors
    /// Returns [`Error::InsufficientEntropy`](crate::Error::InsufficientEntropy)
    /// if the random source fails; there is no fallback to a weaker source
    pub fn generate<R: RngCore + CryptoRng>(
        field: &'f PrimeField,
        secret: &FieldElement,
        degree: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(secret.clone());
        for _ in 0..degree {
            coefficients.push(field.random(rng)?);
        }
        Ok(Self {
            field,
            coefficients,
        })
    }

    /// Degree of the polynomial
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Value at `x`, by Horner's method
    #[must_use]
    pub fn evaluate(&self, x: &FieldElement) -> FieldElement {
        self.coefficients
            .iter()
            .rev()
            .fold(self.field.zero(), |acc, c| {
                self.field.add(&self.field.mul(&acc, x), c)
            })
    }
}
