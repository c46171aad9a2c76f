//! Threshold newtype for Shamir Secret Sharing

use crate::error::{Error, Result};

/// Threshold for Shamir Secret Sharing (2..=255)
///
/// Invariant: threshold >= 2 (enforced at construction)
/// A threshold of 1 provides no security benefit since any single share can recover the entire secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u8);

impl Threshold {
    /// Smallest threshold that still splits the secret
    pub const MIN: u8 = 2;

    /// Creates a new threshold, returning an error if value < 2
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if the threshold is less than 2
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::Threshold;
    ///
    /// // Valid threshold (2 or greater)
    /// let threshold = Threshold::new(3).unwrap();
    /// assert_eq!(*threshold, 3);
    ///
    /// // Invalid: threshold must be at least 2
    /// assert!(Threshold::new(1).is_err());
    /// assert!(Threshold::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::MIN {
            return Err(Error::InvalidParameters(format!(
                "threshold must be at least 2 (got {value})"
            )));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for Threshold {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
