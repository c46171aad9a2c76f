//! `ShareIndex` newtype for Shamir Secret Sharing

use crate::error::{Error, Result};

/// Share index (1..=255)
///
/// The x coordinate a share was evaluated at. Zero is excluded because the
/// polynomial's value at zero is the secret itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareIndex(u8);

impl ShareIndex {
    /// Minimum valid share index (1)
    pub const MIN: u8 = 1;

    /// Maximum valid share index (255)
    pub const MAX: u8 = u8::MAX;

    /// Creates a new share index
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if index is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::ShareIndex;
    ///
    /// let index = ShareIndex::new(1).unwrap();
    /// assert_eq!(*index, 1);
    ///
    /// let max_index = ShareIndex::new(ShareIndex::MAX).unwrap();
    /// assert_eq!(*max_index, 255);
    ///
    /// // Invalid: x = 0 would hand out the secret itself
    /// assert!(ShareIndex::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::MIN {
            return Err(Error::InvalidParameters(
                "share index 0 is reserved for the secret".to_string(),
            ));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for ShareIndex {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ShareIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
