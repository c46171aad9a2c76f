//! `ShareCount` newtype for Shamir Secret Sharing

use crate::error::{Error, Result};

/// Number of shares to create (1..=255)
///
/// Shares are evaluated at x = 1..=count and every x must be a valid
/// [`ShareIndex`](super::ShareIndex), so the count is capped at `u8::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShareCount(u8);

impl ShareCount {
    /// Minimum valid share count
    pub const MIN: u8 = 1;

    /// Maximum valid share count (255)
    pub const MAX: u8 = u8::MAX;

    /// Creates a new share count
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if count is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::ShareCount;
    ///
    /// let count = ShareCount::new(5).unwrap();
    /// assert_eq!(*count, 5);
    ///
    /// let max_count = ShareCount::new(ShareCount::MAX).unwrap();
    /// assert_eq!(*max_count, 255);
    ///
    /// assert!(ShareCount::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::MIN {
            return Err(Error::InvalidParameters(
                "share count must be at least 1".to_string(),
            ));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for ShareCount {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
