//! Configuration validation for Shamir Secret Sharing splits

use super::{ShareCount, Strength, Threshold};
use crate::error::{Error, Result};

/// Validated split parameters
///
/// Enforces the invariant that threshold <= `share_count` at the type level.
/// This prevents creating configurations where more shares are required
/// than actually exist. The share strength is checked against the seed once
/// the seed is known, see [`SplitConfig::share_strength_for`].
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    threshold: Threshold,
    share_count: ShareCount,
    share_strength: Option<Strength>,
}

impl SplitConfig {
    /// Creates a new split configuration
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if threshold exceeds share count
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::{SplitConfig, Threshold, ShareCount};
    ///
    /// // Valid: threshold <= share_count
    /// let config = SplitConfig::new(
    ///     Threshold::new(3).unwrap(),
    ///     ShareCount::new(5).unwrap()
    /// ).unwrap();
    ///
    /// assert_eq!(*config.threshold(), 3);
    /// assert_eq!(*config.share_count(), 5);
    ///
    /// // Invalid: threshold > share_count
    /// let result = SplitConfig::new(
    ///     Threshold::new(5).unwrap(),
    ///     ShareCount::new(3).unwrap()
    /// );
    /// assert!(result.is_err());
    /// ```
    pub fn new(threshold: Threshold, share_count: ShareCount) -> Result<Self> {
        if *threshold > *share_count {
            return Err(Error::InvalidParameters(format!(
                "threshold {} cannot exceed share count {}; the seed would be irrecoverable",
                *threshold, *share_count
            )));
        }
        Ok(Self {
            threshold,
            share_count,
            share_strength: None,
        })
    }

    /// Requests shares of a fixed strength instead of the seed's own
    #[must_use]
    pub fn with_share_strength(mut self, strength: Strength) -> Self {
        self.share_strength = Some(strength);
        self
    }

    /// Gets the threshold value
    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Gets the share count value
    #[must_use]
    pub fn share_count(&self) -> ShareCount {
        self.share_count
    }

    /// Resolves the share strength for a seed of strength `seed`
    ///
    /// Defaults to the seed strength when none was requested.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] if the requested share strength is
    /// weaker than the seed
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mnemoshare::domain::{ShareCount, SplitConfig, Strength, Threshold};
    ///
    /// let config = SplitConfig::new(Threshold::new(2).unwrap(), ShareCount::new(3).unwrap())
    ///     .unwrap()
    ///     .with_share_strength(Strength::Bits128);
    ///
    /// assert_eq!(config.share_strength_for(Strength::Bits128).unwrap(), Strength::Bits128);
    /// assert!(config.share_strength_for(Strength::Bits256).is_err());
    /// ```
    pub fn share_strength_for(&self, seed: Strength) -> Result<Strength> {
        match self.share_strength {
            None => Ok(seed),
            Some(share) if share < seed => Err(Error::InvalidParameters(format!(
                "share strength ({}) must be greater than or equal to seed strength ({})",
                share.bits(),
                seed.bits()
            ))),
            Some(share) => Ok(share),
        }
    }
}
