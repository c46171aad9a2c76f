//! Domain types for Shamir Secret Sharing
//!
//! This module contains validated newtypes and configuration for secure secret sharing:
//! - [`Strength`] - Entropy length on the 128..=256-bit BIP39 ladder
//! - [`Threshold`] - Minimum shares required for reconstruction (2..=255)
//! - [`ShareIndex`] - Share identifier and x coordinate (1..=255)
//! - [`ShareCount`] - Total number of shares to create (1..=255)
//! - [`SplitConfig`] - Validated threshold, share count and share strength

mod config;
mod share_count;
mod share_index;
mod strength;
mod threshold;

pub use config::SplitConfig;
pub use share_count::ShareCount;
pub use share_index::ShareIndex;
pub use strength::Strength;
pub use threshold::Threshold;
