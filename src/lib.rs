// Library backing the mnemoshare binary; also used by the integration tests

#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod commands;
pub mod domain;
pub mod error;
pub mod field;
pub mod mnemonic;
pub mod polynomial;
pub mod prime;
pub mod sharing;

pub use error::{Error, Result};
