use clap::{Parser, Subcommand};

use crate::domain::{Strength, Threshold};
use crate::field::PrimeField;
use crate::prime;

/// Validates that threshold is at least 2
/// A threshold of 1 defeats the purpose of Shamir Secret Sharing
/// (any single share would be able to recover the entire secret)
fn validate_threshold(s: &str) -> Result<Threshold, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    Threshold::new(value).map_err(|e| e.to_string())
}

/// Accepts an entropy strength in bits: 128, 160, 192, 224 or 256
fn parse_strength(s: &str) -> Result<Strength, String> {
    let bits: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    Strength::from_bits(bits).map_err(|e| e.to_string())
}

/// Accepts a prime as an expression such as `2^128 - 159`
fn parse_prime(s: &str) -> Result<PrimeField, String> {
    let value = prime::parse_expression(s).map_err(|e| e.to_string())?;
    PrimeField::new(value).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "mnemoshare")]
#[command(about = "Split BIP39 seed mnemonics into Shamir Secret Shares that are themselves BIP39 mnemonics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a seed mnemonic into shares (the seed is read from stdin)
    Split {
        /// Threshold: minimum number of shares needed to recover (must be >= 2)
        #[arg(short = 'M', long, default_value = "2", value_parser = validate_threshold)]
        threshold: Threshold,

        /// Number of shares to create
        #[arg(short = 'N', long, default_value_t = 3)]
        shares: u8,

        /// Share strength in bits; defaults to the seed strength and may not be lower
        #[arg(long, value_parser = parse_strength)]
        share_strength: Option<Strength>,

        /// Generate a fresh seed of this strength instead of reading one
        #[arg(long, value_name = "BITS", value_parser = parse_strength)]
        generate: Option<Strength>,

        /// Prefix each share with words carrying its threshold and index
        #[arg(long)]
        tagged: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recover a seed mnemonic from shares read from stdin
    ///
    /// Enter one share per line as `INDEX WORDS...`, or just the words for tagged
    /// shares. An empty line ends the input.
    Recover {
        /// Strength of the original seed in bits; defaults to the share strength
        #[arg(long, value_parser = parse_strength)]
        seed_strength: Option<Strength>,

        /// Prime used by the split, e.g. "2^128 - 159"; defaults to the share strength's prime
        #[arg(long, value_parser = parse_prime)]
        prime: Option<PrimeField>,
    },
}
