use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use mnemoshare::cli::{Cli, Commands};
use mnemoshare::commands::{
    RecoverOptions, SeedSource, ShareInput, SplitOutcome, recover_seed, split_seed,
};
use mnemoshare::domain::{ShareCount, SplitConfig};

/// Read a mnemonic securely from stdin (hidden input when TTY available)
fn read_mnemonic() -> Result<Zeroizing<String>> {
    // Try to use TTY for secure input
    if atty::is(atty::Stream::Stdin) {
        eprintln!("Enter seed mnemonic (12, 15, 18, 21 or 24 words):");
        let line = Zeroizing::new(
            rpassword::read_password().context("Failed to read mnemonic from stdin")?,
        );
        Ok(Zeroizing::new(line.trim().to_string()))
    } else {
        // Non-interactive mode (piped input) - read directly from stdin
        let mut line = Zeroizing::new(String::new());
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read mnemonic from stdin")?;
        Ok(Zeroizing::new(line.trim().to_string()))
    }
}

/// Splits an input line into an optional leading index and the share words
fn parse_share_line(line: &str) -> Result<ShareInput> {
    let line = line.trim();
    let (first, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    if first.chars().all(|c| c.is_ascii_digit()) {
        let index: u8 = first
            .parse()
            .with_context(|| format!("Share index '{first}' must be between 1 and 255"))?;
        Ok(ShareInput {
            index: Some(index),
            phrase: Zeroizing::new(rest.trim().to_string()),
        })
    } else {
        Ok(ShareInput {
            index: None,
            phrase: Zeroizing::new(line.to_string()),
        })
    }
}

/// Read shares securely from stdin (hidden input when TTY available)
/// User should input shares one per line, followed by an empty line to finish
fn read_shares() -> Result<Vec<ShareInput>> {
    let mut shares = Vec::new();

    if atty::is(atty::Stream::Stdin) {
        // Interactive mode - use rpassword for hidden input
        eprintln!("Enter shares as 'INDEX WORDS...' (tagged shares need no index),");
        eprintln!("one per line, empty line to finish:");

        loop {
            let line = Zeroizing::new(
                rpassword::read_password().context("Failed to read share from stdin")?,
            );

            // Empty line signals we're done
            if line.trim().is_empty() {
                break;
            }

            shares.push(parse_share_line(&line)?);
        }
    } else {
        // Non-interactive mode - read from stdin
        for line in io::stdin().lock().lines() {
            let line = Zeroizing::new(line.context("Failed to read line from stdin")?);

            // Empty line signals we're done
            if line.trim().is_empty() {
                break;
            }

            shares.push(parse_share_line(&line)?);
        }
    }

    if shares.is_empty() {
        bail!("No shares provided");
    }

    Ok(shares)
}

fn print_split(outcome: &SplitOutcome) {
    if outcome.seed_generated {
        println!("MAIN SEED: {}", outcome.seed);
        println!();
    }
    for share in &outcome.shares {
        println!("SHARE #{}: {}", share.index, &*share.sentence);
    }
    println!();
    println!(
        "Any {} of these {} shares recover the seed. Share strength: {}.",
        outcome.threshold, *outcome.share_count, outcome.share_strength
    );
    println!("PRIME NUMBER USED: {}", outcome.prime);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            threshold,
            shares,
            share_strength,
            generate,
            tagged,
            json,
        } => {
            // Validate share count and create config before any secret is read
            let share_count = ShareCount::new(shares)?;
            let mut config = SplitConfig::new(threshold, share_count)?;
            if let Some(strength) = share_strength {
                config = config.with_share_strength(strength);
            }

            let outcome = match generate {
                Some(strength) => split_seed(SeedSource::Generate(strength), config, tagged)?,
                None => {
                    let mnemonic = read_mnemonic()?;
                    split_seed(SeedSource::Mnemonic(&mnemonic), config, tagged)?
                }
            };

            if json {
                println!("{}", &*outcome.to_json()?);
            } else {
                print_split(&outcome);
            }
        }
        Commands::Recover {
            seed_strength,
            prime,
        } => {
            let shares = read_shares()?;
            let outcome = recover_seed(
                &shares,
                &RecoverOptions {
                    seed_strength,
                    prime,
                },
            )?;

            eprintln!(
                "Recovered from shares {} using prime {}",
                outcome
                    .shares_used
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                outcome.prime
            );
            println!("{}", outcome.seed);
        }
    }

    Ok(())
}
