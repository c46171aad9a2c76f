use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use rand::rngs::OsRng;
use rand::seq::index::sample;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::codec::{self, ShareMnemonic};
use crate::domain::{ShareCount, ShareIndex, SplitConfig, Strength, Threshold};
use crate::field::PrimeField;
use crate::mnemonic::{self, Entropy, Mnemonic};
use crate::prime;
use crate::sharing::{self, Secret, Share};

/// Largest number of share subsets recovered during the split self-check
const MAX_SELF_CHECKS: usize = 100;

/// Where the seed to split comes from
#[derive(Debug, Clone, Copy)]
pub enum SeedSource<'a> {
    /// A mnemonic typed by the user
    Mnemonic(&'a str),
    /// Fresh entropy of the given strength from the OS random source
    Generate(Strength),
}

/// One share as handed to its holder
#[derive(Clone)]
pub struct IssuedShare {
    /// The x coordinate; the holder must record it with the words
    pub index: ShareIndex,
    /// Bare or tagged share sentence
    pub sentence: Zeroizing<String>,
}

impl std::fmt::Debug for IssuedShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedShare")
            .field("index", &self.index)
            .field("sentence", &"<redacted>")
            .finish()
    }
}

/// Everything a split produces
#[derive(Debug)]
pub struct SplitOutcome {
    /// The seed that was split, normalized
    pub seed: Mnemonic,
    /// Whether the seed was generated by this split
    pub seed_generated: bool,
    pub seed_strength: Strength,
    pub share_strength: Strength,
    pub threshold: Threshold,
    pub share_count: ShareCount,
    /// Short form of the prime used
    pub prime: String,
    pub shares: Vec<IssuedShare>,
}

#[derive(Serialize)]
struct SplitReport<'a> {
    seed: &'a str,
    seed_generated: bool,
    seed_strength: usize,
    share_strength: usize,
    threshold: u8,
    share_count: u8,
    prime: &'a str,
    prime_table_version: u32,
    shares: Vec<ShareReport<'a>>,
}

#[derive(Serialize)]
struct ShareReport<'a> {
    index: u8,
    mnemonic: &'a str,
}

impl SplitOutcome {
    /// Serializes the outcome, seed and shares included, as JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<Zeroizing<String>> {
        let report = SplitReport {
            seed: self.seed.as_str(),
            seed_generated: self.seed_generated,
            seed_strength: self.seed_strength.bits(),
            share_strength: self.share_strength.bits(),
            threshold: *self.threshold,
            share_count: *self.share_count,
            prime: &self.prime,
            prime_table_version: prime::PRIME_TABLE_VERSION,
            shares: self
                .shares
                .iter()
                .map(|s| ShareReport {
                    index: *s.index,
                    mnemonic: s.sentence.as_str(),
                })
                .collect(),
        };
        Ok(Zeroizing::new(
            serde_json::to_string_pretty(&report).context("Failed to serialize split report")?,
        ))
    }
}

/// Split a seed mnemonic into Shamir Secret Shares encoded as mnemonics
///
/// Shares are checked before they are returned: the seed is recovered from
/// every threshold-sized subset of the encoded shares (or from 100 random
/// subsets when there are more), so no share is ever emitted from a split
/// that would not recover.
///
/// # Errors
/// Returns an error if seed parsing or generation fails, the parameters do not
/// fit the seed, share creation fails, or the self-check fails
pub fn split_seed(source: SeedSource<'_>, config: SplitConfig, tagged: bool) -> Result<SplitOutcome> {
    split_seed_with_rng(source, config, tagged, &mut OsRng)
}

/// [`split_seed`] with an explicit random source
///
/// # Errors
/// Same as [`split_seed`]
pub fn split_seed_with_rng<R: RngCore + CryptoRng>(
    source: SeedSource<'_>,
    config: SplitConfig,
    tagged: bool,
    rng: &mut R,
) -> Result<SplitOutcome> {
    let (entropy, seed_generated) = match source {
        SeedSource::Mnemonic(phrase) => (
            mnemonic::decode(phrase).context("Failed to parse input mnemonic")?,
            false,
        ),
        SeedSource::Generate(strength) => (
            Entropy::generate(strength, rng).context("Failed to generate seed")?,
            true,
        ),
    };
    let seed_strength = entropy.strength();
    let share_strength = config.share_strength_for(seed_strength)?;
    let field = PrimeField::for_strength(share_strength);

    debug!(
        seed_strength = seed_strength.bits(),
        share_strength = share_strength.bits(),
        threshold = *config.threshold(),
        share_count = *config.share_count(),
        seed_generated,
        "splitting seed"
    );

    let secret = Secret::from_entropy(&entropy);
    let shares = sharing::split(
        &secret,
        config.threshold(),
        config.share_count(),
        &field,
        rng,
    )?;

    let mut issued = Vec::with_capacity(shares.len());
    for share in &shares {
        let sentence = if tagged {
            Zeroizing::new(
                codec::share_to_tagged_mnemonic(share, config.threshold(), share_strength)?
                    .as_str()
                    .to_string(),
            )
        } else {
            Zeroizing::new(
                codec::share_to_mnemonic(share, share_strength)?
                    .as_str()
                    .to_string(),
            )
        };
        issued.push(IssuedShare {
            index: share.index(),
            sentence,
        });
    }

    self_check(&issued, &secret, config.threshold(), &field, rng)?;

    info!(
        threshold = *config.threshold(),
        share_count = *config.share_count(),
        "seed split into shares"
    );

    Ok(SplitOutcome {
        seed: mnemonic::encode(&entropy),
        seed_generated,
        seed_strength,
        share_strength,
        threshold: config.threshold(),
        share_count: config.share_count(),
        prime: field.display(),
        shares: issued,
    })
}

/// Re-decodes the issued shares and recovers the secret from threshold-sized subsets
fn self_check<R: RngCore + CryptoRng>(
    issued: &[IssuedShare],
    secret: &Secret,
    threshold: Threshold,
    field: &PrimeField,
    rng: &mut R,
) -> Result<()> {
    let decoded = issued
        .iter()
        .map(|s| {
            ShareMnemonic::parse(&s.sentence)?.to_share(Some(s.index), field)
        })
        .collect::<crate::Result<Vec<Share>>>()
        .context("Self-check failed: an issued share does not decode")?;

    let k = usize::from(*threshold);
    let subsets = match combinations(decoded.len(), k, MAX_SELF_CHECKS) {
        Some(all) => all,
        None => random_subsets(decoded.len(), k, MAX_SELF_CHECKS, rng),
    };

    for subset in &subsets {
        let picked: Vec<Share> = subset.iter().map(|&i| decoded[i].clone()).collect();
        let recovered = sharing::recover(&picked, field)?;
        if recovered != *secret {
            bail!("Self-check failed: shares {subset:?} do not recover the seed");
        }
    }
    debug!(subsets = subsets.len(), "split self-check passed");
    Ok(())
}

/// All k-subsets of `0..n` in lexicographic order, or `None` if there are more than `limit`
fn combinations(n: usize, k: usize, limit: usize) -> Option<Vec<Vec<usize>>> {
    if k > n {
        return Some(Vec::new());
    }
    // C(n, i) grows with i up to n/2, so the running value never overshoots the result
    let mut count: usize = 1;
    for i in 0..k.min(n - k) {
        count = count * (n - i) / (i + 1);
        if count > limit {
            return None;
        }
    }

    let mut out = Vec::with_capacity(count);
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        out.push(combo.clone());
        // rightmost position that can still move right
        let Some(pos) = (0..k).rev().find(|&i| combo[i] < n - k + i) else {
            return Some(out);
        };
        combo[pos] += 1;
        for i in pos + 1..k {
            combo[i] = combo[i - 1] + 1;
        }
    }
}

/// `count` distinct random k-subsets of `0..n`, each sorted
fn random_subsets<R: RngCore + CryptoRng>(
    n: usize,
    k: usize,
    count: usize,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let mut seen = HashSet::with_capacity(count);
    while seen.len() < count {
        let mut subset = sample(rng, n, k).into_vec();
        subset.sort_unstable();
        seen.insert(subset);
    }
    seen.into_iter().collect()
}

/// A share as entered for recovery
#[derive(Clone)]
pub struct ShareInput {
    /// Index recorded with the share; may be omitted for tagged shares
    pub index: Option<u8>,
    /// Share sentence, bare or tagged
    pub phrase: Zeroizing<String>,
}

impl std::fmt::Debug for ShareInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareInput")
            .field("index", &self.index)
            .field("phrase", &"<redacted>")
            .finish()
    }
}

/// Out-of-band recovery parameters
#[derive(Debug, Clone, Default)]
pub struct RecoverOptions {
    /// Strength of the original seed; defaults to the share strength
    pub seed_strength: Option<Strength>,
    /// Field to interpolate in; defaults to the share strength's tier prime
    pub prime: Option<PrimeField>,
}

/// Everything a recovery produces
#[derive(Debug)]
pub struct RecoverOutcome {
    /// The recovered seed
    pub seed: Mnemonic,
    /// Short form of the prime used
    pub prime: String,
    /// Indices of the shares that went into the interpolation
    pub shares_used: Vec<ShareIndex>,
}

/// Combine share mnemonics to reconstruct the original seed mnemonic
///
/// # Errors
/// Returns an error if share decoding fails, the shares disagree on strength or
/// threshold, fewer shares than a tagged threshold are supplied, or the
/// recovered value is not a seed of the expected strength
pub fn recover_seed(inputs: &[ShareInput], options: &RecoverOptions) -> Result<RecoverOutcome> {
    if inputs.is_empty() {
        bail!("No shares provided");
    }
    if inputs.len() < usize::from(Threshold::MIN) {
        bail!(
            "Insufficient shares: need at least {}, but only {} provided",
            Threshold::MIN,
            inputs.len()
        );
    }

    let mut parsed = Vec::with_capacity(inputs.len());
    let mut threshold_from_shares: Option<Threshold> = None;
    for (idx, input) in inputs.iter().enumerate() {
        let share = ShareMnemonic::parse(&input.phrase)
            .with_context(|| format!("Failed to parse share #{}", idx + 1))?;

        // Validate threshold consistency
        match (threshold_from_shares, share.threshold()) {
            (None, Some(t)) => threshold_from_shares = Some(t),
            (Some(t), Some(u)) if t != u => {
                bail!(
                    "Share #{} has inconsistent threshold: expected {}, got {}",
                    idx + 1,
                    *t,
                    *u
                );
            }
            _ => {}
        }
        parsed.push(share);
    }

    let share_strength = parsed[0].strength();
    if let Some((idx, other)) = parsed
        .iter()
        .enumerate()
        .find(|(_, s)| s.strength() != share_strength)
    {
        bail!(
            "Share #{} has {} words, but share #1 has {}",
            idx + 1,
            other.strength().word_count(),
            share_strength.word_count()
        );
    }

    if let Some(threshold) = threshold_from_shares {
        if parsed.len() < usize::from(*threshold) {
            bail!(
                "Insufficient shares: need at least {}, but only {} provided",
                *threshold,
                parsed.len()
            );
        }
    }

    let seed_strength = options.seed_strength.unwrap_or(share_strength);
    if seed_strength > share_strength {
        return Err(crate::Error::InvalidParameters(format!(
            "seed strength ({}) cannot exceed share strength ({})",
            seed_strength.bits(),
            share_strength.bits()
        ))
        .into());
    }

    let field = match &options.prime {
        Some(field) => field.clone(),
        None => PrimeField::for_strength(share_strength),
    };

    let mut shares = Vec::with_capacity(parsed.len());
    for (idx, (share, input)) in parsed.iter().zip(inputs).enumerate() {
        let index = input
            .index
            .map(ShareIndex::new)
            .transpose()
            .with_context(|| format!("Invalid index for share #{}", idx + 1))?;
        shares.push(
            share
                .to_share(index, &field)
                .with_context(|| format!("Failed to read share #{}", idx + 1))?,
        );
    }
    let shares_used: Vec<ShareIndex> = shares.iter().map(Share::index).collect();

    debug!(
        shares = shares.len(),
        share_strength = share_strength.bits(),
        seed_strength = seed_strength.bits(),
        "recovering seed"
    );

    let secret = sharing::recover(&shares, &field)?;
    let entropy = secret.to_entropy(seed_strength).context(
        "Recovered value is not a seed of the expected strength; check that enough \
         shares from the same split were entered with their correct indices and that \
         the prime and seed strength match the split",
    )?;

    info!(shares = shares_used.len(), "seed recovered");

    Ok(RecoverOutcome {
        seed: mnemonic::encode(&entropy),
        prime: field.display(),
        shares_used,
    })
}
