//! Property tests for split/recover workflows

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::rngs::OsRng;

use mnemoshare::codec;
use mnemoshare::commands::{RecoverOptions, SeedSource, ShareInput, recover_seed, split_seed};
use mnemoshare::domain::{ShareCount, SplitConfig, Strength, Threshold};
use mnemoshare::field::PrimeField;
use mnemoshare::mnemonic::{self, Entropy};
use mnemoshare::sharing::{self, Secret, Share};

/// A seed plus a share strength that can carry it
#[derive(Clone, Debug)]
struct SeedCase {
    entropy: Vec<u8>,
    share_strength: Strength,
}

impl Arbitrary for SeedCase {
    fn arbitrary(g: &mut Gen) -> Self {
        let seed_strength = *g.choose(&Strength::ALL).unwrap_or(&Strength::Bits128);
        let wider: Vec<Strength> = Strength::ALL
            .into_iter()
            .filter(|s| *s >= seed_strength)
            .collect();
        let share_strength = *g.choose(&wider).unwrap_or(&seed_strength);

        let mut entropy: Vec<u8> = (0..seed_strength.bytes()).map(|_| u8::arbitrary(g)).collect();
        if share_strength == seed_strength {
            // keep the seed below the tier prime, which sits just under 2^bits
            entropy[0] &= 0x7f;
        }
        SeedCase {
            entropy,
            share_strength,
        }
    }
}

/// Wrapper for valid threshold and share count pairs
#[derive(Clone, Copy, Debug)]
struct ValidShamirParams {
    threshold: u8,
    num_shares: u8,
}

impl Arbitrary for ValidShamirParams {
    fn arbitrary(g: &mut Gen) -> Self {
        // Generate share count between 2 and 8 (keep it reasonable for testing)
        let num_shares = (u8::arbitrary(g) % 7) + 2; // 2..=8

        // Generate threshold between 2 and num_shares (never 1)
        let threshold = (u8::arbitrary(g) % (num_shares - 1)) + 2; // 2..=num_shares

        ValidShamirParams {
            threshold,
            num_shares,
        }
    }
}

/// Deterministic shuffle of `0..n` driven by `seed`
fn shuffled(n: usize, mut seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..n {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let range = (n - i) as u64;
        let j = i + usize::try_from((seed >> 33) % range).unwrap_or(0);
        indices.swap(i, j);
    }
    indices
}

fn split_case(case: &SeedCase, params: ValidShamirParams) -> Option<(Secret, PrimeField, Vec<Share>)> {
    let entropy = Entropy::from_bytes(&case.entropy).ok()?;
    let secret = Secret::from_entropy(&entropy);
    let field = PrimeField::for_strength(case.share_strength);
    let shares = sharing::split(
        &secret,
        Threshold::new(params.threshold).ok()?,
        ShareCount::new(params.num_shares).ok()?,
        &field,
        &mut OsRng,
    )
    .ok()?;
    Some((secret, field, shares))
}

/// Any random selection of threshold shares, passed through the mnemonic codec, recovers the seed
#[quickcheck]
fn prop_random_share_selection_works(
    case: SeedCase,
    params: ValidShamirParams,
    selection_seed: u64,
) -> bool {
    let Some((secret, field, shares)) = split_case(&case, params) else {
        return false;
    };

    let selected: Option<Vec<Share>> = shuffled(shares.len(), selection_seed)
        .into_iter()
        .take(usize::from(params.threshold))
        .map(|i| {
            let words = codec::share_to_mnemonic(&shares[i], case.share_strength).ok()?;
            codec::mnemonic_to_share(&words, shares[i].index(), &field).ok()
        })
        .collect();
    let Some(selected) = selected else {
        return false;
    };

    let Ok(recovered) = sharing::recover(&selected, &field) else {
        return false;
    };
    let Ok(seed_strength) = Strength::from_entropy_len(case.entropy.len()) else {
        return false;
    };

    recovered == secret
        && recovered
            .to_entropy(seed_strength)
            .is_ok_and(|e| e.as_bytes() == case.entropy.as_slice())
}

/// Fewer than threshold shares never yield the secret
#[quickcheck]
fn prop_insufficient_shares_fail(case: SeedCase, params: ValidShamirParams) -> bool {
    let Some((secret, field, shares)) = split_case(&case, params) else {
        return false;
    };

    // Take one less than threshold
    let insufficient = &shares[..usize::from(params.threshold) - 1];

    sharing::recover(insufficient, &field).is_ok_and(|recovered| recovered != secret)
}

/// Shares are numbered 1..=N, distinct, and below the prime
#[quickcheck]
fn prop_share_indices_unique_and_in_field(case: SeedCase, params: ValidShamirParams) -> bool {
    let Some((_, field, shares)) = split_case(&case, params) else {
        return false;
    };

    shares.len() == usize::from(params.num_shares)
        && shares
            .iter()
            .enumerate()
            .all(|(i, s)| usize::from(*s.index()) == i + 1 && s.value().as_biguint() < field.modulus())
}

/// The full command flow recovers the seed from the last threshold shares
#[quickcheck]
fn prop_command_round_trip(case: SeedCase, params: ValidShamirParams, tagged: bool) -> bool {
    let Ok(entropy) = Entropy::from_bytes(&case.entropy) else {
        return false;
    };
    let seed = mnemonic::encode(&entropy);
    let Ok(config) = SplitConfig::new(
        Threshold::new(params.threshold).unwrap_or_else(|_| unreachable!("threshold >= 2")),
        ShareCount::new(params.num_shares).unwrap_or_else(|_| unreachable!("count >= 2")),
    ) else {
        return false;
    };
    let config = config.with_share_strength(case.share_strength);

    let Ok(outcome) = split_seed(SeedSource::Mnemonic(seed.as_str()), config, tagged) else {
        return false;
    };

    let start = usize::from(params.num_shares - params.threshold);
    let inputs: Vec<ShareInput> = outcome.shares[start..]
        .iter()
        .map(|s| ShareInput {
            index: if tagged { None } else { Some(*s.index) },
            phrase: s.sentence.clone(),
        })
        .collect();
    let options = RecoverOptions {
        seed_strength: Some(entropy.strength()),
        prime: None,
    };

    recover_seed(&inputs, &options).is_ok_and(|r| r.seed == seed)
}
