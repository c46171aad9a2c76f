//! Prime moduli for each strength tier
//!
//! Each tier uses the largest prime below `2^strength`, so that every share value
//! fits in exactly `strength` bits while wasting as little of the range as possible.
//! The table is a compatibility boundary: changing any entry makes previously
//! generated shares unrecoverable with the default prime.
//!
//! Primes typed by users are accepted as small arithmetic expressions such as
//! `2^128 - 159`, the same short form the tier primes are displayed in.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::domain::Strength;
use crate::error::{Error, Result};

/// Version of the tier prime table below
pub const PRIME_TABLE_VERSION: u32 = 1;

/// `p = 2^bits - offset` for each strength
const TIER_OFFSETS: [(Strength, u32); 5] = [
    (Strength::Bits128, 159),
    (Strength::Bits160, 47),
    (Strength::Bits192, 237),
    (Strength::Bits224, 63),
    (Strength::Bits256, 189),
];

/// Bases used by [`is_probable_prime`]
const WITNESSES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Largest exponent accepted in a prime expression
const MAX_EXPONENT: u32 = 4096;

/// Deepest parenthesis nesting accepted in a prime expression
const MAX_DEPTH: usize = 32;

/// Widest intermediate value accepted in a prime expression
const MAX_BITS: u64 = 8192;

fn tier_offset(strength: Strength) -> u32 {
    TIER_OFFSETS
        .iter()
        .find(|(s, _)| *s == strength)
        .map_or(0, |(_, offset)| *offset)
}

/// The prime modulus for a strength tier
#[must_use]
pub fn tier_prime(strength: Strength) -> BigUint {
    (BigUint::one() << strength.bits()) - BigUint::from(tier_offset(strength))
}

/// Short form of a tier prime, e.g. `2^128 - 159`
#[must_use]
pub fn tier_display(strength: Strength) -> String {
    format!("2^{} - {}", strength.bits(), tier_offset(strength))
}

/// Displays a prime in its short tier form when it is one, in decimal otherwise
#[must_use]
pub fn display(prime: &BigUint) -> String {
    Strength::ALL
        .into_iter()
        .find(|s| tier_prime(*s) == *prime)
        .map_or_else(|| prime.to_str_radix(10), tier_display)
}

/// Evaluates a prime expression over non-negative integers
///
/// Accepts decimal literals, `+`, `-`, `*`, `^` (right associative) and
/// parentheses. Whitespace is ignored.
///
/// # Errors
/// Returns [`Error::InvalidParameters`] on any other character, on a malformed
/// expression, on a negative intermediate result, on an exponent above 4096, or
/// on a product or power wider than 8192 bits
///
/// # Examples
///
/// ```rust
/// use mnemoshare::prime::{parse_expression, tier_prime};
/// use mnemoshare::domain::Strength;
///
/// let p = parse_expression("2^128 - 159").unwrap();
/// assert_eq!(p, tier_prime(Strength::Bits128));
///
/// assert!(parse_expression("2**128").is_err());
/// assert!(parse_expression("import os").is_err());
/// ```
pub fn parse_expression(expression: &str) -> Result<BigUint> {
    if let Some(bad) = expression
        .chars()
        .find(|c| !c.is_ascii_digit() && !c.is_whitespace() && !"+-*()^".contains(*c))
    {
        return Err(invalid(format!(
            "invalid character '{bad}' in prime expression"
        )));
    }

    let tokens: Vec<u8> = expression
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if tokens.is_empty() {
        return Err(invalid("empty prime expression".to_string()));
    }

    let mut parser = ExpressionParser { tokens, pos: 0 };
    let value = parser.expr(0)?;
    if parser.pos != parser.tokens.len() {
        return Err(invalid(format!(
            "unexpected '{}' in prime expression",
            parser.tokens[parser.pos] as char
        )));
    }
    Ok(value)
}

/// Miller-Rabin test against a fixed set of small prime bases
///
/// A composite passes with probability below 4^-16 per base set; the bases are
/// fixed so the result is deterministic.
#[must_use]
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    for w in WITNESSES {
        let w = BigUint::from(w);
        if *n == w {
            return true;
        }
        if (n % &w).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for w in WITNESSES {
        let mut x = BigUint::from(w).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn invalid(message: String) -> Error {
    Error::InvalidParameters(message)
}

fn too_wide() -> Error {
    invalid(format!("prime expression exceeds {MAX_BITS} bits"))
}

struct ExpressionParser {
    tokens: Vec<u8>,
    pos: usize,
}

impl ExpressionParser {
    fn peek(&self) -> Option<u8> {
        self.tokens.get(self.pos).copied()
    }

    fn expr(&mut self, depth: usize) -> Result<BigUint> {
        let mut value = self.term(depth)?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term(depth)?;
            if op == b'+' {
                value += rhs;
            } else if rhs > value {
                return Err(invalid("prime expression goes negative".to_string()));
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn term(&mut self, depth: usize) -> Result<BigUint> {
        let mut value = self.power(depth)?;
        while self.peek() == Some(b'*') {
            self.pos += 1;
            let rhs = self.power(depth)?;
            if value.bits() + rhs.bits() > MAX_BITS {
                return Err(too_wide());
            }
            value *= rhs;
        }
        Ok(value)
    }

    fn power(&mut self, depth: usize) -> Result<BigUint> {
        let base = self.atom(depth)?;
        if self.peek() != Some(b'^') {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.power(depth)?;
        let exponent = exponent
            .to_u32()
            .filter(|e| *e <= MAX_EXPONENT)
            .ok_or_else(|| invalid(format!("exponent above {MAX_EXPONENT} in prime expression")))?;
        if base.bits().saturating_mul(u64::from(exponent)) > MAX_BITS {
            return Err(too_wide());
        }
        Ok(base.pow(exponent))
    }

    fn atom(&mut self, depth: usize) -> Result<BigUint> {
        match self.peek() {
            Some(b'(') => {
                if depth >= MAX_DEPTH {
                    return Err(invalid("prime expression nested too deeply".to_string()));
                }
                self.pos += 1;
                let value = self.expr(depth + 1)?;
                if self.peek() != Some(b')') {
                    return Err(invalid("unbalanced parenthesis in prime expression".to_string()));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(b'0'..=b'9') => {
                let start = self.pos;
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
                BigUint::parse_bytes(&self.tokens[start..self.pos], 10)
                    .ok_or_else(|| invalid("invalid number in prime expression".to_string()))
            }
            Some(other) => Err(invalid(format!(
                "unexpected '{}' in prime expression",
                other as char
            ))),
            None => Err(invalid("prime expression ends early".to_string())),
        }
    }
}
