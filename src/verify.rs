use std::collections::BTreeSet;

use tracing::debug;

use crate::error::GlyphError;
use crate::types::{Codepoint, CodepointPair};

/// Codepoint distance between the down glyphs of consecutive primes.
pub const PRIME_STRIDE: u32 = 2;

pub const DEFAULT_PRIME_SEQUENCE: [u32; 7] = [11, 13, 17, 19, 23, 29, 31];

/// Prime to codepoint pair, in prime-sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedMapping {
    entries: Vec<(u32, CodepointPair)>,
}

impl ResolvedMapping {
    pub fn get(&self, prime: u32) -> Option<CodepointPair> {
        self.entries
            .iter()
            .find(|(p, _)| *p == prime)
            .map(|(_, pair)| *pair)
    }

    pub fn entries(&self) -> &[(u32, CodepointPair)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u32, CodepointPair)> for ResolvedMapping {
    fn from_iter<I: IntoIterator<Item = (u32, CodepointPair)>>(iter: I) -> Self {
        ResolvedMapping {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Down codepoint of the prime at `index` in the sequence, or `None` when
/// it would fall past U+10FFFF.
pub fn down_for_index(base_down: Codepoint, index: usize) -> Option<Codepoint> {
    let distance = u32::try_from(index).ok()?.checked_mul(PRIME_STRIDE)?;
    base_down.offset(distance)
}

/// Derive the pair of every prime from the base pair, without touching fonts.
///
/// Fails if `base.up` is not `base.down + 1`, or if a derived pair would
/// leave the Unicode codespace.
pub fn resolve_pairs(
    base_prime: u32,
    base: CodepointPair,
    primes: &[u32],
) -> Result<ResolvedMapping, GlyphError> {
    if !base.is_adjacent() {
        return Err(GlyphError::BaseMismatch {
            prime: base_prime,
            down: base.down,
            up: base.up,
        });
    }

    primes
        .iter()
        .enumerate()
        .map(|(index, &prime)| {
            let out_of_range = || GlyphError::CodepointOutOfRange {
                prime,
                base: base.down,
                index,
            };
            let down = down_for_index(base.down, index).ok_or_else(out_of_range)?;
            let up = down.offset(1).ok_or_else(out_of_range)?;
            let pair = CodepointPair { down, up };
            debug!("prime {} -> {}", prime, pair);
            Ok((prime, pair))
        })
        .collect()
}

/// Check that every codepoint of `mapping` is in `available`.
///
/// Stops at the first missing codepoint, down before up, in sequence order.
pub fn check_available(
    mapping: &ResolvedMapping,
    available: &BTreeSet<Codepoint>,
) -> Result<(), GlyphError> {
    for &(prime, pair) in mapping.entries() {
        for (_, codepoint) in pair.iter() {
            if !available.contains(&codepoint) {
                return Err(GlyphError::MissingCodepoint { codepoint, prime });
            }
        }
    }
    Ok(())
}

/// Resolve the pairs for `primes` and verify each against `available`.
pub fn verify_mapping(
    base_prime: u32,
    base: CodepointPair,
    primes: &[u32],
    available: &BTreeSet<Codepoint>,
) -> Result<ResolvedMapping, GlyphError> {
    let mapping = resolve_pairs(base_prime, base, primes)?;
    check_available(&mapping, available)?;
    Ok(mapping)
}
