use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::GlyphError;
use crate::types::{Codepoint, CodepointPair, Direction};

/// One glyph entry in the mapping document.
///
/// Only `glyph` is read; any other fields a record carries are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphRecord {
    pub glyph: String,
}

impl GlyphRecord {
    pub fn codepoint(&self) -> Result<Codepoint, GlyphError> {
        codepoint_for_glyph(&self.glyph)
    }
}

/// Glyph lists for both directions of one prime at one multiplicity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlyphVariants {
    #[serde(default)]
    pub down: Vec<GlyphRecord>,
    #[serde(default)]
    pub up: Vec<GlyphRecord>,
}

impl GlyphVariants {
    pub fn records(&self, direction: Direction) -> &[GlyphRecord] {
        match direction {
            Direction::Down => &self.down,
            Direction::Up => &self.up,
        }
    }
}

/// The prime accidental mapping document.
///
/// Prime and multiplicity keys are strings in JSON and are parsed to integers
/// on load, so a non-numeric key is a parse error rather than a silent miss.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    pub prime_components: BTreeMap<u32, BTreeMap<u32, GlyphVariants>>,
}

impl MappingDocument {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GlyphError> {
        let path = path.as_ref();
        debug!("loading mapping document {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| GlyphError::from(e).at_path(path))?;
        Self::from_bytes(&bytes).map_err(|e| e.at_path(path))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GlyphError> {
        let doc: MappingDocument = serde_json::from_slice(bytes)?;
        debug!("mapping document has {} primes", doc.prime_components.len());
        Ok(doc)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, GlyphError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn contains_prime(&self, prime: u32) -> bool {
        self.prime_components.contains_key(&prime)
    }

    pub fn variants(&self, prime: u32, multiplicity: u32) -> Result<&GlyphVariants, GlyphError> {
        self.prime_components
            .get(&prime)
            .ok_or(GlyphError::MissingKey {
                prime,
                multiplicity: None,
                direction: None,
                index: None,
            })?
            .get(&multiplicity)
            .ok_or(GlyphError::MissingKey {
                prime,
                multiplicity: Some(multiplicity),
                direction: None,
                index: None,
            })
    }

    pub fn glyph(
        &self,
        prime: u32,
        multiplicity: u32,
        direction: Direction,
        index: usize,
    ) -> Result<&GlyphRecord, GlyphError> {
        self.variants(prime, multiplicity)?
            .records(direction)
            .get(index)
            .ok_or(GlyphError::MissingKey {
                prime,
                multiplicity: Some(multiplicity),
                direction: Some(direction),
                index: Some(index),
            })
    }

    /// Decode the first down and up glyphs of `prime` at `multiplicity`.
    pub fn pair(&self, prime: u32, multiplicity: u32) -> Result<CodepointPair, GlyphError> {
        let down = self.glyph(prime, multiplicity, Direction::Down, 0)?.codepoint()?;
        let up = self.glyph(prime, multiplicity, Direction::Up, 0)?.codepoint()?;
        Ok(CodepointPair { down, up })
    }

    /// Like [`MappingDocument::pair`], but `None` when the document has no
    /// glyphs for `prime` at `multiplicity`. Malformed glyphs still fail.
    pub fn try_pair(
        &self,
        prime: u32,
        multiplicity: u32,
    ) -> Result<Option<CodepointPair>, GlyphError> {
        match self.pair(prime, multiplicity) {
            Ok(pair) => Ok(Some(pair)),
            Err(GlyphError::MissingKey { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Decode a glyph string that must hold exactly one Unicode scalar value.
pub fn codepoint_for_glyph(glyph: &str) -> Result<Codepoint, GlyphError> {
    let mut chars = glyph.chars();
    let first = chars.next().ok_or(GlyphError::EmptyGlyph)?;
    if chars.next().is_some() {
        return Err(GlyphError::MultiScalarGlyph {
            glyph: glyph.to_string(),
            scalars: glyph.chars().map(|c| c as u32).collect(),
        });
    }
    Ok(Codepoint::from(first))
}
