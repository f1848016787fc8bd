//! HEJI2 prime accidental glyph inspection
//!
//! This library checks that the codepoints of the microtonal prime accidentals
//! (primes 11 to 31) exist in the bundled HEJI2 fonts, derives the resolved
//! prime to codepoint mapping, and compares candidate private-use-area glyph
//! pairs by rendered ink density.

mod candidates;
mod error;
mod fonts;
mod inspect;
mod mapping;
mod metrics;
mod report;
#[cfg(test)]
mod testing;
mod types;
mod verify;

// Re-export error type
pub use error::GlyphError;

// Re-export inspection API
pub use inspect::{
    DEFAULT_FONT_PATHS, DEFAULT_MAPPING_PATH, GlyphInspector, GlyphInspectorBuilder,
    candidates_from_root, resolve_from_root,
};

// Re-export building blocks
pub use candidates::{
    CandidateSummary, DEFAULT_CANDIDATE_PAIRS, DEFAULT_ECHO_PRIMES, FontPairMetrics,
    default_candidates, recommend, summarize_candidates,
};
pub use fonts::{CharacterMap, CmapEntry, FontFile, available_codepoints, load_character_map};
pub use mapping::{GlyphRecord, GlyphVariants, MappingDocument, codepoint_for_glyph};
pub use metrics::{GlyphSampler, MetricsSample, RasterConfig, dark_pixel_ratio, sample_glyph};
pub use report::CandidateReport;
pub use types::{Codepoint, CodepointPair, Direction};
pub use verify::{
    DEFAULT_PRIME_SEQUENCE, PRIME_STRIDE, ResolvedMapping, check_available, down_for_index,
    resolve_pairs, verify_mapping,
};
