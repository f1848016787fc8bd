use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::candidates::{DEFAULT_ECHO_PRIMES, default_candidates, summarize_candidates};
use crate::error::GlyphError;
use crate::fonts::{FontFile, available_codepoints};
use crate::mapping::MappingDocument;
use crate::metrics::RasterConfig;
use crate::report::CandidateReport;
use crate::types::CodepointPair;
use crate::verify::{DEFAULT_PRIME_SEQUENCE, ResolvedMapping, check_available, resolve_pairs};

pub const DEFAULT_MAPPING_PATH: &str = "Tenney/Resources/heji2_mapping.json";
pub const DEFAULT_FONT_PATHS: [&str; 2] = [
    "Tenney/Resources/Fonts/HEJI2/HEJI2.otf",
    "Tenney/Resources/Fonts/HEJI2/HEJI2Text.otf",
];

/// Builder for configuring an inspection run.
///
/// Relative mapping and font paths are resolved against the root.
///
/// # Examples
///
/// ```no_run
/// use heji_glyphs::GlyphInspector;
///
/// let mapping = GlyphInspector::builder()
///     .root("/path/to/project")
///     .primes([11, 13, 17])
///     .build()
///     .resolve()?;
/// print!("{}", mapping);
/// # Ok::<(), heji_glyphs::GlyphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GlyphInspectorBuilder {
    root: PathBuf,
    mapping_path: PathBuf,
    font_paths: Vec<PathBuf>,
    primes: Vec<u32>,
    base_multiplicity: u32,
    raster: RasterConfig,
    candidates: Vec<CodepointPair>,
    echo_primes: Vec<u32>,
}

impl Default for GlyphInspectorBuilder {
    fn default() -> Self {
        GlyphInspectorBuilder {
            root: PathBuf::from("."),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_PATH),
            font_paths: DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect(),
            primes: DEFAULT_PRIME_SEQUENCE.to_vec(),
            base_multiplicity: 1,
            raster: RasterConfig::default(),
            candidates: default_candidates(),
            echo_primes: DEFAULT_ECHO_PRIMES.to_vec(),
        }
    }
}

impl GlyphInspectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = path.into();
        self
    }

    pub fn font_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.font_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Primes to resolve, in stride order. The first one is the anchor.
    pub fn primes(mut self, primes: impl IntoIterator<Item = u32>) -> Self {
        self.primes = primes.into_iter().collect();
        self
    }

    /// Multiplicity whose first glyphs anchor the sequence and feed the echo.
    pub fn base_multiplicity(mut self, multiplicity: u32) -> Self {
        self.base_multiplicity = multiplicity;
        self
    }

    pub fn raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    pub fn candidates(mut self, candidates: impl IntoIterator<Item = CodepointPair>) -> Self {
        self.candidates = candidates.into_iter().collect();
        self
    }

    pub fn echo_primes(mut self, primes: impl IntoIterator<Item = u32>) -> Self {
        self.echo_primes = primes.into_iter().collect();
        self
    }

    pub fn build(self) -> GlyphInspector {
        GlyphInspector {
            mapping_path: self.root.join(self.mapping_path),
            font_paths: self
                .font_paths
                .iter()
                .map(|path| self.root.join(path))
                .collect(),
            primes: self.primes,
            base_multiplicity: self.base_multiplicity,
            raster: self.raster,
            candidates: self.candidates,
            echo_primes: self.echo_primes,
        }
    }
}

/// Checks prime accidental codepoints against bundled fonts.
///
/// # Examples
///
/// ```no_run
/// use heji_glyphs::GlyphInspector;
///
/// // Resolved mapping for the default prime sequence
/// let mapping = GlyphInspector::default().resolve()?;
/// print!("{}", mapping);
///
/// // Candidate exploration for unassigned primes
/// let report = GlyphInspector::default().candidates()?;
/// print!("{}", report);
/// # Ok::<(), heji_glyphs::GlyphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GlyphInspector {
    mapping_path: PathBuf,
    font_paths: Vec<PathBuf>,
    primes: Vec<u32>,
    base_multiplicity: u32,
    raster: RasterConfig,
    candidates: Vec<CodepointPair>,
    echo_primes: Vec<u32>,
}

impl Default for GlyphInspector {
    fn default() -> Self {
        GlyphInspectorBuilder::default().build()
    }
}

impl GlyphInspector {
    pub fn builder() -> GlyphInspectorBuilder {
        GlyphInspectorBuilder::new()
    }

    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    pub fn font_paths(&self) -> &[PathBuf] {
        &self.font_paths
    }

    pub fn load_mapping(&self) -> Result<MappingDocument, GlyphError> {
        MappingDocument::from_path(&self.mapping_path)
    }

    pub fn load_fonts(&self) -> Result<Vec<FontFile>, GlyphError> {
        self.font_paths.iter().map(FontFile::from_path).collect()
    }

    /// Resolve and verify the prime sequence from the configured files.
    pub fn resolve(&self) -> Result<ResolvedMapping, GlyphError> {
        let doc = self.load_mapping()?;
        // the base pair is checked before any font is opened
        let mapping = self.resolve_document(&doc)?;
        let fonts = self.load_fonts()?;
        self.verify_fonts(mapping, &fonts)
    }

    /// Resolve and verify against an already loaded document and fonts.
    pub fn resolve_with(
        &self,
        doc: &MappingDocument,
        fonts: &[FontFile],
    ) -> Result<ResolvedMapping, GlyphError> {
        let mapping = self.resolve_document(doc)?;
        self.verify_fonts(mapping, fonts)
    }

    fn resolve_document(&self, doc: &MappingDocument) -> Result<ResolvedMapping, GlyphError> {
        let Some(&base_prime) = self.primes.first() else {
            return Ok(ResolvedMapping::default());
        };
        let base = doc.pair(base_prime, self.base_multiplicity)?;
        debug!("base pair for prime {}: {}", base_prime, base);
        resolve_pairs(base_prime, base, &self.primes)
    }

    fn verify_fonts(
        &self,
        mapping: ResolvedMapping,
        fonts: &[FontFile],
    ) -> Result<ResolvedMapping, GlyphError> {
        let available = available_codepoints(fonts)?;
        check_available(&mapping, &available)?;
        info!(
            "verified {} primes against {} fonts",
            mapping.len(),
            fonts.len()
        );
        Ok(mapping)
    }

    /// Sample the candidate pairs in the configured fonts.
    pub fn candidates(&self) -> Result<CandidateReport, GlyphError> {
        let fonts = self.load_fonts()?;
        let doc = self.load_mapping()?;
        self.candidates_with(&doc, &fonts)
    }

    pub fn candidates_with(
        &self,
        doc: &MappingDocument,
        fonts: &[FontFile],
    ) -> Result<CandidateReport, GlyphError> {
        let summaries = summarize_candidates(&self.candidates, fonts, self.raster)?;

        let mut current = Vec::new();
        for &prime in &self.echo_primes {
            if let Some(pair) = doc.try_pair(prime, self.base_multiplicity)? {
                current.push((prime, pair));
            }
        }

        Ok(CandidateReport {
            summaries,
            current: current.into_iter().collect(),
        })
    }
}

/// Resolve the default prime sequence under `root` with default settings.
///
/// This is a convenience function equivalent to
/// `GlyphInspector::builder().root(root).build().resolve()`.
pub fn resolve_from_root<P: AsRef<Path>>(root: P) -> Result<ResolvedMapping, GlyphError> {
    GlyphInspector::builder()
        .root(root.as_ref())
        .build()
        .resolve()
}

/// Run the candidate exploration under `root` with default settings.
pub fn candidates_from_root<P: AsRef<Path>>(root: P) -> Result<CandidateReport, GlyphError> {
    GlyphInspector::builder()
        .root(root.as_ref())
        .build()
        .candidates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Glyph, SyntheticFont};
    use crate::types::Codepoint;

    fn mapping_json(down: u32, up: u32) -> String {
        format!(
            r#"{{"primeComponents": {{
                "11": {{"1": {{"down": [{{"glyph": "\u{:04X}"}}], "up": [{{"glyph": "\u{:04X}"}}]}}}},
                "29": {{"1": {{"down": [{{"glyph": "\uE2DA"}}], "up": [{{"glyph": "\uE2DB"}}]}}}}
            }}}}"#,
            down, up
        )
    }

    fn font_covering(range: std::ops::RangeInclusive<u32>) -> FontFile {
        let mappings: Vec<(u32, u16)> = range.map(|cp| (cp, 1)).collect();
        let data = SyntheticFont::new()
            .glyph(Glyph::rect(500, 0, 0, 400, 600))
            .subtable(&mappings)
            .build();
        FontFile::from_bytes(data).unwrap()
    }

    #[test_log::test]
    fn builder_joins_paths_to_root() {
        let inspector = GlyphInspector::builder()
            .root("/project")
            .font_paths(["a.otf", "/abs/b.otf"])
            .build();
        assert_eq!(
            inspector.mapping_path(),
            Path::new("/project/Tenney/Resources/heji2_mapping.json")
        );
        assert_eq!(
            inspector.font_paths(),
            &[PathBuf::from("/project/a.otf"), PathBuf::from("/abs/b.otf")]
        );
    }

    #[test_log::test]
    fn resolves_against_fonts_split_across_files() {
        let doc = MappingDocument::from_bytes(mapping_json(0xE2D0, 0xE2D1).as_bytes()).unwrap();
        let fonts = vec![
            font_covering(0xE2D0..=0xE2D7),
            font_covering(0xE2D8..=0xE2DD),
        ];
        let mapping = GlyphInspector::default().resolve_with(&doc, &fonts).unwrap();
        assert_eq!(mapping.len(), 7);
        assert_eq!(mapping.get(31), Some(CodepointPair::new(0xE2DC, 0xE2DD)));
    }

    #[test_log::test]
    fn missing_font_coverage_fails() {
        let doc = MappingDocument::from_bytes(mapping_json(0xE2D0, 0xE2D1).as_bytes()).unwrap();
        let fonts = vec![font_covering(0xE2D0..=0xE2DB)];
        let err = GlyphInspector::default()
            .resolve_with(&doc, &fonts)
            .unwrap_err();
        assert!(matches!(
            err,
            GlyphError::MissingCodepoint {
                codepoint: Codepoint(0xE2DC),
                prime: 31,
            }
        ));
    }

    #[test_log::test]
    fn base_mismatch_fails_without_fonts() {
        let doc = MappingDocument::from_bytes(mapping_json(0xE2D0, 0xE2D5).as_bytes()).unwrap();
        let err = GlyphInspector::default().resolve_with(&doc, &[]).unwrap_err();
        assert!(matches!(err, GlyphError::BaseMismatch { prime: 11, .. }));
    }

    #[test_log::test]
    fn resolve_reads_mapping_before_fonts() {
        // the fonts do not exist, so only a base mismatch can explain the error
        let dir = std::env::temp_dir().join(format!("heji-glyphs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mapping = dir.join("mapping.json");
        std::fs::write(&mapping, mapping_json(0xE2D0, 0xE2D5)).unwrap();

        let err = GlyphInspector::builder()
            .root(&dir)
            .mapping_path("mapping.json")
            .font_paths(["missing.otf"])
            .build()
            .resolve()
            .unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        assert!(matches!(err, GlyphError::BaseMismatch { .. }));
    }

    #[test_log::test]
    fn candidates_echo_present_primes() {
        let doc = MappingDocument::from_bytes(mapping_json(0xE2D0, 0xE2D1).as_bytes()).unwrap();
        let fonts = vec![font_covering(0xE2DE..=0xE2E1)];
        let report = GlyphInspector::builder()
            .candidates([
                CodepointPair::new(0xE2DE, 0xE2DF),
                CodepointPair::new(0xE2E2, 0xE2E3),
            ])
            .build()
            .candidates_with(&doc, &fonts)
            .unwrap();

        assert_eq!(report.summaries.len(), 2);
        // the uncovered pair samples as empty, so it has the least ink
        assert_eq!(
            report.recommended().unwrap().pair,
            CodepointPair::new(0xE2E2, 0xE2E3)
        );
        assert_eq!(
            report.current.entries(),
            &[(29, CodepointPair::new(0xE2DA, 0xE2DB))]
        );
    }

    #[test_log::test]
    fn empty_prime_sequence_is_trivially_verified() {
        let doc = MappingDocument::from_bytes(b"{\"primeComponents\": {}}").unwrap();
        let mapping = GlyphInspector::builder()
            .primes(Vec::<u32>::new())
            .build()
            .resolve_with(&doc, &[])
            .unwrap();
        assert!(mapping.is_empty());
    }
}
