use tracing::{debug, info};

use crate::error::GlyphError;
use crate::fonts::FontFile;
use crate::metrics::{GlyphSampler, MetricsSample, RasterConfig};
use crate::types::CodepointPair;

/// PUA pairs explored for the primes that have no settled glyphs yet.
pub const DEFAULT_CANDIDATE_PAIRS: [(u32, u32); 4] = [
    (0xE2DE, 0xE2DF),
    (0xE2E0, 0xE2E1),
    (0xE2E2, 0xE2E3),
    (0xE2E4, 0xE2E5),
];

pub const DEFAULT_ECHO_PRIMES: [u32; 2] = [29, 31];

pub fn default_candidates() -> Vec<CodepointPair> {
    DEFAULT_CANDIDATE_PAIRS
        .iter()
        .map(|&(down, up)| CodepointPair::new(down, up))
        .collect()
}

/// Samples of both glyphs of a pair in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontPairMetrics {
    pub font: String,
    pub down: MetricsSample,
    pub up: MetricsSample,
}

impl FontPairMetrics {
    pub fn avg_width(&self) -> f64 {
        (self.down.advance_width as f64 + self.up.advance_width as f64) / 2.0
    }

    pub fn avg_ink(&self) -> f64 {
        (self.down.ink_ratio + self.up.ink_ratio) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSummary {
    pub pair: CodepointPair,
    pub fonts: Vec<FontPairMetrics>,
}

impl CandidateSummary {
    /// Mean of the per-font average ink ratios.
    pub fn mean_ink(&self) -> f64 {
        if self.fonts.is_empty() {
            return 0.0;
        }
        self.fonts.iter().map(FontPairMetrics::avg_ink).sum::<f64>() / self.fonts.len() as f64
    }
}

/// Sample every candidate pair in every font.
pub fn summarize_candidates(
    candidates: &[CodepointPair],
    fonts: &[FontFile],
    config: RasterConfig,
) -> Result<Vec<CandidateSummary>, GlyphError> {
    let samplers = fonts
        .iter()
        .map(|font| GlyphSampler::new(font, config).map(|sampler| (font.display_name(), sampler)))
        .collect::<Result<Vec<_>, _>>()?;

    candidates
        .iter()
        .map(|&pair| -> Result<CandidateSummary, GlyphError> {
            let fonts = samplers
                .iter()
                .map(|(name, sampler)| -> Result<FontPairMetrics, GlyphError> {
                    Ok(FontPairMetrics {
                        font: name.clone(),
                        down: sampler.sample(pair.down)?,
                        up: sampler.sample(pair.up)?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let summary = CandidateSummary { pair, fonts };
            debug!("{}: mean_ink={:.4}", pair, summary.mean_ink());
            Ok(summary)
        })
        .collect()
}

/// The pair with the lowest mean ink ratio; the earliest wins a tie.
pub fn recommend(summaries: &[CandidateSummary]) -> Option<&CandidateSummary> {
    let mut best: Option<&CandidateSummary> = None;
    for summary in summaries {
        match best {
            Some(current) if summary.mean_ink() >= current.mean_ink() => {}
            _ => best = Some(summary),
        }
    }
    if let Some(best) = best {
        info!("bracket-like candidate {} (mean_ink={:.4})", best.pair, best.mean_ink());
    }
    best
}
