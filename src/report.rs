use std::fmt;

use crate::candidates::{CandidateSummary, recommend};
use crate::verify::ResolvedMapping;

fn write_mapping_lines(f: &mut fmt::Formatter<'_>, mapping: &ResolvedMapping) -> fmt::Result {
    for (prime, pair) in mapping.entries() {
        writeln!(f, "  prime={} down={} up={}", prime, pair.down, pair.up)?;
    }
    Ok(())
}

impl fmt::Display for ResolvedMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolved HEJI2 prime mappings:")?;
        write_mapping_lines(f, self)
    }
}

/// Output of the candidate exploration.
#[derive(Debug, Clone)]
pub struct CandidateReport {
    pub summaries: Vec<CandidateSummary>,
    /// Pairs the mapping document currently assigns to the echoed primes.
    pub current: ResolvedMapping,
}

impl CandidateReport {
    pub fn recommended(&self) -> Option<&CandidateSummary> {
        recommend(&self.summaries)
    }
}

impl fmt::Display for CandidateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PUA candidate pairs (avg width / ink ratio):")?;
        for summary in &self.summaries {
            writeln!(f, "  pair={}", summary.pair)?;
            for font in &summary.fonts {
                // half-widths round away from zero, 510.5 prints as 511
                writeln!(
                    f,
                    "    {}: avg_width={} avg_ink={:.4}",
                    font.font,
                    font.avg_width().round() as i64,
                    font.avg_ink()
                )?;
            }
        }

        match self.recommended() {
            Some(best) => writeln!(
                f,
                "Recommended bracket-like pair: {} (mean_ink={:.4})",
                best.pair,
                best.mean_ink()
            )?,
            None => writeln!(f, "No candidate pairs configured.")?,
        }

        if !self.current.is_empty() {
            writeln!(f, "Current mapping:")?;
            write_mapping_lines(f, &self.current)?;
        }
        Ok(())
    }
}
