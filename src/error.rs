use std::fmt::Formatter;
use std::path::PathBuf;

use crate::types::{Codepoint, Direction};

#[derive(Debug)]
pub enum GlyphError {
    IoError {
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    JsonError {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    FontError {
        path: Option<PathBuf>,
        source: ttf_parser::FaceParsingError,
    },
    MissingKey {
        prime: u32,
        multiplicity: Option<u32>,
        direction: Option<Direction>,
        index: Option<usize>,
    },
    EmptyGlyph,
    MultiScalarGlyph {
        glyph: String,
        scalars: Vec<u32>,
    },
    BaseMismatch {
        prime: u32,
        down: Codepoint,
        up: Codepoint,
    },
    MissingCodepoint {
        codepoint: Codepoint,
        prime: u32,
    },
    CodepointOutOfRange {
        prime: u32,
        base: Codepoint,
        index: usize,
    },
    CanvasError {
        width: u32,
        height: u32,
    },
}

impl GlyphError {
    /// Attach the file the error came from, if it does not already carry one.
    pub(crate) fn at_path(self, at: impl Into<PathBuf>) -> Self {
        match self {
            GlyphError::IoError { path: None, source } => GlyphError::IoError {
                path: Some(at.into()),
                source,
            },
            GlyphError::JsonError { path: None, source } => GlyphError::JsonError {
                path: Some(at.into()),
                source,
            },
            GlyphError::FontError { path: None, source } => GlyphError::FontError {
                path: Some(at.into()),
                source,
            },
            other => other,
        }
    }
}

fn write_path(f: &mut Formatter<'_>, path: &Option<PathBuf>) -> Result<(), std::fmt::Error> {
    match path {
        Some(path) => write!(f, " ({})", path.display()),
        None => Ok(()),
    }
}

impl std::fmt::Display for GlyphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            GlyphError::IoError { path, source } => {
                write!(f, "IO error: {}", source)?;
                write_path(f, path)
            }
            GlyphError::JsonError { path, source } => {
                write!(f, "Mapping parse error: {}", source)?;
                write_path(f, path)
            }
            GlyphError::FontError { path, source } => {
                write!(f, "Font parse error: {}", source)?;
                write_path(f, path)
            }
            GlyphError::MissingKey {
                prime,
                multiplicity,
                direction,
                index,
            } => {
                write!(f, "Mapping has no entry for prime {}", prime)?;
                if let Some(multiplicity) = multiplicity {
                    write!(f, ", multiplicity {}", multiplicity)?;
                }
                if let Some(direction) = direction {
                    write!(f, ", direction {}", direction)?;
                }
                if let Some(index) = index {
                    write!(f, ", glyph #{}", index)?;
                }
                Ok(())
            }
            GlyphError::EmptyGlyph => write!(f, "empty glyph"),
            GlyphError::MultiScalarGlyph { glyph, scalars } => {
                write!(f, "glyph {:?} has multiple scalars: {:?}", glyph, scalars)
            }
            GlyphError::BaseMismatch { prime, down, up } => write!(
                f,
                "Unexpected base mapping: {} up ({}) is not +1 from down ({})",
                prime, up, down
            ),
            GlyphError::MissingCodepoint { codepoint, prime } => {
                write!(f, "Missing codepoint {} for prime {}", codepoint, prime)
            }
            GlyphError::CodepointOutOfRange { prime, base, index } => write!(
                f,
                "Codepoint for prime {} (#{} after {}) is past U+10FFFF",
                prime, index, base
            ),
            GlyphError::CanvasError { width, height } => {
                write!(f, "Cannot allocate a {}x{} raster canvas", width, height)
            }
        }
    }
}

impl std::error::Error for GlyphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlyphError::IoError { source, .. } => Some(source),
            GlyphError::JsonError { source, .. } => Some(source),
            GlyphError::FontError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlyphError {
    fn from(e: std::io::Error) -> Self {
        GlyphError::IoError {
            path: None,
            source: e,
        }
    }
}

impl From<serde_json::Error> for GlyphError {
    fn from(e: serde_json::Error) -> Self {
        GlyphError::JsonError {
            path: None,
            source: e,
        }
    }
}

impl From<ttf_parser::FaceParsingError> for GlyphError {
    fn from(e: ttf_parser::FaceParsingError) -> Self {
        GlyphError::FontError {
            path: None,
            source: e,
        }
    }
}
