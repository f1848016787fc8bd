use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use ttf_parser::{Face, GlyphId};

use crate::error::GlyphError;
use crate::types::Codepoint;

/// Raw bytes of a font file, kept so faces can be parsed on demand.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: Option<PathBuf>,
    data: Vec<u8>,
}

impl FontFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GlyphError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| GlyphError::from(e).at_path(path))?;
        debug!("read {} bytes from {}", data.len(), path.display());
        let font = FontFile {
            path: Some(path.to_path_buf()),
            data,
        };
        // fail early on anything that is not a font container
        font.face()?;
        Ok(font)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, GlyphError> {
        let font = FontFile { path: None, data };
        font.face()?;
        Ok(font)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, GlyphError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name used in reports.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    pub fn face(&self) -> Result<Face<'_>, GlyphError> {
        Face::parse(&self.data, 0).map_err(|e| match &self.path {
            Some(path) => GlyphError::from(e).at_path(path),
            None => GlyphError::from(e),
        })
    }

    pub fn character_map(&self) -> Result<CharacterMap, GlyphError> {
        Ok(CharacterMap::from_face(&self.face()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapEntry {
    pub glyph_id: GlyphId,
    pub glyph_name: String,
}

/// Union of every character-map subtable of a font.
///
/// Subtables are merged in the order the font lists them and a later
/// subtable replaces the entry of an earlier one for the same codepoint.
#[derive(Debug, Clone, Default)]
pub struct CharacterMap {
    entries: BTreeMap<Codepoint, CmapEntry>,
}

impl CharacterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_face(face: &Face<'_>) -> Self {
        let mut map = CharacterMap::new();
        let Some(cmap) = face.tables().cmap else {
            warn!("font has no cmap table");
            return map;
        };

        for (index, subtable) in cmap.subtables.into_iter().enumerate() {
            debug!(
                "cmap subtable {}: platform={:?} encoding={} format={:?}",
                index, subtable.platform_id, subtable.encoding_id, subtable.format
            );
            let mut entries = Vec::new();
            subtable.codepoints(|codepoint| {
                if let Some(gid) = subtable.glyph_index(codepoint) {
                    entries.push((Codepoint(codepoint), gid));
                }
            });
            map.merge_subtable(entries.into_iter().map(|(codepoint, gid)| {
                (
                    codepoint,
                    CmapEntry {
                        glyph_id: gid,
                        glyph_name: glyph_name(face, gid),
                    },
                )
            }));
        }

        debug!("character map has {} codepoints", map.len());
        map
    }

    /// Merge one subtable's entries; existing codepoints are overwritten.
    pub fn merge_subtable<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Codepoint, CmapEntry)>,
    {
        for (codepoint, entry) in entries {
            match self.entries.entry(codepoint) {
                Entry::Vacant(v) => {
                    v.insert(entry);
                }
                Entry::Occupied(mut e) => {
                    if e.get() != &entry {
                        warn!(
                            "{} remapped from {} to {}",
                            codepoint,
                            e.get().glyph_name,
                            entry.glyph_name
                        );
                    }
                    e.insert(entry);
                }
            }
        }
    }

    pub fn get(&self, codepoint: Codepoint) -> Option<&CmapEntry> {
        self.entries.get(&codepoint)
    }

    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.entries.contains_key(&codepoint)
    }

    pub fn codepoints(&self) -> impl Iterator<Item = Codepoint> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn glyph_name(face: &Face<'_>, gid: GlyphId) -> String {
    match face.glyph_name(gid) {
        Some(name) => name.to_owned(),
        None if gid.0 == 0 => ".notdef".to_string(),
        None => format!("glyph{:05}", gid.0),
    }
}

pub fn load_character_map<P: AsRef<Path>>(path: P) -> Result<CharacterMap, GlyphError> {
    FontFile::from_path(path)?.character_map()
}

/// Every codepoint mapped by at least one of `fonts`.
pub fn available_codepoints(fonts: &[FontFile]) -> Result<BTreeSet<Codepoint>, GlyphError> {
    let mut points = BTreeSet::new();
    for font in fonts {
        let cmap = font.character_map()?;
        debug!("{}: {} codepoints", font.display_name(), cmap.len());
        points.extend(cmap.codepoints());
    }
    Ok(points)
}
