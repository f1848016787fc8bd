//! Minimal TrueType fonts assembled in memory for tests.
//!
//! Only the tables `ttf-parser` needs for cmap lookups, advances and
//! outlines are written: cmap, glyf, head, hhea, hmtx, loca and maxp.
//! Glyph 0 is always an empty `.notdef`.

pub(crate) const UNITS_PER_EM: u16 = 1000;
pub(crate) const ASCENDER: i16 = 800;
pub(crate) const DESCENDER: i16 = -200;

pub(crate) struct Glyph {
    advance: u16,
    rect: Option<(i16, i16, i16, i16)>,
}

impl Glyph {
    /// A filled rectangle from `(x0, y0)` to `(x1, y1)` in font units.
    pub(crate) fn rect(advance: u16, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        Glyph {
            advance,
            rect: Some((x0, y0, x1, y1)),
        }
    }

    /// A glyph with an advance but no outline.
    pub(crate) fn empty(advance: u16) -> Self {
        Glyph {
            advance,
            rect: None,
        }
    }

    fn encode(&self) -> Vec<u8> {
        let Some((x0, y0, x1, y1)) = self.rect else {
            return Vec::new();
        };
        let mut out = Vec::new();
        put_i16(&mut out, 1); // contours
        put_i16(&mut out, x0);
        put_i16(&mut out, y0);
        put_i16(&mut out, x1);
        put_i16(&mut out, y1);
        put_u16(&mut out, 3); // end point of the only contour
        put_u16(&mut out, 0); // instructions
        out.extend_from_slice(&[0x01; 4]); // on-curve, 16-bit deltas
        let points = [(x0, y0), (x0, y1), (x1, y1), (x1, y0)];
        let mut last = 0;
        for (x, _) in points {
            put_i16(&mut out, x - last);
            last = x;
        }
        let mut last = 0;
        for (_, y) in points {
            put_i16(&mut out, y - last);
            last = y;
        }
        out
    }
}

pub(crate) struct SyntheticFont {
    glyphs: Vec<Glyph>,
    subtables: Vec<Vec<(u32, u16)>>,
}

impl SyntheticFont {
    pub(crate) fn new() -> Self {
        SyntheticFont {
            glyphs: vec![Glyph::empty(500)],
            subtables: Vec::new(),
        }
    }

    /// Append a glyph; the first one added gets id 1.
    pub(crate) fn glyph(mut self, glyph: Glyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Append a format 12 cmap subtable of `(codepoint, glyph id)` pairs.
    pub(crate) fn subtable(mut self, mappings: &[(u32, u16)]) -> Self {
        let mut mappings = mappings.to_vec();
        mappings.sort_by_key(|&(cp, _)| cp);
        self.subtables.push(mappings);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16;

        let mut glyf = Vec::new();
        let mut loca = Vec::new();
        for glyph in &self.glyphs {
            put_u16(&mut loca, (glyf.len() / 2) as u16);
            glyf.extend(glyph.encode());
        }
        put_u16(&mut loca, (glyf.len() / 2) as u16);

        let mut hmtx = Vec::new();
        for glyph in &self.glyphs {
            put_u16(&mut hmtx, glyph.advance);
            put_i16(&mut hmtx, 0);
        }

        let mut maxp = Vec::new();
        put_u32(&mut maxp, 0x0000_5000);
        put_u16(&mut maxp, num_glyphs);

        let mut head = Vec::new();
        put_u32(&mut head, 0x0001_0000); // version
        put_u32(&mut head, 0x0001_0000); // revision
        put_u32(&mut head, 0); // checksum adjustment
        put_u32(&mut head, 0x5F0F_3CF5); // magic
        put_u16(&mut head, 0); // flags
        put_u16(&mut head, UNITS_PER_EM);
        head.extend_from_slice(&[0; 16]); // created, modified
        put_i16(&mut head, 0);
        put_i16(&mut head, DESCENDER);
        put_i16(&mut head, UNITS_PER_EM as i16);
        put_i16(&mut head, ASCENDER);
        put_u16(&mut head, 0); // mac style
        put_u16(&mut head, 8); // lowest ppem
        put_i16(&mut head, 2); // direction hint
        put_i16(&mut head, 0); // short loca
        put_i16(&mut head, 0); // glyph data format
        debug_assert_eq!(head.len(), 54);

        let mut hhea = Vec::new();
        put_u32(&mut hhea, 0x0001_0000);
        put_i16(&mut hhea, ASCENDER);
        put_i16(&mut hhea, DESCENDER);
        put_i16(&mut hhea, 0); // line gap
        put_u16(&mut hhea, self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0));
        for _ in 0..3 {
            put_i16(&mut hhea, 0); // min lsb, min rsb, x max extent
        }
        put_i16(&mut hhea, 1); // caret slope rise
        put_i16(&mut hhea, 0); // caret slope run
        put_i16(&mut hhea, 0); // caret offset
        for _ in 0..4 {
            put_i16(&mut hhea, 0);
        }
        put_i16(&mut hhea, 0); // metric data format
        put_u16(&mut hhea, num_glyphs);
        debug_assert_eq!(hhea.len(), 36);

        let cmap = self.encode_cmap();

        // table records must be sorted by tag
        let tables: [(&[u8; 4], Vec<u8>); 7] = [
            (b"cmap", cmap),
            (b"glyf", glyf),
            (b"head", head),
            (b"hhea", hhea),
            (b"hmtx", hmtx),
            (b"loca", loca),
            (b"maxp", maxp),
        ];

        let mut out = Vec::new();
        put_u32(&mut out, 0x0001_0000);
        put_u16(&mut out, tables.len() as u16);
        put_u16(&mut out, 64); // search range
        put_u16(&mut out, 2); // entry selector
        put_u16(&mut out, tables.len() as u16 * 16 - 64);

        let mut offset = 12 + 16 * tables.len();
        let mut body = Vec::new();
        for (tag, data) in &tables {
            out.extend_from_slice(*tag);
            put_u32(&mut out, 0); // checksum
            put_u32(&mut out, offset as u32);
            put_u32(&mut out, data.len() as u32);
            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 12 + 16 * tables.len() + body.len();
        }
        out.extend(body);
        out
    }

    fn encode_cmap(&self) -> Vec<u8> {
        let encodings: [(u16, u16); 2] = [(0, 4), (3, 10)];
        let mut out = Vec::new();
        put_u16(&mut out, 0);
        put_u16(&mut out, self.subtables.len() as u16);

        let mut offset = 4 + 8 * self.subtables.len();
        let mut body = Vec::new();
        for (index, mappings) in self.subtables.iter().enumerate() {
            let (platform, encoding) = encodings[index % encodings.len()];
            put_u16(&mut out, platform);
            put_u16(&mut out, encoding);
            put_u32(&mut out, offset as u32);

            let mut subtable = Vec::new();
            put_u16(&mut subtable, 12);
            put_u16(&mut subtable, 0);
            put_u32(&mut subtable, (16 + 12 * mappings.len()) as u32);
            put_u32(&mut subtable, 0); // language
            put_u32(&mut subtable, mappings.len() as u32);
            for &(cp, gid) in mappings {
                put_u32(&mut subtable, cp);
                put_u32(&mut subtable, cp);
                put_u32(&mut subtable, gid as u32);
            }
            offset += subtable.len();
            body.extend(subtable);
        }
        out.extend(body);
        out
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}
