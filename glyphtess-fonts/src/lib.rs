//! # Glyphtess Fonts
//!
//! Turns font files into the outline records the patch assembler consumes.
//! Parsing and outline decoding go through `skrifa`; this crate only
//! records the drawing commands as segments and looks up advances.

mod pen;

use std::path::{Path, PathBuf};

use glyphtess_core::{FontSlot, Glyph, OutlineSource};
use skrifa::outline::DrawSettings;
use skrifa::prelude::{LocationRef, Size};
use skrifa::raw::FontRef;
use skrifa::{GlyphId, MetadataProvider};
use thiserror::Error;

pub use pen::SegmentPen;

/// Number of font slots the selector can address.
pub const FONT_SLOTS: usize = 3;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font {name}: {message}")]
    Parse { name: String, message: String },

    #[error("failed to draw {ch:?} from {name}: {message}")]
    Draw {
        name: String,
        ch: char,
        message: String,
    },
}

/// One parsed font file.
#[derive(Debug, Clone)]
pub struct FontOutlines {
    name: String,
    data: Vec<u8>,
    units_per_em: f32,
}

impl FontOutlines {
    /// Parse font bytes. `name` is only used in diagnostics.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontError> {
        let name = name.into();
        let upem = {
            let font = FontRef::new(&data).map_err(|e| FontError::Parse {
                name: name.clone(),
                message: e.to_string(),
            })?;
            font.metrics(Size::unscaled(), LocationRef::default())
                .units_per_em
        };
        Ok(Self {
            name,
            data,
            units_per_em: f32::from(upem.max(1)),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    fn font(&self) -> Result<FontRef<'_>, FontError> {
        FontRef::new(&self.data).map_err(|e| FontError::Parse {
            name: self.name.clone(),
            message: e.to_string(),
        })
    }
}

impl OutlineSource for FontOutlines {
    type Error = FontError;

    /// Unmapped characters fall back to glyph 0.
    fn extract_glyph(&self, ch: char) -> Result<Glyph, FontError> {
        let font = self.font()?;
        let gid = font.charmap().map(ch).unwrap_or(GlyphId::NOTDEF);
        let location = LocationRef::default();
        let scale = 1.0 / self.units_per_em;

        let advance = font
            .glyph_metrics(Size::unscaled(), location)
            .advance_width(gid)
            .unwrap_or(0.0)
            * scale;

        let Some(outline) = font.outline_glyphs().get(gid) else {
            tracing::debug!(font = %self.name, ?ch, "glyph has no outline");
            return Ok(Glyph::new(Vec::new(), advance));
        };

        let mut pen = SegmentPen::new(scale);
        outline
            .draw(DrawSettings::unhinted(Size::unscaled(), location), &mut pen)
            .map_err(|e| FontError::Draw {
                name: self.name.clone(),
                ch,
                message: e.to_string(),
            })?;
        Ok(Glyph::new(pen.finish(), advance))
    }
}

/// One glyph per character of `text`, in order.
pub fn extract_text<S: OutlineSource>(source: &S, text: &str) -> Result<Vec<Glyph>, S::Error> {
    source.extract_text(text)
}

/// The fonts the font selector chooses between.
#[derive(Debug, Default)]
pub struct FontLibrary {
    slots: [Option<FontOutlines>; FONT_SLOTS],
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load up to three font files into slots 1..=3. A file that cannot be
    /// loaded leaves its slot empty; the glyph scene then shows nothing for
    /// that slot.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut library = Self::new();
        if paths.len() > FONT_SLOTS {
            tracing::warn!(
                given = paths.len(),
                used = FONT_SLOTS,
                "extra font paths ignored"
            );
        }
        for (slot, path) in library.slots.iter_mut().zip(paths) {
            let path = path.as_ref();
            match FontOutlines::open(path) {
                Ok(font) => {
                    tracing::info!(font = %font.name(), upem = font.units_per_em(), "loaded font");
                    *slot = Some(font);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
        library
    }

    pub fn get(&self, slot: FontSlot) -> Option<&FontOutlines> {
        self.slots[slot.index()].as_ref()
    }

    pub fn loaded(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Extract `text` once from every slot, indexed by `FontSlot::index`.
    pub fn extract_all(&self, text: &str) -> [Vec<Glyph>; FONT_SLOTS] {
        [FontSlot::Primary, FontSlot::Secondary, FontSlot::Tertiary]
            .map(|slot| self.glyphs_for(slot, text))
    }

    /// Glyphs for `text` in the font at `slot`. An empty slot or a failed
    /// extraction yields no glyphs.
    pub fn glyphs_for(&self, slot: FontSlot, text: &str) -> Vec<Glyph> {
        let Some(font) = self.get(slot) else {
            tracing::debug!(slot = slot.value(), "font slot is empty");
            return Vec::new();
        };
        match extract_text(font, text) {
            Ok(glyphs) => glyphs,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }
}
