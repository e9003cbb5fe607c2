//! Pixel-width measurement of translation text.
//!
//! Two measurers are available:
//! - `FontMeasurer` sums glyph advances from real font files (system fonts plus
//!   any configured font directories).
//! - `ApproximateMeasurer` is a deterministic linear estimate used when the
//!   runtime has no usable fonts.
//!
//! `detect_measurer` picks the best one for the current environment.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Average glyph width as a fraction of the font size.
pub const APPROXIMATE_CHAR_WIDTH_RATIO: f64 = 0.5625;

/// Font family and pixel size used for a measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Arial", 16)
    }
}

/// CSS font shorthand, e.g. `16px Arial`.
impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

pub trait TextMeasurer: Send + Sync {
    /// Rendered width of `text` in whole pixels.
    fn measure(&self, text: &str, font: &FontSpec) -> u32;
}

/// Linear approximation: `round(chars * size * 0.5625)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let chars = text.chars().count() as f64;
        (chars * font.size as f64 * APPROXIMATE_CHAR_WIDTH_RATIO).round() as u32
    }
}

/// Measures text with glyph advances from a font database.
pub struct FontMeasurer {
    db: fontdb::Database,
    // Lowercased family name -> best face, built once from the loaded faces.
    families: HashMap<String, fontdb::ID>,
    // Sans-serif face (or the first face) for families that are not installed.
    fallback: Option<fontdb::ID>,
}

impl FontMeasurer {
    /// Load system fonts plus every directory in `font_dirs`.
    pub fn from_system<P: AsRef<Path>>(font_dirs: &[P]) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            db.load_fonts_dir(dir);
        }
        Self::with_database(db)
    }

    /// Load fonts only from the given directories.
    pub fn from_dirs<P: AsRef<Path>>(font_dirs: &[P]) -> Self {
        let mut db = fontdb::Database::new();
        for dir in font_dirs {
            db.load_fonts_dir(dir);
        }
        Self::with_database(db)
    }

    pub fn with_database(db: fontdb::Database) -> Self {
        let names: HashSet<String> = db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();

        let mut families = HashMap::with_capacity(names.len());
        for name in names {
            let wanted = [fontdb::Family::Name(&name)];
            let query = fontdb::Query {
                families: &wanted,
                ..Default::default()
            };
            if let Some(id) = db.query(&query) {
                families.insert(name.to_lowercase(), id);
            }
        }

        let sans = [fontdb::Family::SansSerif];
        let fallback = db
            .query(&fontdb::Query {
                families: &sans,
                ..Default::default()
            })
            .or_else(|| db.faces().next().map(|face| face.id));

        Self {
            db,
            families,
            fallback,
        }
    }

    /// Number of font faces available for measurement.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Number of distinct family names that resolve to their own face.
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn resolve_face(&self, family: &str) -> Option<fontdb::ID> {
        self.families
            .get(&family.trim().to_lowercase())
            .copied()
            .or(self.fallback)
    }

    /// Unrounded width in pixels, or `None` when no face can be parsed.
    fn advance_width(&self, text: &str, font: &FontSpec) -> Option<f64> {
        let id = self.resolve_face(&font.family)?;
        self.db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let units_per_em = face.units_per_em() as f64;
                if units_per_em <= 0.0 {
                    return None;
                }
                let notdef = ttf_parser::GlyphId(0);
                let units: f64 = text
                    .chars()
                    .map(|c| {
                        let glyph = face.glyph_index(c).unwrap_or(notdef);
                        face.glyph_hor_advance(glyph).unwrap_or(0) as f64
                    })
                    .sum();
                Some(units * font.size as f64 / units_per_em)
            })
            .flatten()
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> u32 {
        if text.is_empty() {
            return 0;
        }
        match self.advance_width(text, font) {
            Some(width) => width.round() as u32,
            None => {
                debug!("No usable face for '{}', using approximation", font);
                ApproximateMeasurer.measure(text, font)
            }
        }
    }
}

/// Pick a font-backed measurer when fonts are installed, else the approximation.
pub fn detect_measurer<P: AsRef<Path>>(font_dirs: &[P]) -> Arc<dyn TextMeasurer> {
    let fonts = FontMeasurer::from_system(font_dirs);
    if fonts.is_empty() {
        warn!("No fonts available for text measurement, using fallback calculation");
        Arc::new(ApproximateMeasurer)
    } else {
        debug!("Loaded {} font faces for text measurement", fonts.face_count());
        Arc::new(fonts)
    }
}
