use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use ttf_parser::Face;
use ttf_parser::name_id;

use crate::layout::FontWeight;

/// Parsed face data plus the vertical metrics needed for line layout.
/// Cheap to clone; the raw font bytes are shared.
#[derive(Clone)]
pub struct FontMetrics {
    data: Arc<Vec<u8>>,
    face_index: u32,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    space_advance: u16,
    family: Option<String>,
}

impl FontMetrics {
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Nominal line height (ascender to next ascender, no extra spacing)
    /// at `font_size` points.
    pub fn line_height_pt(&self, font_size: f32) -> f32 {
        let units = (self.ascent as i32 - self.descent as i32 + self.line_gap as i32).max(1);
        font_size * units as f32 / self.units_per_em.max(1) as f32
    }

    pub fn ascent_pt(&self, font_size: f32) -> f32 {
        font_size * self.ascent.max(0) as f32 / self.units_per_em.max(1) as f32
    }

    /// Advance width of a single line at `font_size` points. Glyphs the
    /// face does not cover count as a space advance.
    pub fn line_width_pt(&self, text: &str, font_size: f32) -> f32 {
        let Ok(face) = Face::parse(&self.data, self.face_index) else {
            // Parsed once at load, so this is unreachable in practice;
            // degrade to a rough per-character estimate.
            return text.chars().count() as f32 * font_size * 0.5;
        };
        let mut advance = 0u32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if ch == ' ' {
                advance = advance.saturating_add(self.space_advance as u32);
                continue;
            }
            let glyph_advance = face
                .glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .unwrap_or(self.space_advance);
            advance = advance.saturating_add(glyph_advance as u32);
        }
        advance as f32 * font_size / self.units_per_em.max(1) as f32
    }
}

pub fn load_font_metrics(path: &Path) -> Result<FontMetrics> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read font: {}", path.display()))?;
    let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
    for index in 0..count {
        if let Ok(metrics) = metrics_from_data(&data, index) {
            return Ok(metrics);
        }
    }
    Err(anyhow!("failed to parse font: {}", path.display()))
}

fn metrics_from_data(data: &[u8], face_index: u32) -> Result<FontMetrics> {
    let face = Face::parse(data, face_index)
        .map_err(|err| anyhow!("failed to parse font face {}: {}", face_index, err))?;
    let units_per_em = face.units_per_em().max(1);
    let space_advance = face
        .glyph_index(' ')
        .and_then(|id| face.glyph_hor_advance(id))
        .unwrap_or(units_per_em / 2);
    Ok(FontMetrics {
        data: Arc::new(data.to_vec()),
        face_index,
        units_per_em,
        ascent: face.ascender(),
        descent: face.descender(),
        line_gap: face.line_gap(),
        space_advance,
        family: extract_family_name(&face),
    })
}

fn extract_family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}

/// The regular and bold faces a board is set in. Bold falls back to the
/// regular face when the family has no bold variant.
#[derive(Clone)]
pub struct FontBook {
    regular: FontMetrics,
    bold: FontMetrics,
}

impl FontBook {
    /// Resolves the faces to use: an explicit font file wins, otherwise
    /// the requested family (then each fallback family in order) is
    /// looked up among the installed system fonts.
    pub fn resolve(
        font_path: Option<&Path>,
        font_family: Option<&str>,
        fallback: &[&str],
    ) -> Result<FontBook> {
        if let Some(path) = font_path {
            let metrics = load_font_metrics(path)?;
            return Ok(FontBook {
                bold: metrics.clone(),
                regular: metrics,
            });
        }

        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut tried = Vec::new();
        for family in font_family.into_iter().chain(fallback.iter().copied()) {
            if let Ok(regular) = load_family_weight(&db, family, fontdb::Weight::NORMAL) {
                let bold = load_family_weight(&db, family, fontdb::Weight::BOLD)
                    .unwrap_or_else(|_| regular.clone());
                return Ok(FontBook { regular, bold });
            }
            tried.push(family);
        }
        Err(anyhow!(
            "no usable font found (tried {}); pass --font-path",
            tried.join(", ")
        ))
    }

    pub fn for_weight(&self, weight: FontWeight) -> &FontMetrics {
        match weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    pub fn regular(&self) -> &FontMetrics {
        &self.regular
    }

    pub fn bold(&self) -> &FontMetrics {
        &self.bold
    }
}

fn load_family_weight(
    db: &fontdb::Database,
    family: &str,
    weight: fontdb::Weight,
) -> Result<FontMetrics> {
    let families = if family.eq_ignore_ascii_case("sans-serif") {
        vec![fontdb::Family::SansSerif]
    } else {
        vec![fontdb::Family::Name(family)]
    };
    let query = fontdb::Query {
        families: &families,
        weight,
        ..Default::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| anyhow!("font not found: {}", family))?;
    let (data, face_index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| anyhow!("failed to load font data: {}", family))?;
    metrics_from_data(&data, face_index)
}
