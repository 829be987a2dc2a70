mod font;

pub use font::{FontBook, FontMetrics, load_font_metrics};

use anyhow::{Context, Result};
use printpdf::{
    Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use crate::layout::{Canvas, Color, Extent, FontWeight, HAlign, Rect, Stroke, TextStyle, VAlign};

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

pub const A4_PORTRAIT: PageSize = PageSize {
    width_mm: 210.0,
    height_mm: 297.0,
};

#[derive(Clone)]
struct EmbeddedFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl EmbeddedFonts {
    fn for_weight(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

/// Scoped handle for the output document: fonts are embedded once at
/// creation, pages are appended in the order they are begun, and the
/// whole document is flushed to disk in [`finish`](Self::finish).
pub struct DocumentSink {
    doc: PdfDocumentReference,
    fonts: EmbeddedFonts,
    book: FontBook,
    page_size: PageSize,
    path: PathBuf,
    // printpdf creates page 1 together with the document.
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    pages: usize,
}

impl DocumentSink {
    pub fn create(path: &Path, title: &str, book: FontBook, page_size: PageSize) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(page_size.width_mm as f64),
            Mm(page_size.height_mm as f64),
            "Page 1",
        );
        let regular = doc
            .add_external_font(Cursor::new(book.regular().data().to_vec()))
            .with_context(|| "failed to embed regular font")?;
        let bold = if book.bold().data().as_ptr() == book.regular().data().as_ptr() {
            regular.clone()
        } else {
            doc.add_external_font(Cursor::new(book.bold().data().to_vec()))
                .with_context(|| "failed to embed bold font")?
        };
        Ok(Self {
            doc,
            fonts: EmbeddedFonts { regular, bold },
            book,
            page_size,
            path: path.to_path_buf(),
            first_page: Some((page, layer)),
            pages: 0,
        })
    }

    /// Appends a new page and returns the canvas to draw it with.
    pub fn begin_page(&mut self) -> PdfCanvas {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(
                Mm(self.page_size.width_mm as f64),
                Mm(self.page_size.height_mm as f64),
                format!("Page {}", self.pages + 1),
            ),
        };
        self.pages += 1;
        PdfCanvas {
            layer: self.doc.get_page(page).get_layer(layer),
            fonts: self.fonts.clone(),
            book: self.book.clone(),
            page_size: self.page_size,
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Writes the document out. Nothing reaches disk before this.
    pub fn finish(self) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// [`Canvas`] implementation for one PDF page. Normalized coordinates are
/// scaled to millimetres; font sizes stay in points.
pub struct PdfCanvas {
    layer: PdfLayerReference,
    fonts: EmbeddedFonts,
    book: FontBook,
    page_size: PageSize,
}

impl PdfCanvas {
    fn mm_x(&self, x: f32) -> f32 {
        x * self.page_size.width_mm
    }

    fn mm_y(&self, y: f32) -> f32 {
        y * self.page_size.height_mm
    }
}

impl Canvas for PdfCanvas {
    fn measure(&self, text: &str, style: &TextStyle, font_size: f32, line_spacing: f32) -> Extent {
        let metrics = self.book.for_weight(style.weight);
        let mut widest_pt = 0.0f32;
        let mut line_count = 0usize;
        for line in text.lines() {
            widest_pt = widest_pt.max(metrics.line_width_pt(line, font_size));
            line_count += 1;
        }
        let height_pt = line_count as f32 * metrics.line_height_pt(font_size) * line_spacing;
        Extent {
            width: widest_pt * PT_TO_MM / self.page_size.width_mm,
            height: height_pt * PT_TO_MM / self.page_size.height_mm,
        }
    }

    fn draw_text_block(
        &mut self,
        lines: &[String],
        rect: Rect,
        style: &TextStyle,
        font_size: f32,
        line_spacing: f32,
        halign: HAlign,
        valign: VAlign,
    ) {
        if lines.is_empty() {
            return;
        }
        let metrics = self.book.for_weight(style.weight);
        let nominal_mm = metrics.line_height_pt(font_size) * PT_TO_MM;
        let advance_mm = nominal_mm * line_spacing;
        let block_mm = advance_mm * lines.len() as f32;
        let half_leading = (advance_mm - nominal_mm) / 2.0;
        let ascent_mm = metrics.ascent_pt(font_size) * PT_TO_MM;

        let rect_x = self.mm_x(rect.x);
        let rect_y = self.mm_y(rect.y);
        let rect_w = self.mm_x(rect.width);
        let rect_h = self.mm_y(rect.height);
        let top = match valign {
            VAlign::Top => rect_y + rect_h,
            VAlign::Center => rect_y + (rect_h + block_mm) / 2.0,
            VAlign::Bottom => rect_y + block_mm,
        };

        self.layer.set_fill_color(pdf_color(style.color));
        let font = self.fonts.for_weight(style.weight);
        for (index, line) in lines.iter().enumerate() {
            let line_w = metrics.line_width_pt(line, font_size) * PT_TO_MM;
            let x = match halign {
                HAlign::Left => rect_x,
                HAlign::Center => rect_x + (rect_w - line_w) / 2.0,
                HAlign::Right => rect_x + rect_w - line_w,
            };
            let baseline = top - index as f32 * advance_mm - half_leading - ascent_mm;
            self.layer.use_text(
                line.as_str(),
                font_size as f64,
                Mm(x as f64),
                Mm(baseline as f64),
                font,
            );
        }
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        let x = self.mm_x(rect.x) as f64;
        let y = self.mm_y(rect.y) as f64;
        let w = self.mm_x(rect.width) as f64;
        let h = self.mm_y(rect.height) as f64;
        let points = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ];
        if let Some(color) = fill {
            self.layer.set_fill_color(pdf_color(color));
        }
        if let Some(stroke) = stroke {
            self.layer.set_outline_color(pdf_color(stroke.color));
            self.layer.set_outline_thickness(stroke.width_pt as f64);
        }
        self.layer.add_shape(Line {
            points,
            is_closed: true,
            has_fill: fill.is_some(),
            has_stroke: stroke.is_some(),
            is_clipping_path: false,
        });
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.layer.set_outline_color(pdf_color(stroke.color));
        self.layer.set_outline_thickness(stroke.width_pt as f64);
        self.layer.add_shape(Line {
            points: vec![
                (
                    Point::new(Mm(self.mm_x(from.0) as f64), Mm(self.mm_y(from.1) as f64)),
                    false,
                ),
                (
                    Point::new(Mm(self.mm_x(to.0) as f64), Mm(self.mm_y(to.1) as f64)),
                    false,
                ),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        color.r as f64,
        color.g as f64,
        color.b as f64,
        None,
    ))
}
