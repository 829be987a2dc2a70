pub mod fit;
pub mod page;

/// Axis-aligned rectangle in normalized page coordinates: the page is the
/// unit square, x grows right, y grows up, `(x, y)` is the lower-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrinks the rectangle by `pad` on all four sides.
    pub fn inset(&self, pad: f32) -> Rect {
        Rect {
            x: self.x + pad,
            y: self.y + pad,
            width: (self.width - 2.0 * pad).max(0.0),
            height: (self.height - 2.0 * pad).max(0.0),
        }
    }
}

/// Measured size of a rendered text block, in the same normalized units
/// as [`Rect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a `#rrggbb` hex color.
    pub fn from_hex(value: &str) -> Option<Color> {
        let hex = value.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .ok()
                .map(|byte| byte as f32 / 255.0)
        };
        Some(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Stroke width in points, independent of the normalized coordinate
    /// space.
    pub width_pt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub color: Color,
}

/// The drawing/measurement capability the layout code is written against.
///
/// The production implementation is [`crate::pdf::PdfCanvas`]; tests use
/// deterministic fakes so the fitter can be exercised without real font
/// metrics. `measure` must be a pure function of its arguments: measuring
/// the same text twice yields identical extents.
pub trait Canvas {
    /// Measures `text` (lines separated by `\n`) at `font_size` points.
    /// Width is the widest line, height is line count times the nominal
    /// line height times `line_spacing`, both in normalized page units.
    fn measure(&self, text: &str, style: &TextStyle, font_size: f32, line_spacing: f32) -> Extent;

    /// Draws pre-wrapped lines aligned within `rect`.
    #[allow(clippy::too_many_arguments)]
    fn draw_text_block(
        &mut self,
        lines: &[String],
        rect: Rect,
        style: &TextStyle,
        font_size: f32,
        line_spacing: f32,
        halign: HAlign,
        valign: VAlign,
    );

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            Color::from_hex("#ffffff"),
            Some(Color {
                r: 1.0,
                g: 1.0,
                b: 1.0
            })
        );
        assert_eq!(Color::from_hex("#000000"), Some(Color::BLACK));
        let tint = Color::from_hex("#e6ffe6").expect("valid hex");
        assert!((tint.r - 230.0 / 255.0).abs() < 1e-6);
        assert!((tint.g - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Color::from_hex("e6ffe6"), None);
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn inset_never_goes_negative() {
        let rect = Rect::new(0.1, 0.1, 0.05, 0.05);
        let inner = rect.inset(0.04);
        assert!((inner.width - 0.0).abs() < 1e-6);
        assert!((inner.height - 0.0).abs() < 1e-6);

        let inner = Rect::new(0.0, 0.0, 0.5, 0.4).inset(0.01);
        assert!((inner.x - 0.01).abs() < 1e-6);
        assert!((inner.width - 0.48).abs() < 1e-6);
        assert!((inner.height - 0.38).abs() < 1e-6);
    }
}
