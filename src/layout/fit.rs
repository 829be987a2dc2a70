use super::{Canvas, HAlign, Rect, TextStyle, VAlign};

/// Tolerance added to the rectangle bounds when comparing measured
/// extents, in normalized page units (~0.1 mm on A4). Absorbs rounding in
/// glyph advance sums so a block that fits visually is not rejected over
/// a hair of overshoot.
pub const FIT_EPSILON: f32 = 5.0e-4;

#[derive(Debug, Clone)]
pub struct FitRequest<'a> {
    pub text: &'a str,
    pub rect: Rect,
    pub style: TextStyle,
    pub max_font_size: f32,
    pub min_font_size: f32,
    /// Inter-line multiplier of the font's nominal line height.
    pub line_spacing: f32,
    pub halign: HAlign,
    pub valign: VAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub lines: Vec<String>,
    pub font_size: f32,
    /// `false` means best effort: even the minimum font size overflows
    /// the rectangle. Callers render the result anyway.
    pub fits: bool,
}

/// Finds the largest font size and greedy word wrap for which the
/// measured text block stays within `request.rect`.
///
/// Font sizes are tried in descending integer steps from max to min; the
/// first size whose wrapped block fits wins. The descent is linear on
/// purpose: shrinking the font can re-wrap into more (taller) lines, so
/// the fits predicate is not monotonic and binary search could skip a
/// larger size that fits.
pub fn fit(canvas: &dyn Canvas, request: &FitRequest) -> FitResult {
    let words: Vec<&str> = request.text.split_whitespace().collect();
    if words.is_empty() {
        // Nothing to fit; trivially fits at the smallest size.
        return FitResult {
            lines: Vec::new(),
            font_size: request.min_font_size,
            fits: true,
        };
    }

    let mut font_size = request.max_font_size;
    while font_size >= request.min_font_size {
        let lines = wrap_words(canvas, &words, &request.style, font_size, request.rect.width);
        let block = lines.join("\n");
        let extent = canvas.measure(&block, &request.style, font_size, request.line_spacing);
        if extent.width <= request.rect.width + FIT_EPSILON
            && extent.height <= request.rect.height + FIT_EPSILON
        {
            return FitResult {
                lines,
                font_size,
                fits: true,
            };
        }
        font_size -= 1.0;
    }

    // Nothing fit; wrap once more at the minimum size and let the caller
    // render the overflow.
    let lines = wrap_words(
        canvas,
        &words,
        &request.style,
        request.min_font_size,
        request.rect.width,
    );
    FitResult {
        lines,
        font_size: request.min_font_size,
        fits: false,
    }
}

/// Greedy wrap: a word joins the current line if the measured candidate
/// still fits the width, otherwise it starts a new line. A word is never
/// split, so a single overlong word becomes an overflowing line.
fn wrap_words(
    canvas: &dyn Canvas,
    words: &[&str],
    style: &TextStyle,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = words[0].to_string();
    for word in &words[1..] {
        let candidate = format!("{current} {word}");
        let measured = canvas.measure(&candidate, style, font_size, 1.0);
        if measured.width <= max_width + FIT_EPSILON {
            current = candidate;
        } else {
            lines.push(current);
            current = (*word).to_string();
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Color, Extent, FontWeight, Stroke};

    // Deterministic fake measurer: every glyph is CHAR_WIDTH wide and
    // every line LINE_HEIGHT tall, scaled by font size.
    const CHAR_WIDTH: f32 = 0.005;
    const LINE_HEIGHT: f32 = 0.012;

    struct RuledCanvas;

    impl Canvas for RuledCanvas {
        fn measure(
            &self,
            text: &str,
            _style: &TextStyle,
            font_size: f32,
            line_spacing: f32,
        ) -> Extent {
            let mut widest = 0usize;
            let mut lines = 0usize;
            for line in text.lines() {
                widest = widest.max(line.chars().count());
                lines += 1;
            }
            Extent {
                width: widest as f32 * CHAR_WIDTH * font_size,
                height: lines as f32 * LINE_HEIGHT * font_size * line_spacing,
            }
        }

        fn draw_text_block(
            &mut self,
            _lines: &[String],
            _rect: Rect,
            _style: &TextStyle,
            _font_size: f32,
            _line_spacing: f32,
            _halign: HAlign,
            _valign: VAlign,
        ) {
        }

        fn draw_rect(&mut self, _rect: Rect, _fill: Option<Color>, _stroke: Option<Stroke>) {}

        fn draw_line(&mut self, _from: (f32, f32), _to: (f32, f32), _stroke: Stroke) {}
    }

    fn request(text: &str, rect: Rect, max: f32, min: f32) -> FitRequest<'_> {
        FitRequest {
            text,
            rect,
            style: TextStyle {
                weight: FontWeight::Normal,
                color: Color::BLACK,
            },
            max_font_size: max,
            min_font_size: min,
            line_spacing: 1.0,
            halign: HAlign::Center,
            valign: VAlign::Center,
        }
    }

    #[test]
    fn short_text_gets_max_size_on_one_line() {
        let req = request("hello", Rect::new(0.0, 0.0, 1.0, 1.0), 10.0, 4.0);
        let result = fit(&RuledCanvas, &req);
        assert!(result.fits);
        assert_eq!(result.font_size, 10.0);
        assert_eq!(result.lines, vec!["hello".to_string()]);
    }

    #[test]
    fn shrinks_until_width_fits() {
        // "abcdefgh" is 8 chars: 0.40 wide at size 10, 0.28 at size 7.
        let req = request("abcdefgh", Rect::new(0.0, 0.0, 0.3, 1.0), 10.0, 4.0);
        let result = fit(&RuledCanvas, &req);
        assert!(result.fits);
        assert_eq!(result.font_size, 7.0);
        assert_eq!(result.lines.len(), 1);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let req = request("aa bb cc", Rect::new(0.0, 0.0, 0.3, 1.0), 10.0, 10.0);
        let result = fit(&RuledCanvas, &req);
        assert!(result.fits);
        assert_eq!(result.font_size, 10.0);
        assert_eq!(result.lines, vec!["aa bb".to_string(), "cc".to_string()]);
    }

    #[test]
    fn reports_overflow_at_min_size() {
        let req = request(
            "word word word word",
            Rect::new(0.0, 0.0, 0.05, 0.02),
            10.0,
            4.0,
        );
        let result = fit(&RuledCanvas, &req);
        assert!(!result.fits);
        assert_eq!(result.font_size, 4.0);
        // Each word overflows the width on its own, so one line per word.
        assert_eq!(result.lines.len(), 4);
    }

    #[test]
    fn font_size_stays_within_bounds() {
        for text in ["x", "some longer label text", "word word word word"] {
            let req = request(text, Rect::new(0.0, 0.0, 0.1, 0.05), 12.0, 5.0);
            let result = fit(&RuledCanvas, &req);
            assert!(result.font_size >= 5.0 && result.font_size <= 12.0);
        }
    }

    #[test]
    fn empty_and_whitespace_text_is_degenerate() {
        for text in ["", "   ", "\n\t "] {
            let req = request(text, Rect::new(0.0, 0.0, 0.1, 0.1), 10.0, 4.0);
            let result = fit(&RuledCanvas, &req);
            assert!(result.fits);
            assert!(result.lines.is_empty());
            assert_eq!(result.font_size, 4.0);
        }
    }

    #[test]
    fn overlong_word_is_never_split() {
        let req = request(
            "abcdefghijklmnopqrst",
            Rect::new(0.0, 0.0, 0.05, 1.0),
            10.0,
            4.0,
        );
        let result = fit(&RuledCanvas, &req);
        assert!(!result.fits);
        assert_eq!(result.lines, vec!["abcdefghijklmnopqrst".to_string()]);
        assert_eq!(result.font_size, 4.0);
    }

    #[test]
    fn collapses_runs_of_whitespace_between_words() {
        let req = request("a\n b   c", Rect::new(0.0, 0.0, 1.0, 1.0), 10.0, 4.0);
        let result = fit(&RuledCanvas, &req);
        assert_eq!(result.lines, vec!["a b c".to_string()]);
    }
}
