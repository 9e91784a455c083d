use ab_glyph::{Font, ScaleFont};

use crate::font::FontHandle;
use crate::primitives::TextStyle;

/// Font-size factor for sub/superscript spans.
pub const SCRIPT_SCALE: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Vertical placement of a markup span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Baseline,
    Sub,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub shift: Shift,
}

/// Split a label into spans: `H_{T}` subscripts, `fb^{-1}` superscripts.
///
/// `_` or `^` not followed by `{` is literal, so raw trigger ids pass through.
pub fn parse_markup(s: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        let shift = match ch {
            '_' => Shift::Sub,
            '^' => Shift::Super,
            _ => {
                plain.push(ch);
                continue;
            }
        };
        if chars.peek() != Some(&'{') {
            plain.push(ch);
            continue;
        }
        chars.next();
        let mut inner = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            inner.push(c);
        }
        if !closed {
            // Unbalanced: keep the text as typed.
            plain.push(ch);
            plain.push('{');
            plain.push_str(&inner);
            continue;
        }
        if !plain.is_empty() {
            spans.push(Span { text: std::mem::take(&mut plain), shift: Shift::Baseline });
        }
        spans.push(Span { text: inner, shift });
    }
    if !plain.is_empty() {
        spans.push(Span { text: plain, shift: Shift::Baseline });
    }
    spans
}

/// Scale at which one em of `font` spans `size_pt` canvas units, matching SVG `font-size`.
///
/// `PxScale` is the ascent-to-descent height, which is taller than the em box.
pub fn em_scale<F: Font>(font: &F, size_pt: f64) -> ab_glyph::PxScale {
    let upem = font.units_per_em().unwrap_or(1000.0);
    ab_glyph::PxScale::from(size_pt as f32 * font.height_unscaled() / upem)
}

/// Measure text width and height in points using ab_glyph.
///
/// Without a font face the width is estimated from the character count.
pub fn measure_text<F: Font>(font: Option<&F>, text: &str, size_pt: f64) -> TextMetrics {
    let Some(font) = font else {
        return TextMetrics {
            width: text.chars().count() as f64 * size_pt * 0.55,
            height: size_pt * 1.2,
            ascent: size_pt * 0.9,
        };
    };

    let scaled = font.as_scaled(em_scale(font, size_pt));

    let mut width: f32 = 0.0;
    let mut prev_glyph_id = None;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = prev_glyph_id {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph_id = Some(glyph_id);
    }

    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let height = ascent - descent;

    TextMetrics { width: width as f64, height: height as f64, ascent: ascent as f64 }
}

/// Measure a markup label with a TextStyle, selecting the correct font face.
pub fn measure_styled(fonts: &FontHandle, text: &str, style: &TextStyle) -> TextMetrics {
    let font = fonts.select(style.weight, style.style);
    let mut total = measure_text(font, "", style.size);
    for span in parse_markup(text) {
        let size = match span.shift {
            Shift::Baseline => style.size,
            Shift::Sub | Shift::Super => style.size * SCRIPT_SCALE,
        };
        total.width += measure_text(font, &span.text, size).width;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{FontStyle, FontWeight};

    #[test]
    fn plain_text_is_one_span() {
        let spans = parse_markup("Events [A.U.]");
        assert_eq!(spans, vec![Span { text: "Events [A.U.]".into(), shift: Shift::Baseline }]);
    }

    #[test]
    fn sub_and_superscripts() {
        let spans = parse_markup("L1 H_{T} [GeV], fb^{-1}");
        let shifts: Vec<Shift> = spans.iter().map(|s| s.shift).collect();
        assert_eq!(
            shifts,
            vec![Shift::Baseline, Shift::Sub, Shift::Baseline, Shift::Super]
        );
        assert_eq!(spans[1].text, "T");
        assert_eq!(spans[3].text, "-1");
    }

    #[test]
    fn trigger_ids_stay_literal() {
        let spans = parse_markup("pure_L1_DST_PFScouting_AXONominal");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "pure_L1_DST_PFScouting_AXONominal");
    }

    #[test]
    fn unbalanced_brace_is_literal() {
        let spans = parse_markup("a_{b");
        assert_eq!(spans, vec![Span { text: "a_{b".into(), shift: Shift::Baseline }]);
    }

    #[test]
    fn heuristic_measurement() {
        let m = measure_text::<ab_glyph::FontVec>(None, "Hello", 10.0);
        assert!((m.width - 27.5).abs() < 1e-9);
        assert!(m.height > 10.0);
    }

    #[test]
    fn width_is_em_based() {
        let Some(font) = FontHandle::shared().select(FontWeight::Regular, FontStyle::Normal) else {
            return;
        };
        let upem = f64::from(font.units_per_em().unwrap_or(1000.0));
        let expected: f64 = "AXO Nominal"
            .chars()
            .map(|c| f64::from(font.h_advance_unscaled(font.glyph_id(c))) * 16.0 / upem)
            .sum();
        let m = measure_text(Some(font), "AXO Nominal", 16.0);
        // kerning only
        assert!((m.width - expected).abs() < 0.05 * expected, "{} vs {}", m.width, expected);
    }

    #[test]
    fn scripts_are_narrower() {
        let fonts = FontHandle::empty();
        let style = TextStyle::default();
        let plain = measure_styled(&fonts, "HT", &style).width;
        let sub = measure_styled(&fonts, "H_{T}", &style).width;
        assert!(sub < plain);
    }
}
