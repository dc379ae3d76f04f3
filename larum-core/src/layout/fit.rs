//! The fitting algorithm
//!
//! Per candidate font, largest first, first success wins:
//!
//! 1. Split the text on spaces/newlines into words.
//! 2. Greedily pack words into lines. A word that alone is wider than the
//!    rect fails the whole font; there is no character-level splitting.
//! 3. Reject the font when the line count would pass [`MAX_LINES`] or the
//!    stacked line heights overrun the rect.
//! 4. On acceptance, center each line by its own width and the block of
//!    lines vertically.
//!
//! Empty input is always representable as a single empty line.

use heapless::Vec;

use super::{FittedLayout, FontMetrics, LayoutError, Rect, TextLine, MAX_LINES};

/// Word boundaries as byte ranges into the source text
struct Words<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Words<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && self.text[self.pos..].starts_with(char::is_whitespace) {
            self.pos += self.text[self.pos..].chars().next().map_or(1, char::len_utf8);
        }
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < bytes.len() && !self.text[self.pos..].starts_with(char::is_whitespace) {
            self.pos += self.text[self.pos..].chars().next().map_or(1, char::len_utf8);
        }
        Some((start, self.pos))
    }
}

/// An unpositioned line during packing
#[derive(Clone, Copy)]
struct RawLine {
    start: usize,
    end: usize,
    width: u32,
}

/// Fit text into a rect, trying fonts from largest to smallest
pub fn fit<'a>(
    text: &'a str,
    rect: Rect,
    fonts: &[FontMetrics],
) -> Result<FittedLayout<'a>, LayoutError> {
    for (font_index, font) in fonts.iter().enumerate() {
        if let Some(lines) = try_font(text, rect, font) {
            return Ok(position(text, rect, font_index, *font, &lines));
        }
    }
    Err(LayoutError::TooLong)
}

/// Greedy word packing for one font; None when the font cannot represent
/// the text inside the rect
fn try_font(text: &str, rect: Rect, font: &FontMetrics) -> Option<Vec<RawLine, MAX_LINES>> {
    let mut lines: Vec<RawLine, MAX_LINES> = Vec::new();
    let mut current: Option<RawLine> = None;
    let space = font.advance;

    for (start, end) in Words::new(text) {
        let word_width = font.text_width(&text[start..end]);
        if word_width > rect.width {
            // No character-level splitting: the font is out.
            return None;
        }
        current = Some(match current {
            None => RawLine { start, end, width: word_width },
            Some(line) if line.width + space + word_width <= rect.width => RawLine {
                start: line.start,
                end,
                width: line.width + space + word_width,
            },
            Some(line) => {
                lines.push(line).ok()?;
                RawLine { start, end, width: word_width }
            }
        });
    }

    match current {
        Some(line) => lines.push(line).ok()?,
        // No words at all: one empty line.
        None => lines.push(RawLine { start: 0, end: 0, width: 0 }).ok()?,
    }

    if lines.len() as u32 * font.line_height > rect.height {
        return None;
    }
    Some(lines)
}

/// Center the accepted lines within the rect
fn position<'a>(
    text: &'a str,
    rect: Rect,
    font_index: usize,
    font: FontMetrics,
    raw: &[RawLine],
) -> FittedLayout<'a> {
    let block_height = raw.len() as u32 * font.line_height;
    let top = (rect.height - block_height) / 2;

    let mut lines = Vec::new();
    for (i, line) in raw.iter().enumerate() {
        let placed = TextLine {
            content: &text[line.start..line.end],
            width: line.width,
            x: (rect.width - line.width) / 2,
            y: top + i as u32 * font.line_height,
        };
        // Capacity was already respected during packing.
        let _ = lines.push(placed);
    }

    FittedLayout { font_index, font, lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The display's candidate ladder, as in the firmware font table
    const FONTS: [FontMetrics; 7] = [
        FontMetrics::new(38, 22),
        FontMetrics::new(32, 18),
        FontMetrics::new(24, 14),
        FontMetrics::new(16, 9),
        FontMetrics::new(12, 7),
        FontMetrics::new(8, 5),
        FontMetrics::new(6, 4),
    ];

    #[test]
    fn test_short_word_takes_the_largest_font() {
        // "HELLO" at 22 px/char = 110 px, fits 128 wide and 38 high.
        let layout = fit("HELLO", Rect::new(128, 44), &FONTS).unwrap();
        assert_eq!(layout.font_index, 0);
        assert_eq!(layout.lines.len(), 1);

        let line = layout.lines[0];
        assert_eq!(line.content, "HELLO");
        assert_eq!(line.width, 110);
        assert_eq!(line.x, 9);
        assert_eq!(line.y, 3);
    }

    #[test]
    fn test_wide_word_steps_down_the_ladder() {
        // Seven chars: 7*22 = 154 and 7*18 = 126; the 32 px font is the
        // first that fits 128 px.
        let layout = fit("STATION", Rect::new(128, 44), &FONTS).unwrap();
        assert_eq!(layout.font_index, 1);
        assert_eq!(layout.lines[0].width, 126);
    }

    #[test]
    fn test_wrapping_respects_rect_width() {
        let layout = fit("TEA IS READY", Rect::new(60, 64), &FONTS).unwrap();
        for line in layout.lines.iter() {
            assert!(line.width <= 60);
            assert!(!line.content.starts_with(' '));
            assert!(!line.content.ends_with(' '));
        }
        // All words survive, in order.
        let rebuilt: heapless::String<64> = layout
            .lines
            .iter()
            .flat_map(|l| l.content.chars().chain(core::iter::once(' ')))
            .collect();
        assert_eq!(rebuilt.trim_end(), "TEA IS READY");
    }

    #[test]
    fn test_height_budget_rejects_large_fonts() {
        // Two words that can never share a line at 24 px: widths 5*14=70
        // and 4*14=56 in an 80 px rect; two lines need 48 px of height,
        // which a 44 px rect refuses; the 16 px font fits both on one
        // line? 5+1+4 chars * 9 = 90 > 80, so two 16 px lines = 32 px.
        let layout = fit("FRESH TEAS", Rect::new(80, 44), &FONTS).unwrap();
        assert_eq!(layout.font_index, 3);
        assert_eq!(layout.lines.len(), 2);
    }

    #[test]
    fn test_too_long_when_nothing_fits() {
        // One unbreakable 40-char word: even at 4 px/char it is 160 px.
        let word = "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMN";
        assert_eq!(fit(word, Rect::new(128, 44), &FONTS), Err(LayoutError::TooLong));
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let layout = fit("", Rect::new(128, 44), &FONTS).unwrap();
        assert_eq!(layout.font_index, 0);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].content, "");
        assert_eq!(layout.lines[0].width, 0);
        assert_eq!(layout.lines[0].x, 64);
    }

    #[test]
    fn test_newlines_are_word_separators() {
        let a = fit("GOOD\nMORNING", Rect::new(128, 64), &FONTS).unwrap();
        let b = fit("GOOD MORNING", Rect::new(128, 64), &FONTS).unwrap();
        assert_eq!(a.font_index, b.font_index);
        assert_eq!(a.lines.len(), b.lines.len());
    }

    #[test]
    fn test_block_is_vertically_centered() {
        let layout = fit("UP", Rect::new(128, 44), &FONTS).unwrap();
        let line = layout.lines[0];
        // 44 - 38 = 6 px of slack, split evenly.
        assert_eq!(line.y, 3);
    }

    #[test]
    fn test_line_count_capped() {
        // Ten one-char words in a rect one char wide: exactly MAX_LINES
        // at the smallest font; an eleventh word would overflow.
        let text = "A B C D E F G H I J";
        let layout = fit(text, Rect::new(4, 60), &FONTS).unwrap();
        assert_eq!(layout.lines.len(), MAX_LINES);
        assert_eq!(layout.font_index, 6);

        let text = "A B C D E F G H I J K";
        assert_eq!(fit(text, Rect::new(4, 60), &FONTS), Err(LayoutError::TooLong));
    }

    #[test]
    fn test_multibyte_text_measures_by_chars() {
        // Five chars, not six bytes.
        let layout = fit("héllo", Rect::new(128, 44), &FONTS).unwrap();
        assert_eq!(layout.lines[0].width, 5 * 22);
    }
}
