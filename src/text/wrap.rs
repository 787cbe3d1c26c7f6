use crate::text::measure::{FontSpec, char_width};

/// Result of wrapping text into lines.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WrappedText {
    /// Lines in reading order; concatenated they reproduce the input.
    pub lines: Vec<String>,
    /// Baseline-to-baseline distance.
    pub line_height: f32,
    /// `lines.len() × line_height`.
    pub height: f32,
}

impl WrappedText {
    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the widest line.
    pub fn max_line_width(&self, font: FontSpec) -> f32 {
        self.lines
            .iter()
            .map(|l| crate::text::measure::measure(l, font))
            .fold(0.0, f32::max)
    }

    /// Height rounded up to whole pixels.
    pub fn height_px(&self) -> u32 {
        self.height.ceil().max(0.0) as u32
    }
}

/// Greedy character-by-character wrap.
///
/// A line is closed as soon as adding the next character would push it past `max_width`; the
/// next line starts with that character. A single character wider than `max_width` gets its own
/// line. Whitespace is an ordinary character: no word boundaries, no hyphenation.
pub fn wrap(text: &str, max_width: f32, font: FontSpec) -> WrappedText {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_w = 0.0f32;

    for ch in text.chars() {
        let w = char_width(ch, font);
        if !line.is_empty() && line_w + w > max_width {
            lines.push(std::mem::take(&mut line));
            line_w = 0.0;
        }
        line.push(ch);
        line_w += w;
    }
    if !line.is_empty() {
        lines.push(line);
    }

    let line_height = font.line_height();
    let height = lines.len() as f32 * line_height;
    WrappedText {
        lines,
        line_height,
        height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
