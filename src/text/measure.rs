/// Line height as a multiple of font size, shared by every text block.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// Font parameters that affect measurement and drawing.
///
/// Measurement is fixed-width per character class, so no font data is needed to lay out text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size_px: f32,
    /// Bold weight when drawing.
    #[serde(default)]
    pub bold: bool,
}

impl FontSpec {
    /// Regular-weight font of the given size.
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    /// Bold variant of this font.
    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    /// Distance between consecutive baselines.
    pub fn line_height(self) -> f32 {
        self.size_px * LINE_HEIGHT_FACTOR
    }
}

/// Advance width of one character.
///
/// Wide (CJK, Hangul, fullwidth forms, emoji) characters take a full em, control characters take
/// nothing and everything else takes half an em.
pub fn char_width(ch: char, font: FontSpec) -> f32 {
    if ch.is_control() {
        return 0.0;
    }
    if is_wide(ch) {
        font.size_px
    } else {
        font.size_px * 0.5
    }
}

/// Advance width of a whole string.
pub fn measure(text: &str, font: FontSpec) -> f32 {
    text.chars().map(|ch| char_width(ch, font)).sum()
}

fn is_wide(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x1F900..=0x1F9FF
            | 0x20000..=0x3FFFD
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
