use crate::{
    foundation::core::{Rgba8, hex_rgb},
    foundation::error::{ExportError, ExportResult},
    model::config::FontConfig,
    render::surface::Surface,
    text::measure::{FontSpec, LINE_HEIGHT_FACTOR},
    text::wrap::WrappedText,
};

/// Fraction of the em box above the baseline.
const ASCENT_RATIO: f32 = 0.88;

/// Horizontal anchor of a drawn line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Start,
    /// `x` is the horizontal center.
    Center,
    /// `x` is the right edge.
    End,
}

/// Offset duplicate drawn beneath text for legibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    /// Offset applied to both axes.
    pub offset: f32,
    /// Shadow color.
    pub color: Rgba8,
}

/// How a line of text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Size and weight.
    pub font: FontSpec,
    /// Fill color.
    pub color: Rgba8,
    /// Anchor of the `x` coordinate.
    pub align: TextAlign,
    /// Optional drop shadow.
    pub shadow: Option<TextShadow>,
}

impl TextStyle {
    /// Left-aligned text without shadow.
    pub fn new(font: FontSpec, color: Rgba8) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Start,
            shadow: None,
        }
    }

    /// Same style with a different anchor.
    pub fn aligned(self, align: TextAlign) -> Self {
        Self { align, ..self }
    }

    /// Same style with a drop shadow.
    pub fn with_shadow(self, shadow: TextShadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }
}

/// Draws text lines onto surfaces by rasterizing SVG `<text>` through resvg.
///
/// Glyph lookup uses the font database built at construction; layout never depends on it, so a
/// machine without matching fonts produces identical geometry with missing glyphs.
pub struct TextRasterizer {
    options: usvg::Options<'static>,
    family_attr: String,
}

impl TextRasterizer {
    /// Build a rasterizer with its own font database.
    pub fn new(fonts: &FontConfig) -> Self {
        let mut options = usvg::Options::default();
        if let Some(first) = fonts.families.first() {
            options.font_family = first.clone();
        }

        let db = options.fontdb_mut();
        if fonts.load_system_fonts {
            db.load_system_fonts();
        }
        for path in &fonts.font_files {
            if let Err(e) = db.load_font_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
            }
        }
        for dir in &fonts.font_dirs {
            db.load_fonts_dir(dir);
        }
        if let Some(family) = generic_stand_in(db) {
            tracing::debug!(%family, "generic font families mapped to a loaded face");
            db.set_sans_serif_family(family.clone());
            db.set_serif_family(family.clone());
            db.set_monospace_family(family);
        }
        tracing::debug!(faces = db.len(), "text rasterizer font database ready");
        options.font_resolver = any_face_resolver();

        Self {
            options,
            family_attr: family_attr(&fonts.families),
        }
    }

    /// Number of font faces available for glyph lookup.
    pub fn face_count(&self) -> usize {
        self.options.fontdb.len()
    }

    /// Draw one line whose line box starts at `top`.
    pub fn draw_line(
        &self,
        surface: &mut Surface,
        text: &str,
        x: f32,
        top: f32,
        style: &TextStyle,
    ) -> ExportResult<()> {
        let clean = sanitize(text);
        if clean.trim().is_empty() {
            return Ok(());
        }

        let size = style.font.size_px;
        let baseline = top + size * (LINE_HEIGHT_FACTOR - 1.0) * 0.5 + size * ASCENT_RATIO;

        if let Some(shadow) = style.shadow {
            self.render_text(
                surface,
                &clean,
                x + shadow.offset,
                baseline + shadow.offset,
                style,
                shadow.color,
            )?;
        }
        self.render_text(surface, &clean, x, baseline, style, style.color)
    }

    /// Draw wrapped lines top-down starting at `top`.
    pub fn draw_block(
        &self,
        surface: &mut Surface,
        block: &WrappedText,
        x: f32,
        top: f32,
        style: &TextStyle,
    ) -> ExportResult<()> {
        for (i, line) in block.lines.iter().enumerate() {
            let y = top + i as f32 * block.line_height;
            self.draw_line(surface, line, x, y, style)?;
        }
        Ok(())
    }

    fn render_text(
        &self,
        surface: &mut Surface,
        text: &str,
        x: f32,
        baseline: f32,
        style: &TextStyle,
        color: Rgba8,
    ) -> ExportResult<()> {
        let (w, h) = (surface.width(), surface.height());
        let anchor = match style.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
            TextAlign::End => "end",
        };
        let weight = if style.font.bold { "bold" } else { "normal" };
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{x}" y="{baseline}" font-family="{family}" font-size="{size}" font-weight="{weight}" fill="{fill}" fill-opacity="{opacity}" text-anchor="{anchor}" xml:space="preserve">{body}</text></svg>"#,
            family = self.family_attr,
            size = style.font.size_px,
            fill = hex_rgb(color),
            opacity = f32::from(color[3]) / 255.0,
            body = xml_escape(text),
        );

        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| ExportError::layout(format!("text svg parse failed: {e}")))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut surface.pixmap_mut().as_mut(),
        );
        Ok(())
    }
}

/// Family to use for `sans-serif` and friends when fontdb's built-in names are not loaded.
///
/// Picks the smallest family name so the choice does not depend on directory scan order.
fn generic_stand_in(db: &usvg::fontdb::Database) -> Option<String> {
    use usvg::fontdb::{Family, Query};

    let generic = Query {
        families: &[Family::SansSerif],
        ..Query::default()
    };
    if db.query(&generic).is_some() {
        return None;
    }
    db.faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
        .min()
        .map(str::to_string)
}

/// Font selection that walks the requested families, then the generic ones, then settles for
/// any loaded face, so text is never dropped while the database is non-empty.
fn any_face_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb;

    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families: Vec<fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(name) => fontdb::Family::Name(name),
                })
                .collect();
            families.push(fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => fontdb::Style::Normal,
                usvg::FontStyle::Italic => fontdb::Style::Italic,
                usvg::FontStyle::Oblique => fontdb::Style::Oblique,
            };
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style,
            };

            db.query(&query).or_else(|| db.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn family_attr(families: &[String]) -> String {
    if families.is_empty() {
        return "sans-serif".to_string();
    }
    families
        .iter()
        .map(|f| {
            let f = xml_escape(f.trim());
            if f.contains(' ') {
                format!("'{f}'")
            } else {
                f
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Replace whitespace controls with spaces and drop the rest (XML forbids most of them).
fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
