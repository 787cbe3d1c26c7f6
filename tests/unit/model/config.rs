use super::*;

#[test]
fn defaults_validate() {
    ExportConfig::new(ExportFormat::Bundle, false)
        .validate()
        .unwrap();
}

#[test]
fn minimal_json_fills_documented_defaults() {
    let cfg: ExportConfig = serde_json::from_str(r#"{"format":"composite_raster","withText":true}"#)
        .unwrap();
    assert_eq!(cfg.format, ExportFormat::CompositeRaster);
    assert!(cfg.with_text);
    assert_eq!(cfg.options.sheet.canvas_width, 2480);
    assert_eq!(cfg.options.sheet.panel.columns, 2);
    assert_eq!(cfg.options.strip.width, 1080);
    assert!(!cfg.options.debug_guides);
}

#[test]
fn aspect_ratio_uses_ratio_labels_in_json() {
    let p: AspectRatioPolicy = serde_json::from_str("\"16:9\"").unwrap();
    assert_eq!(p, AspectRatioPolicy::Widescreen16x9);
    let auto: AspectRatioPolicy = serde_json::from_str("\"auto\"").unwrap();
    assert_eq!(auto, AspectRatioPolicy::Auto);
    assert_eq!(serde_json::to_string(&AspectRatioPolicy::Tall9x16).unwrap(), "\"9:16\"");
}

#[test]
fn mode_selects_default_ratio_unless_overridden() {
    let mut panel = PanelLayoutConfig::default();
    assert_eq!(
        panel.aspect_ratio_for(GenerationMode::Comic),
        AspectRatioPolicy::Landscape4x3
    );
    assert_eq!(
        panel.aspect_ratio_for(GenerationMode::Storyboard),
        AspectRatioPolicy::Widescreen16x9
    );
    panel.aspect_ratio = Some(AspectRatioPolicy::Square);
    assert_eq!(
        panel.aspect_ratio_for(GenerationMode::Comic),
        AspectRatioPolicy::Square
    );
}

#[test]
fn zero_columns_is_rejected() {
    let mut cfg = ExportConfig::new(ExportFormat::CompositeRaster, false);
    cfg.options.sheet.panel.columns = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("columns"));
}

#[test]
fn zero_threads_is_rejected() {
    let mut cfg = ExportConfig::new(ExportFormat::Bundle, false);
    cfg.options.threading.threads = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn document_margin_must_leave_room() {
    let mut cfg = ExportConfig::new(ExportFormat::Document, false);
    cfg.options.document.margin_pt = 400.0;
    assert!(cfg.validate().is_err());
    cfg.options.document.margin_pt = 36.0;
    cfg.options.document.jpeg_quality = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn bad_font_sizes_are_rejected() {
    let mut cfg = ExportConfig::new(ExportFormat::CompositeRaster, false);
    cfg.options.sheet.bubble.font_size = f32::NAN;
    assert!(cfg.validate().is_err());
    let mut cfg = ExportConfig::new(ExportFormat::CompositeRaster, false);
    cfg.options.strip.caption_font_size = 0.0;
    assert!(cfg.validate().is_err());
}
