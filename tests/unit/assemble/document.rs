use super::*;
use crate::assets::decode::LoadedImage;
use crate::model::config::FontConfig;
use crate::model::scene::{ImageRef, Scene};

fn raster() -> TextRasterizer {
    TextRasterizer::new(&FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    })
}

#[test]
fn wide_image_fills_content_width() {
    let cfg = DocumentConfig::default();
    let page = plan_page("Title", "short narrative", Some(4.0), &cfg);
    assert!((page.image.width() - cfg.content_width_pt()).abs() < 1e-9);
    assert!((page.image.height() - cfg.content_width_pt() / 4.0).abs() < 1e-9);
    assert_eq!(page.image.y0, page.image_budget.y0);
}

#[test]
fn tall_image_is_shrunk_to_budget_and_recentered() {
    let cfg = DocumentConfig::default();
    let page = plan_page("Title", "short narrative", Some(0.5), &cfg);
    let budget = page.image_budget;
    assert!((page.image.height() - budget.height()).abs() < 1e-9);
    assert!((page.image.width() - budget.height() * 0.5).abs() < 1e-9);
    let center = (page.image.x0 + page.image.x1) / 2.0;
    assert!((center - cfg.page_width_pt / 2.0).abs() < 1e-9);
}

#[test]
fn budget_subtracts_blocks_margins_and_gaps() {
    let cfg = DocumentConfig::default();
    let page = plan_page("Title", &"长".repeat(200), None, &cfg);
    let expected = cfg.page_height_pt
        - 2.0 * cfg.margin_pt
        - f64::from(page.title_text.height)
        - f64::from(page.narrative_text.height)
        - 2.0 * cfg.block_gap_pt;
    assert!((page.image_budget.height() - expected).abs() < 1e-6);
    assert!(page.narrative_text.lines.len() > 1);
    assert!((page.narrative.y1 - (cfg.page_height_pt - cfg.margin_pt)).abs() < 1e-9);
    assert!(page.image.y1 <= page.narrative.y0);
}

#[test]
fn overlong_narrative_is_capped_and_keeps_the_image_on_the_page() {
    let cfg = DocumentConfig::default();
    let page = plan_page("Title", &"长".repeat(5000), Some(1.5), &cfg);
    let cap = (cfg.page_height_pt - 2.0 * cfg.margin_pt) * NARRATIVE_MAX_SHARE;

    assert!(f64::from(page.narrative_text.height) <= cap);
    assert!(page.narrative_text.lines.len() > 1);
    assert!(page.narrative_text.lines.last().unwrap().ends_with('…'));
    assert!(page.narrative.y0 > page.title.y1);
    assert!(page.image_budget.height() > 0.0);
    assert!(page.image.height() > 0.0 && page.image.y1 <= page.narrative.y0);
}

#[test]
fn plans_are_deterministic() {
    let cfg = DocumentConfig::default();
    let a = plan_page("T", "N", Some(1.5), &cfg);
    let b = plan_page("T", "N", Some(1.5), &cfg);
    assert_eq!(a, b);
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn page_title_includes_ordinal() {
    assert_eq!(page_title("  ", 3), "Scene 3");
    assert_eq!(page_title("My Story", 2), "My Story · Scene 2");
}

#[test]
fn document_has_one_page_per_entry() {
    let scenes = [
        Scene::new(0, "first", "", Some(ImageRef::new("a"))),
        Scene::new(1, "second", "", Some(ImageRef::new("b"))),
    ];
    let entries = vec![
        RenderEntry {
            ordinal: 1,
            scene: &scenes[0],
            image: LoadedImage::from_pixels(image::RgbaImage::from_pixel(
                32,
                16,
                image::Rgba([10, 200, 30, 255]),
            )),
            text_baked: false,
        },
        RenderEntry {
            ordinal: 2,
            scene: &scenes[1],
            image: LoadedImage::Unavailable,
            text_baked: false,
        },
    ];
    let artifact = assemble_document(&entries, "My Story", &DocumentConfig::default(), &raster());
    assert_eq!(artifact.file_name, "My_Story_Storyboard.pdf");
    assert_eq!(artifact.media_type, "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-"));

    let doc = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn no_entries_yield_empty_document() {
    let artifact = assemble_document(&[], "x", &DocumentConfig::default(), &raster());
    assert!(artifact.is_empty());
    assert_eq!(artifact.file_name, "x_Storyboard.pdf");
}

#[test]
fn flatten_blends_alpha_over_white() {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
    assert_eq!(flatten_on_white(&img).get_pixel(0, 0).0, [255, 255, 255]);
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
    assert_eq!(flatten_on_white(&img).get_pixel(0, 0).0, [10, 20, 30]);
}
