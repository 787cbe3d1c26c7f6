use super::*;
use crate::assets::decode::LoadedImage;
use crate::foundation::core::PLACEHOLDER_GRAY;
use crate::model::config::FontConfig;
use crate::model::scene::{ImageRef, Scene};

fn raster() -> TextRasterizer {
    TextRasterizer::new(&FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    })
}

fn scenes(n: u32, narrative: &str) -> Vec<Scene> {
    (0..n)
        .map(|i| Scene::new(i, narrative, "", Some(ImageRef::new(format!("s{i}")))))
        .collect()
}

fn entries<'a>(scenes: &'a [Scene], image: &LoadedImage, baked: bool) -> Vec<RenderEntry<'a>> {
    scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| RenderEntry {
            ordinal: i + 1,
            scene,
            image: image.clone(),
            text_baked: baked,
        })
        .collect()
}

fn small_config() -> SheetConfig {
    let mut cfg = SheetConfig {
        canvas_width: 400,
        header_height: 40,
        title_font_size: 16.0,
        meta_font_size: 10.0,
        shadow_offset: 3,
        badge_radius: 8.0,
        ..SheetConfig::default()
    };
    cfg.panel.margins = Edges::uniform(10);
    cfg.panel.spacing = 10;
    cfg.panel.border_width = 2;
    cfg.panel.caption_font_size = 10.0;
    cfg.panel.caption_gap = 4;
    cfg
}

#[test]
fn five_panels_fill_three_rows_in_two_columns() {
    let scenes = scenes(5, "");
    let e = entries(&scenes, &LoadedImage::Unavailable, true);
    let plan = plan_sheet(&e, "Story", GenerationMode::Comic, &SheetConfig::default()).unwrap();

    assert_eq!(plan.grid.rows(), 3);
    let last = plan.grid.cells[4];
    assert_eq!((last.row, last.column), (2, 0));
    assert_eq!(last.panel.y, plan.grid.row_offsets[2]);
    assert_eq!(plan.grid.cells[0].panel.y, 60 + 220);
    assert!(plan.grid.cells[1].panel.x > plan.grid.cells[0].panel.x);
    assert_eq!(plan.meta_line, "5 PANELS · COMIC · 4:3");
    assert_eq!(plan.canvas.height, plan.grid.total_height);
    assert_eq!(plan.grid.cells[0].panel.height, 837);
}

#[test]
fn detached_captions_extend_their_row_only() {
    let scenes = vec![
        Scene::new(0, "测".repeat(40), "", Some(ImageRef::new("a"))),
        Scene::new(1, "", "", Some(ImageRef::new("b"))),
        Scene::new(2, "", "", Some(ImageRef::new("c"))),
    ];
    let e = entries(&scenes, &LoadedImage::Unavailable, false);
    let cfg = SheetConfig::default();
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();

    let caption = plan.captions[0].as_ref().unwrap();
    let font_px = cfg.panel.caption_font_size;
    assert!(caption.lines.len() > 1);
    assert!(caption.max_line_width(FontSpec::new(font_px)) <= plan.grid.panel_width as f32);
    assert!(plan.captions[1].is_none());

    let extent = cfg.panel.caption_gap + caption.height_px();
    assert_eq!(plan.grid.row_heights[0], 837 + extent);
    assert_eq!(plan.grid.row_heights[1], 837);
    assert_eq!(plan.grid.cells[0].caption.unwrap().y, plan.grid.cells[0].panel.bottom());
}

#[test]
fn bubble_placement_keeps_rows_tight() {
    let scenes = scenes(2, "你好");
    let e = entries(&scenes, &LoadedImage::Unavailable, false);
    let mut cfg = SheetConfig::default();
    cfg.panel.caption_placement = CaptionPlacement::Bubble;
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();

    assert!(plan.captions.iter().all(Option::is_none));
    assert_eq!(plan.grid.row_heights[0], 837);
    let bubble = plan.bubbles[1].as_ref().unwrap();
    let panel = plan.grid.cells[1].panel.to_rect();
    assert!(panel.contains(bubble.rect.origin()));
}

#[test]
fn baked_text_suppresses_captions() {
    let scenes = scenes(2, "narrative");
    let e = entries(&scenes, &LoadedImage::Unavailable, true);
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &SheetConfig::default()).unwrap();
    assert!(plan.captions.iter().all(Option::is_none));
    assert!(plan.bubbles.iter().all(Option::is_none));
}

#[test]
fn explicit_ratio_overrides_mode_default() {
    let scenes = scenes(1, "");
    let e = entries(&scenes, &LoadedImage::Unavailable, true);
    let mut cfg = SheetConfig::default();
    cfg.panel.aspect_ratio = Some(AspectRatioPolicy::Square);
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();
    assert_eq!(plan.grid.cells[0].panel.height, plan.grid.panel_width);
    assert!(plan.meta_line.ends_with("1:1"));
}

#[test]
fn baked_square_image_keeps_its_caption_bar_visible() {
    let mut px = image::RgbaImage::from_pixel(400, 400, image::Rgba([0, 200, 0, 255]));
    for y in 340..400 {
        for x in 0..400 {
            px.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
        }
    }
    let scenes = scenes(1, "baked narrative");
    let e = entries(&scenes, &LoadedImage::from_pixels(px), true);
    let cfg = small_config();
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();
    let panel = plan.grid.cells[0].panel;
    assert_eq!(panel.height, panel.width);
    assert!(plan.meta_line.ends_with("4:3"));

    let artifact = assemble_sheet(&e, "t", GenerationMode::Comic, &cfg, false, &raster());
    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    let cx = panel.x + panel.width / 2;
    let bar = img.get_pixel(cx, panel.bottom() - 8).0;
    assert!(bar[..3].iter().all(|&c| c >= 250), "caption bar cropped: {bar:?}");
    let body = img.get_pixel(cx, panel.y + panel.height / 3).0;
    assert!(body[1] >= 195 && body[0] <= 5, "{body:?}");
}

#[test]
fn rendered_sheet_matches_plan_and_draws_placeholders() {
    let scenes = scenes(3, "caption");
    let e = entries(&scenes, &LoadedImage::Unavailable, false);
    let cfg = small_config();
    let plan = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();

    let artifact = assemble_sheet(&e, "My Sheet", GenerationMode::Comic, &cfg, true, &raster());
    assert_eq!(artifact.file_name, "My_Sheet_ComicPage.png");
    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (plan.canvas.width, plan.canvas.height));

    let panel = plan.grid.cells[2].panel;
    let center = img.get_pixel(panel.x + panel.width / 2, panel.y + panel.height / 2).0;
    assert_eq!(center, PLACEHOLDER_GRAY);
    // badge at the top-left corner
    assert_eq!(img.get_pixel(panel.x + 2, panel.y + 3).0, [0, 0, 0, 255]);
}

#[test]
fn no_entries_or_bad_grid_yield_empty_sheet() {
    let cfg = small_config();
    assert!(assemble_sheet(&[], "t", GenerationMode::Comic, &cfg, false, &raster()).is_empty());

    let scenes = scenes(1, "");
    let e = entries(&scenes, &LoadedImage::Unavailable, true);
    let mut bad = small_config();
    bad.panel.columns = 0;
    assert!(assemble_sheet(&e, "t", GenerationMode::Comic, &bad, false, &raster()).is_empty());
}

#[test]
fn plans_fingerprint_identically() {
    let scenes = scenes(4, "同一个故事");
    let e = entries(&scenes, &LoadedImage::Unavailable, false);
    let cfg = SheetConfig::default();
    let a = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();
    let b = plan_sheet(&e, "t", GenerationMode::Comic, &cfg).unwrap();
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}
