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

fn image(w: u32, h: u32) -> LoadedImage {
    LoadedImage::from_pixels(image::RgbaImage::from_pixel(w, h, image::Rgba([0, 90, 200, 255])))
}

#[test]
fn images_stack_at_full_width_with_captions_between() {
    let scenes = [
        Scene::new(0, "第一幕", "", Some(ImageRef::new("a"))),
        Scene::new(1, "", "", Some(ImageRef::new("b"))),
    ];
    let entries = [
        RenderEntry {
            ordinal: 1,
            scene: &scenes[0],
            image: image(200, 100),
            text_baked: false,
        },
        RenderEntry {
            ordinal: 2,
            scene: &scenes[1],
            image: LoadedImage::Unavailable,
            text_baked: false,
        },
    ];
    let cfg = StripConfig::default();
    let plan = plan_strip(&entries, "Title", &cfg).unwrap();

    let title_band = (cfg.title_font_size * 1.4).ceil() as u32 + 2 * cfg.title_padding;
    assert_eq!(plan.title_band.height, title_band);

    let first = plan.grid.cells[0];
    assert_eq!(first.panel, PixelRect::new(0, title_band, 1080, 540));
    let caption = first.caption.unwrap();
    let caption_h = (cfg.caption_font_size * 1.4).ceil() as u32 + 2 * cfg.caption_padding;
    assert_eq!(caption.height, caption_h);

    let second = plan.grid.cells[1];
    assert_eq!(second.panel.y, caption.bottom());
    assert_eq!(second.panel.height, 810);
    assert!(second.caption.is_none());
    assert_eq!(plan.canvas.height, second.panel.bottom());
}

#[test]
fn blank_title_has_no_band() {
    let scenes = [Scene::new(0, "", "", Some(ImageRef::new("a")))];
    let entries = [RenderEntry {
        ordinal: 1,
        scene: &scenes[0],
        image: image(10, 10),
        text_baked: true,
    }];
    let plan = plan_strip(&entries, "   ", &StripConfig::default()).unwrap();
    assert_eq!(plan.title_band.height, 0);
    assert_eq!(plan.grid.cells[0].panel.y, 0);
    assert_eq!(plan.canvas.height, 1080);
}

#[test]
fn rendered_strip_draws_images_and_placeholders() {
    let scenes = [
        Scene::new(0, "caption", "", Some(ImageRef::new("a"))),
        Scene::new(1, "", "", Some(ImageRef::new("b"))),
    ];
    let entries = [
        RenderEntry {
            ordinal: 1,
            scene: &scenes[0],
            image: image(40, 20),
            text_baked: false,
        },
        RenderEntry {
            ordinal: 2,
            scene: &scenes[1],
            image: LoadedImage::Unavailable,
            text_baked: false,
        },
    ];
    let cfg = StripConfig {
        width: 200,
        title_font_size: 12.0,
        title_padding: 6,
        caption_font_size: 10.0,
        caption_padding: 4,
        ..StripConfig::default()
    };
    let plan = plan_strip(&entries, "Long Strip", &cfg).unwrap();
    let artifact = assemble_strip(&entries, "Long Strip", &cfg, false, &raster());
    assert_eq!(artifact.file_name, "Long_Strip_LongImage.png");

    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (200, plan.canvas.height));
    let p0 = plan.grid.cells[0].panel;
    let drawn = img.get_pixel(100, p0.y + p0.height / 2).0;
    for (got, want) in drawn.iter().zip([0u8, 90, 200, 255]) {
        assert!(got.abs_diff(want) <= 2, "{drawn:?}");
    }
    let p1 = plan.grid.cells[1].panel;
    assert_eq!(img.get_pixel(100, p1.y + p1.height / 2).0, PLACEHOLDER_GRAY);
}

#[test]
fn no_entries_yield_empty_strip() {
    let artifact = assemble_strip(&[], "t", &StripConfig::default(), false, &raster());
    assert!(artifact.is_empty());
    assert_eq!(artifact.media_type, "image/png");
}
