use super::*;
use crate::model::config::FontConfig;

fn cfg() -> BubbleConfig {
    BubbleConfig {
        font_size: 20.0,
        padding: 10.0,
        ..BubbleConfig::default()
    }
}

fn panel() -> PixelRect {
    PixelRect::new(100, 200, 400, 300)
}

#[test]
fn short_text_hugs_its_line_and_anchors_top_left() {
    let b = layout_bubble("你好", panel(), &cfg());
    assert_eq!(b.text.lines, vec!["你好".to_string()]);
    assert!((b.rect.width() - (40.0 + 20.0)).abs() < 1e-6);
    assert!((b.rect.height() - (28.0 + 20.0)).abs() < 1e-3);
    assert_eq!(b.rect.origin(), Point::new(110.0, 210.0));
}

#[test]
fn width_is_capped_at_85_percent_of_panel() {
    let b = layout_bubble(&"测".repeat(60), panel(), &cfg());
    assert!(b.rect.width() <= 400.0 * MAX_WIDTH_SHARE + 1e-9);
    assert!(b.text.lines.len() > 1);
}

#[test]
fn height_is_lines_times_line_height_plus_padding() {
    let b = layout_bubble(&"测".repeat(30), panel(), &cfg());
    let expected = b.text.lines.len() as f64 * f64::from(FontSpec::new(20.0).line_height()) + 20.0;
    assert!((b.rect.height() - expected).abs() < 1e-3);
}

#[test]
fn tall_bubble_is_centered_under_auto() {
    let b = layout_bubble(&"测".repeat(120), panel(), &cfg());
    assert!(b.rect.height() > 300.0 * CENTER_HEIGHT_SHARE);
    let c = b.rect.center();
    assert!((c.x - 300.0).abs() < 1e-6);
    assert!((c.y - 350.0).abs() < 1e-6);
}

#[test]
fn explicit_corners_apply_margin_to_their_edges() {
    let mut c = cfg();
    c.position = BubblePosition::BottomRight;
    let b = layout_bubble("hi", panel(), &c);
    assert!((b.rect.x1 - (500.0 - BUBBLE_MARGIN)).abs() < 1e-6);
    assert!((b.rect.y1 - (500.0 - BUBBLE_MARGIN)).abs() < 1e-6);

    c.position = BubblePosition::TopRight;
    let b = layout_bubble("hi", panel(), &c);
    assert!((b.rect.x1 - 490.0).abs() < 1e-6);
    assert!((b.rect.y0 - 210.0).abs() < 1e-6);

    c.position = BubblePosition::BottomLeft;
    let b = layout_bubble("hi", panel(), &c);
    assert!((b.rect.x0 - 110.0).abs() < 1e-6);
    assert!((b.rect.y1 - 490.0).abs() < 1e-6);

    c.position = BubblePosition::Center;
    let b = layout_bubble("hi", panel(), &c);
    assert!((b.rect.center().x - 300.0).abs() < 1e-6);
}

#[test]
fn american_tail_hangs_below_bottom_left_at_fixed_offset() {
    use kurbo::Shape;

    let mut c = cfg();
    c.style = BubbleStyle::American;
    let rect = Rect::new(0.0, 0.0, 200.0, 80.0);
    let bbox = bubble_path(rect, &c).bounding_box();
    assert_eq!(bbox.y1, 80.0 + TAIL_TIP.1);
    assert_eq!(bbox.x0, 0.0);

    let big = Rect::new(0.0, 0.0, 2000.0, 800.0);
    let big_bbox = bubble_path(big, &c).bounding_box();
    assert_eq!(big_bbox.y1 - big.y1, bbox.y1 - rect.y1);
}

#[test]
fn draw_fills_bubble_interior() {
    let mut c = cfg();
    c.fill_color = [250, 240, 10, 255];
    c.shadow = true;
    let raster = TextRasterizer::new(&FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    });
    let mut surface = Surface::new(600, 600).unwrap();
    surface.fill([255, 255, 255, 255]);
    let b = layout_bubble("", panel(), &c);
    draw_bubble(&mut surface, &b, &c, &raster).unwrap();

    let b = layout_bubble("测试测试", panel(), &c);
    draw_bubble(&mut surface, &b, &c, &raster).unwrap();
    let img = surface.to_image().unwrap();
    let center = b.rect.center();
    let p = img.get_pixel(center.x as u32, (b.rect.y0 + 4.0) as u32).0;
    assert_eq!(p, [250, 240, 10, 255]);
}

#[test]
fn bubble_text_is_inked_inside_the_padding() {
    let raster = TextRasterizer::new(&FontConfig::default());
    if raster.face_count() == 0 {
        return;
    }
    let c = BubbleConfig {
        shadow: false,
        ..cfg()
    };
    let mut surface = Surface::new(600, 600).unwrap();
    surface.fill([255, 255, 255, 255]);
    let b = layout_bubble("Hello there", panel(), &c);
    draw_bubble(&mut surface, &b, &c, &raster).unwrap();

    let img = surface.to_image().unwrap();
    let inset = f64::from(c.padding) - 2.0;
    let (x0, x1) = ((b.rect.x0 + inset) as u32, (b.rect.x1 - inset) as u32);
    let (y0, y1) = ((b.rect.y0 + inset) as u32, (b.rect.y1 - inset) as u32);
    let ink = (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| img.get_pixel(x, y).0[0] < 128)
        .count();
    assert!(ink > 50, "bubble text missing");
}
