use super::*;

#[test]
fn canvas_size_rejects_zero_dimensions() {
    assert!(CanvasSize::new(0, 10).is_err());
    assert!(CanvasSize::new(10, 0).is_err());
    assert_eq!(
        CanvasSize::new(3, 4).unwrap(),
        CanvasSize {
            width: 3,
            height: 4
        }
    );
}

#[test]
fn pixel_rect_edges_and_float_conversion() {
    let r = PixelRect::new(10, 20, 30, 40);
    assert_eq!(r.right(), 40);
    assert_eq!(r.bottom(), 60);
    assert_eq!(r.to_rect(), Rect::new(10.0, 20.0, 40.0, 60.0));
}

#[test]
fn premul_scales_color_by_alpha() {
    assert_eq!(premul([255, 255, 255, 255]), [255, 255, 255, 255]);
    assert_eq!(premul([255, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(premul([200, 100, 50, 128]), [100, 50, 25, 128]);
}

#[test]
fn hex_rgb_drops_alpha() {
    assert_eq!(hex_rgb([255, 16, 0, 12]), "#ff1000");
}
