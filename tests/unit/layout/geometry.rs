use super::*;

#[test]
fn fixed_ratio_table() {
    assert_eq!(panel_height(400, AspectRatioPolicy::Square, None), 400);
    assert_eq!(panel_height(400, AspectRatioPolicy::Landscape4x3, None), 300);
    assert_eq!(panel_height(400, AspectRatioPolicy::Widescreen16x9, None), 225);
    assert_eq!(panel_height(300, AspectRatioPolicy::Portrait3x4, None), 400);
    assert_eq!(panel_height(900, AspectRatioPolicy::Tall9x16, None), 1600);
}

#[test]
fn fixed_ratios_ignore_native_ratio() {
    assert_eq!(
        panel_height(400, AspectRatioPolicy::Square, Some(2.0)),
        panel_height(400, AspectRatioPolicy::Square, None)
    );
}

#[test]
fn auto_uses_native_ratio_or_four_three_fallback() {
    assert_eq!(panel_height(1080, AspectRatioPolicy::Auto, Some(16.0 / 9.0)), 608);
    assert_eq!(panel_height(1080, AspectRatioPolicy::Auto, Some(0.5)), 2160);
    assert_eq!(panel_height(1080, AspectRatioPolicy::Auto, None), 810);
    assert_eq!(panel_height(1080, AspectRatioPolicy::Auto, Some(0.0)), 810);
    assert_eq!(panel_height(1080, AspectRatioPolicy::Auto, Some(f64::NAN)), 810);
}

#[test]
fn height_is_never_zero() {
    assert_eq!(panel_height(0, AspectRatioPolicy::Square, None), 1);
    assert_eq!(panel_height(1, AspectRatioPolicy::Auto, Some(1000.0)), 1);
}
