use super::*;

#[test]
fn cjk_is_full_em_and_latin_is_half_em() {
    let f = FontSpec::new(20.0);
    assert_eq!(char_width('测', f), 20.0);
    assert_eq!(char_width('。', f), 20.0);
    assert_eq!(char_width('Ａ', f), 20.0);
    assert_eq!(char_width('한', f), 20.0);
    assert_eq!(char_width('a', f), 10.0);
    assert_eq!(char_width(' ', f), 10.0);
}

#[test]
fn control_characters_have_no_width() {
    let f = FontSpec::new(20.0);
    assert_eq!(char_width('\n', f), 0.0);
    assert_eq!(char_width('\t', f), 0.0);
}

#[test]
fn measure_sums_characters() {
    let f = FontSpec::new(10.0);
    assert_eq!(measure("", f), 0.0);
    assert_eq!(measure("ab测试", f), 5.0 + 5.0 + 10.0 + 10.0);
}

#[test]
fn bold_does_not_change_measurement() {
    let f = FontSpec::new(16.0);
    assert_eq!(measure("hello 世界", f), measure("hello 世界", f.bold()));
}

#[test]
fn line_height_is_one_point_four_em() {
    assert!((FontSpec::new(20.0).line_height() - 28.0).abs() < 1e-4);
}
