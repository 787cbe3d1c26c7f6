use super::*;
use crate::text::measure::measure;

#[test]
fn empty_text_has_no_lines_and_zero_height() {
    let w = wrap("", 100.0, FontSpec::new(20.0));
    assert!(w.is_empty());
    assert_eq!(w.height, 0.0);
    assert_eq!(w.height_px(), 0);
}

#[test]
fn short_text_stays_on_one_line() {
    let w = wrap("测试文本一", 400.0, FontSpec::new(20.0));
    assert_eq!(w.lines, vec!["测试文本一".to_string()]);
}

#[test]
fn cjk_breaks_exactly_at_capacity() {
    let f = FontSpec::new(20.0);
    let w = wrap("一二三四五六七", 60.0, f);
    assert_eq!(w.lines, vec!["一二三", "四五六", "七"]);
}

#[test]
fn whitespace_is_not_a_break_opportunity() {
    let f = FontSpec::new(10.0);
    let w = wrap("hello world", 30.0, f);
    assert_eq!(w.lines, vec!["hello ", "world"]);
    let w = wrap("ab cd", 10.0, f);
    assert_eq!(w.lines, vec!["ab", " c", "d"]);
}

#[test]
fn oversized_character_occupies_its_own_line() {
    let f = FontSpec::new(40.0);
    let w = wrap("a测b", 25.0, f);
    assert_eq!(w.lines, vec!["a", "测", "b"]);
}

#[test]
fn lines_fit_and_concatenate_back_to_input() {
    let f = FontSpec::new(17.0);
    let inputs = [
        "The quick brown fox jumps over the lazy dog, twice.",
        "混合 mixed 文本 with ASCII 和中文标点，以及更多的字符。",
        "🙂🙂🙂 emoji run 🙂",
        "line\nbreak stays inside",
    ];
    for text in inputs {
        for max in [20.0f32, 55.5, 120.0, 333.0] {
            let w = wrap(text, max, f);
            assert_eq!(w.lines.concat(), text);
            for line in &w.lines {
                assert!(
                    measure(line, f) <= max || line.chars().count() == 1,
                    "line {line:?} exceeds {max}"
                );
            }
            assert!((w.height - w.lines.len() as f32 * f.line_height()).abs() < 1e-3);
        }
    }
}

#[test]
fn two_hundred_cjk_characters_in_400px_panel() {
    let f = FontSpec::new(20.0);
    let text: String = "测".repeat(200);
    let w = wrap(&text, 400.0, f);
    assert_eq!(w.lines.len(), 10);
    for line in &w.lines {
        assert!(measure(line, f) <= 400.0);
    }
    assert!((w.height - 10.0 * f.line_height()).abs() < 1e-3);
}

#[test]
fn max_line_width_reports_widest_line() {
    let f = FontSpec::new(10.0);
    let w = wrap("一二三四五", 30.0, f);
    assert_eq!(w.max_line_width(f), 30.0);
}
