//! Label measurement for legend and annotation placement.
//!
//! Neither back-end shares font metrics with the scene builder, so widths come
//! from per-glyph advances of a generic sans-serif face, in ems.

const ELLIPSIS: char = '…';

fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '|' | '!' => 0.22,
        ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '-' | '/' => 0.3,
        'm' | 'w' => 0.83,
        'M' | 'W' | '%' => 0.85,
        '0'..='9' | '°' | 'µ' | '³' => 0.56,
        'a'..='z' => 0.52,
        'A'..='Z' => 0.67,
        ELLIPSIS => 1.0,
        _ => 0.6,
    }
}

/// Estimated rendered width of `text` at `size` px.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().map(advance_em).sum::<f64>() * size
}

/// `text` cut to fit `max_width` px, ending in one ellipsis when cut.
/// Empty when not even the first glyph fits next to the ellipsis.
pub fn fit_label(text: &str, size: f64, max_width: f64) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - advance_em(ELLIPSIS) * size;
    let mut used = 0.0;
    let mut out = String::new();
    for ch in text.chars() {
        used += advance_em(ch) * size;
        if used > budget {
            break;
        }
        out.push(ch);
    }
    let kept = out.trim_end();
    if kept.is_empty() {
        return String::new();
    }
    format!("{kept}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_glyphs_measure_narrower() {
        assert!(text_width("Hill", 10.0) < text_width("Terai", 10.0));
        assert!(text_width("2022", 10.0) < text_width("Mountain", 10.0));
        assert_eq!(text_width("", 10.0), 0.0);
    }

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(fit_label("Hill", 10.0, 60.0), "Hill");
        assert_eq!(fit_label("Humidity", 10.0, 110.0), "Humidity");
    }

    #[test]
    fn long_label_gets_one_ellipsis() {
        let t = fit_label("Coarse Particles", 10.0, 60.0);
        assert!(t.ends_with(ELLIPSIS));
        assert_eq!(t.matches(ELLIPSIS).count(), 1);
        assert!(text_width(&t, 10.0) <= 60.0);
        // no dangling space before the ellipsis
        assert!(!t.contains(" …"));
    }

    #[test]
    fn nothing_fits() {
        assert_eq!(fit_label("Mountain", 10.0, 5.0), "");
    }
}
