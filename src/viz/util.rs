//! Locale mapping and number formatting for axis ticks and tooltips.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Decimal places needed to tell ticks `step` apart.
pub fn tick_precision(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) || step >= 1.0 {
        0
    } else {
        (-step.log10().floor()).max(0.0) as usize
    }
}

/// Format a tick with locale grouping for the integer part, e.g. `1,250.5` or `1.250,5`.
pub fn format_tick(value: f64, precision: usize, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

/// Shortest round-trip form of a data value, as shown in tooltips (`154`, `14.2`).
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_follows_step() {
        assert_eq!(tick_precision(50.0), 0);
        assert_eq!(tick_precision(1.0), 0);
        assert_eq!(tick_precision(0.2), 1);
        assert_eq!(tick_precision(0.05), 2);
    }

    #[test]
    fn locale_grouping_and_separator() {
        assert_eq!(format_tick(12500.0, 0, "en"), "12,500");
        assert_eq!(format_tick(12500.5, 1, "de"), "12.500,5");
        assert_eq!(format_tick(-0.0, 0, "en"), "0");
        assert_eq!(format_tick(-20.0, 0, "en"), "-20");
    }

    #[test]
    fn values_print_like_data() {
        assert_eq!(format_value(154.0), "154");
        assert_eq!(format_value(14.2), "14.2");
    }
}
