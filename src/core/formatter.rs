use crate::core::trend::TrendDirection;

/// Returns "$123.45".
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Returns "42.5%".
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Returns the percentage, or a neutral placeholder when the value is absent.
pub fn format_optional_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format_percent(v),
        None => "N/A".to_string(),
    }
}

pub fn format_optional_money(amount: Option<f64>) -> String {
    match amount {
        Some(a) => format_money(a),
        None => "N/A".to_string(),
    }
}

/// Returns "+2.5" / "-3.5", one decimal place.
pub fn format_signed(delta: f64) -> String {
    format!("{:+.1}", delta)
}

/// Coverage quality label. Thresholds: 90 / 70 / 50.
pub fn coverage_status(percent: f64) -> &'static str {
    if percent >= 90.0 {
        "Excellent"
    } else if percent >= 70.0 {
        "Good"
    } else if percent >= 50.0 {
        "Fair"
    } else {
        "Poor"
    }
}

/// Console glyph for a trend step.
pub fn direction_glyph(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "↗",
        TrendDirection::Down => "↘",
        TrendDirection::Flat => "→",
        TrendDirection::Unknown => "?",
    }
}

/// Word form for surfaces that cannot render the glyphs (PDF builtin fonts).
pub fn direction_word(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "Up",
        TrendDirection::Down => "Down",
        TrendDirection::Flat => "Flat",
        TrendDirection::Unknown => "n/a",
    }
}
