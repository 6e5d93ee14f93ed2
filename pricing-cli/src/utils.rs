//! Formatting helpers shared by the renderer and the exporters.
//!
//! All rounding to display precision happens here, at the boundary; the
//! engine's figures stay exact.

/// Formats with a fixed number of fraction digits, then strips trailing
/// zeros (and a dangling decimal point): `15.0` → `"15"`, `12.50` → `"12.5"`.
pub fn format_trimmed(value: f64, fraction_digits: usize) -> String {
    let fixed = format!("{value:.fraction_digits$}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Currency rounded to whole units, e.g. `€282`.
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol}{}", value.round() as i64)
}

/// Currency with two fraction digits, e.g. `€281.49`.
pub fn format_currency_detailed(symbol: &str, value: f64) -> String {
    format!("{symbol}{value:.2}")
}

/// Currency with two fraction digits, or a dash for an absent figure.
pub fn format_currency_or_dash(symbol: &str, value: Option<f64>) -> String {
    match value {
        Some(value) => format_currency_detailed(symbol, value),
        None => "—".to_string(),
    }
}

/// Escapes text for interpolation into HTML.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
