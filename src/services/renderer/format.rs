use num_format::{Locale, ToFormattedString};

/// Fixed decimals with `,` grouping, e.g. `1234567.891` -> `1,234,567.89`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scale = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * scale).round();
    let whole = (rounded / scale).trunc() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = whole.to_formatted_string(&Locale::en);

    if decimals == 0 {
        return format!("{}{}", sign, grouped);
    }
    let fraction = (rounded - whole as f64 * scale) as u64;
    format!("{}{}.{:0width$}", sign, grouped, fraction, width = decimals)
}

pub fn currency(value: f64) -> String {
    format!("${}", thousands(value, 2))
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn count(value: f64) -> String {
    thousands(value, 0)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
