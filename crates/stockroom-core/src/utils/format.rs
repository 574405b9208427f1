use chrono::{Datelike, NaiveDate};

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Group the integer part of `value` with `.` thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format a number the way the console shows counts: `1.234.567`.
/// Fractions are rounded away.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let grouped = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format an amount as Indonesian rupiah with no minor units: `Rp 1.500.000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let grouped = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Format a date string as `31 Januari 2024`.
/// Accepts RFC 3339 timestamps and `YYYY-MM-DD`; anything else is returned as-is.
pub fn format_date(date: &str) -> String {
    let parsed = chrono::DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            date.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        });

    match parsed {
        Some(d) => format!("{} {} {}", d.day(), MONTHS_ID[d.month0() as usize], d.year()),
        None => date.to_string(),
    }
}

/// Truncate text to `max_len` characters, appending `...` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

/// Uppercase the first character: `pending` -> `Pending`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
