// 💱 Display Formatting - money, dates and table cells

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a value as Brazilian reais: `R$ 1234,56`.
///
/// Two decimals, comma as decimal separator, no thousands grouping.
pub fn format_currency(value: f64) -> String {
    format!("R$ {:.2}", value).replace('.', ",")
}

/// Render an ISO date or timestamp as `dd/mm/yyyy`.
///
/// Accepts RFC 3339 timestamps (the date is taken in the timestamp's own
/// offset), naive `YYYY-MM-DDTHH:MM:SS` timestamps and plain `YYYY-MM-DD`.
/// Anything else is returned unchanged.
pub fn format_date(iso: &str) -> String {
    let trimmed = iso.trim();

    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Cut `s` to `max_len` characters, ending with `...` when shortened
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Mask a secret for display, one bullet per character
pub fn mask_secret(s: &str) -> String {
    "•".repeat(s.chars().count())
}
