//! Money formatting utilities for the text sent to the insight service.
//!
//! Format: sign + currency symbol + number with grouping separators

/// Format an amount (in major units) as plain text with locale-aware separators.
/// Negative amounts get a leading `-`; the value is rounded to two decimals.
pub fn format_amount(amount: f64, currency: &str, locale: &str) -> String {
    let cents = if amount.is_finite() {
        (amount * 100.0).round() as i64
    } else {
        0
    };
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let fractional = abs_cents % 100;

    let (group_sep, decimal_sep) = locale_separators(locale);
    let whole_str = if locale == "en-IN" || locale == "hi-IN" {
        format_with_lakh_grouping(whole, group_sep)
    } else {
        format_with_thousands(whole, group_sep)
    };
    let symbol = currency_symbol(currency);

    format!(
        "{}{}{}{}{:02}",
        if is_negative { "-" } else { "" },
        symbol,
        whole_str,
        decimal_sep,
        fractional
    )
}

/// Format a percentage with one decimal place, e.g. `80.5%` or `80,5%`.
pub fn format_percent(value: f64, locale: &str) -> String {
    let (_, decimal_sep) = locale_separators(locale);
    let tenths = if value.is_finite() {
        (value * 10.0).round() as i64
    } else {
        0
    };
    let sign = if tenths < 0 { "-" } else { "" };
    let abs_tenths = tenths.abs();

    format!("{}{}{}{}%", sign, abs_tenths / 10, decimal_sep, abs_tenths % 10)
}

/// Get grouping and decimal separators based on locale.
fn locale_separators(locale: &str) -> (char, char) {
    match locale {
        "de-DE" | "de-AT" | "de-CH" | "fr-FR" | "fr-BE" | "fr-CA" | "es-ES" | "es-AR" | "it-IT"
        | "pt-BR" | "pt-PT" | "nl-NL" | "nl-BE" | "pl-PL" | "ru-RU" | "tr-TR" | "vi-VN"
        | "id-ID" | "da-DK" | "nb-NO" | "sv-SE" | "fi-FI" | "cs-CZ" | "sk-SK" | "hu-HU"
        | "ro-RO" | "bg-BG" | "uk-UA" | "el-GR" => ('.', ','),
        _ => (',', '.'),
    }
}

/// Format a number with thousands separators.
fn format_with_thousands(n: i64, sep: char) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}

/// Indian grouping: the last three digits, then groups of two (12,34,567).
fn format_with_lakh_grouping(n: i64, sep: char) -> String {
    let s = n.to_string();
    if s.len() <= 3 {
        return s;
    }

    let (head, tail) = s.split_at(s.len() - 3);
    let head_chars: Vec<char> = head.chars().rev().collect();
    let mut grouped = Vec::new();

    for (i, c) in head_chars.iter().enumerate() {
        if i > 0 && i % 2 == 0 {
            grouped.push(sep);
        }
        grouped.push(*c);
    }

    let head: String = grouped.iter().rev().collect();
    format!("{}{}{}", head, sep, tail)
}

/// Get currency symbol for a currency code.
pub fn currency_symbol(currency: &str) -> &'static str {
    match currency.to_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "\u{20ac}",
        "GBP" => "\u{00a3}",
        "JPY" => "\u{00a5}",
        "CNY" => "\u{00a5}",
        "CAD" => "C$",
        "AUD" => "A$",
        "CHF" => "CHF\u{00a0}",
        "INR" => "\u{20b9}",
        "BRL" => "R$",
        "MXN" => "MX$",
        "KRW" => "\u{20a9}",
        "SEK" => "kr\u{00a0}",
        "NOK" => "kr\u{00a0}",
        "DKK" => "kr\u{00a0}",
        "SGD" => "S$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        _ => "\u{20b9}",
    }
}
