use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::pt_br()
    }
}

impl LocaleConfig {
    pub fn pt_br() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            date_format: DateFormatStyle::DayFirst,
        }
    }

    pub fn en_us() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Iso,
        }
    }

    /// Resolves a language tag, falling back to pt-BR for unknown tags.
    pub fn for_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("en-US") {
            Self::en_us()
        } else {
            Self::pt_br()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `31/12/2024`
    DayFirst,
    /// `2024-12-31`
    Iso,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let mut body = format!("{:.*}", precision as usize, value);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    match body.find(locale.decimal_separator) {
        Some(pos) if precision > 0 => {
            let int_part = group_digits(&body[..pos], locale.grouping_separator);
            format!("{}{}", int_part, &body[pos..])
        }
        _ => group_digits(&body, locale.grouping_separator),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    format!("{sign}{grouped}")
}

/// `R$ 1.234,56` style rendering; negatives carry a leading `-`.
pub fn format_currency(value: f64, code: &CurrencyCode, locale: &LocaleConfig, precision: u8) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let body = format_number(locale, value.abs(), precision);
    let rounded_is_zero = body.chars().all(|ch| !ch.is_ascii_digit() || ch == '0');
    let sign = if value < 0.0 && !rounded_is_zero { "-" } else { "" };
    format!("{sign}{} {body}", symbol_for(code.as_str()))
}

/// Brazilian real with cents.
pub fn format_brl(value: f64) -> String {
    let code = CurrencyCode::default();
    format_currency(value, &code, &LocaleConfig::pt_br(), minor_units_for(code.as_str()))
}

/// Brazilian real without cents, used for chart axes and badges.
pub fn format_brl_whole(value: f64) -> String {
    format_currency(value, &CurrencyCode::default(), &LocaleConfig::pt_br(), 0)
}

/// Percentage with one decimal, e.g. `12,5%`.
pub fn format_percent(locale: &LocaleConfig, value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{}%", format_number(locale, value, 1))
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::DayFirst => date.format("%d/%m/%Y").to_string(),
        DateFormatStyle::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_groups_thousands_with_dots() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-89.9), "-R$ 89,90");
    }

    #[test]
    fn tiny_negatives_do_not_render_as_negative_zero() {
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn whole_format_drops_cents() {
        assert_eq!(format_brl_whole(15320.4), "R$ 15.320");
        assert_eq!(format_brl_whole(999.0), "R$ 999");
    }

    #[test]
    fn locale_drives_separators_and_dates() {
        let us = LocaleConfig::for_tag("en-US");
        assert_eq!(format_number(&us, 1234.5, 2), "1,234.50");
        assert_eq!(format_percent(&LocaleConfig::pt_br(), 12.5), "12,5%");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(&LocaleConfig::pt_br(), date), "09/03/2024");
        assert_eq!(format_date(&us, date), "2024-03-09");
    }
}
