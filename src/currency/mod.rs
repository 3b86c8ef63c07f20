//! Currency precision and presentation helpers.
//!
//! Calculations run on unrounded `f64` values; rounding to minor units only
//! happens when a report leaves the engine.

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

    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl LocaleConfig {
    pub fn pt_br() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "CLP" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u8) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    // normalise -0.0 so serialized output stays stable
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds to the two-decimal precision used for base-currency amounts.
pub fn round_currency(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part.to_string(), Some(frac.to_string())),
        None => (body, None),
    };
    let mut rendered = group_digits(&int_part, locale.grouping_separator);
    if let Some(frac) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(&frac);
    }
    if value < 0.0 && round_to(value, precision) != 0.0 {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    negative_style: NegativeStyle,
) -> String {
    let precision = code.minor_units();
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    if round_to(amount, precision) < 0.0 {
        match negative_style {
            NegativeStyle::Sign => format!("-{symbol} {body}"),
            NegativeStyle::Parentheses => format!("({symbol} {body})"),
        }
    } else {
        format!("{symbol} {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_currency(10.125), 10.13);
        assert_eq!(round_currency(-10.125), -10.13);
        assert_eq!(round_currency(-0.001), 0.0);
        assert_eq!(round_to(1234.5678, 0), 1235.0);
    }

    #[test]
    fn formats_brazilian_currency() {
        let locale = LocaleConfig::pt_br();
        let code = CurrencyCode::default();
        assert_eq!(
            format_currency_value(1234567.891, &code, &locale, NegativeStyle::Sign),
            "R$ 1.234.567,89"
        );
        assert_eq!(
            format_currency_value(-50.0, &code, &locale, NegativeStyle::Parentheses),
            "(R$ 50,00)"
        );
    }

    #[test]
    fn formats_plain_numbers() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, 1000.0, 2), "1,000.00");
        assert_eq!(format_number(&locale, -12.5, 1), "-12.5");
        assert_eq!(format_number(&locale, 999.0, 0), "999");
    }
}
