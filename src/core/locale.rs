//! Language-dependent presentation helpers.
//!
//! Report cards are printed either in English or in Marathi. Marathi output
//! uses Devanagari digits and Marathi month names.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fmt;

/// Language used for descriptive text on generated documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English text, ASCII digits
    English,
    /// Marathi text, Devanagari digits
    #[default]
    Marathi,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("english"),
            Self::Marathi => f.write_str("marathi"),
        }
    }
}

const DEVANAGARI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

const MARATHI_MONTHS: [&str; 12] = [
    "जानेवारी",
    "फेब्रुवारी",
    "मार्च",
    "एप्रिल",
    "मे",
    "जून",
    "जुलै",
    "ऑगस्ट",
    "सप्टेंबर",
    "ऑक्टोबर",
    "नोव्हेंबर",
    "डिसेंबर",
];

/// Replaces every ASCII digit in `text` with its Devanagari counterpart.
/// Any other character (decimal point, minus sign, `%`) is kept.
#[must_use]
pub fn to_devanagari_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            c.to_digit(10)
                .map_or(c, |d| DEVANAGARI_DIGITS[d as usize])
        })
        .collect()
}

/// Formats a date as `"<day> <month> <year>"` with a Marathi month name,
/// e.g. `15 मार्च 2024`.
#[must_use]
pub fn format_date_marathi(date: NaiveDate) -> String {
    let month = MARATHI_MONTHS[date.month0() as usize];
    format!("{} {month} {}", date.day(), date.year())
}

/// Formats a number for the given locale. Whole numbers print without a
/// fractional part, everything else with at most two decimals.
#[must_use]
pub fn format_number(value: f64, locale: Locale) -> String {
    let plain = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let fixed = format!("{value:.2}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };
    match locale {
        Locale::English => plain,
        Locale::Marathi => to_devanagari_digits(&plain),
    }
}

/// Formats a date for the given locale.
#[must_use]
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::English => date.format("%-d %B %Y").to_string(),
        Locale::Marathi => format_date_marathi(date),
    }
}
