// ============================================================
// VALUE NORMALIZER
// ============================================================
// Raw cell text -> number, cleaned text, or nothing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::csv::CellValue;

/// Digits with optional thousands commas and an optional decimal part
static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9,]+(\.[0-9]+)?$").unwrap());

/// Normalize one raw cell.
///
/// Blank -> `None`. Quotes are stripped and whitespace trimmed; numeric-looking
/// text becomes a number with commas removed. A failed numeric parse keeps the
/// cleaned text.
pub fn normalize_cell(raw: &str) -> Option<CellValue> {
    let cleaned = raw.trim().replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if NUMERIC_PATTERN.is_match(cleaned) {
        if let Ok(number) = cleaned.replace(',', "").parse::<f64>() {
            return Some(CellValue::Number(number));
        }
    }

    Some(CellValue::Text(cleaned.to_string()))
}
