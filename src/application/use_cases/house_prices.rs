use std::path::Path;

use csv::ReaderBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::housing::HousePricePoint;
use crate::infrastructure::csv::read_decoded;

pub const YEAR_COLUMN: &str = "Year";
pub const MEDIAN_PRICE_COLUMN: &str = "MedianPrice";

/// Read the median house price series. Unlike the startup tables, every
/// problem here is an error for the caller.
pub fn load_house_prices(path: &Path) -> Result<Vec<HousePricePoint>> {
    let content = read_decoded(path)?;
    parse_house_prices(&content)
}

pub fn parse_house_prices(content: &str) -> Result<Vec<HousePricePoint>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| AppError::ParseError(format!("Missing column: {}", name)))
    };
    let year_idx = column(YEAR_COLUMN)?;
    let price_idx = column(MEDIAN_PRICE_COLUMN)?;

    let mut points = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let year = record.get(year_idx).unwrap_or("").trim().to_string();
        let raw_price = record.get(price_idx).unwrap_or("");
        let median_price = parse_price(raw_price).ok_or_else(|| {
            AppError::ParseError(format!(
                "Invalid {} on data row {}: {:?}",
                MEDIAN_PRICE_COLUMN,
                line + 1,
                raw_price
            ))
        })?;
        points.push(HousePricePoint { year, median_price });
    }
    Ok(points)
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '"'))
        .collect();
    cleaned.parse().ok()
}
