//! Headline housing statistics derived from the loaded tables.
//!
//! Each statistic starts at its published fallback. Steps run in order
//! (rent increase, construction rank, down payment ratio); missing inputs keep
//! the fallback for that step only, while a hard failure stops the remaining
//! steps and keeps whatever was computed before it.

use tracing::{info, warn};

use crate::domain::csv::{CellValue, Row, Table};
use crate::domain::error::{AppError, Result};
use crate::domain::housing::{HousingStats, RentPoint};

/// Comparison table columns
pub const CITY_COLUMN: &str = "City";
pub const CONSTRUCTION_METRIC_COLUMN: &str = "Completions_per_1000";
pub const MEDIAN_PRICE_COLUMN: &str = "Median_Home_Price";
pub const MEDIAN_INCOME_COLUMN: &str = "Median_Household_Income";

/// Rent growth is measured from this survey year
pub const BASELINE_YEAR: &str = "2010";

pub const DOWN_PAYMENT_SHARE: f64 = 0.2;

pub fn compute_housing_stats(rent: &[RentPoint], comparison: &Table, subject: &str) -> HousingStats {
    let mut stats = HousingStats::default();
    match fill_stats(&mut stats, rent, comparison, subject) {
        Ok(()) => info!(
            rent_increase = stats.rent_increase,
            construction_rank = stats.construction_rank,
            downpayment_ratio = stats.downpayment_ratio,
            "Housing stats computed"
        ),
        Err(err) => warn!(error = %err, ?stats, "Housing stats incomplete, remaining values use defaults"),
    }
    stats
}

fn fill_stats(
    stats: &mut HousingStats,
    rent: &[RentPoint],
    comparison: &Table,
    subject: &str,
) -> Result<()> {
    if let Some(increase) = rent_increase(rent)? {
        stats.rent_increase = increase;
    }
    if let Some(rank) = construction_rank(comparison, subject)? {
        stats.construction_rank = rank;
    }
    if let Some(ratio) = downpayment_ratio(comparison, subject)? {
        stats.downpayment_ratio = ratio;
    }
    Ok(())
}

/// Percent change from the 2010 rent to the latest rent.
///
/// `None` unless there are two or more points and the earliest is 2010.
pub fn rent_increase(points: &[RentPoint]) -> Result<Option<i64>> {
    if points.len() < 2 {
        return Ok(None);
    }
    let mut sorted: Vec<&RentPoint> = points.iter().collect();
    sorted.sort_by(|a, b| a.year.cmp(&b.year));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Ok(None);
    };
    if first.year != BASELINE_YEAR {
        return Ok(None);
    }

    let baseline = first.rent_2_bedroom;
    if baseline == 0.0 {
        return Err(AppError::Internal(format!("{} baseline rent is zero", BASELINE_YEAR)));
    }
    let increase = (last.rent_2_bedroom - baseline) / baseline * 100.0;
    Ok(Some(increase.round_ties_even() as i64))
}

/// 1-based position of `subject` when cities are ordered by completions per
/// 1,000 residents, fewest first.
pub fn construction_rank(comparison: &Table, subject: &str) -> Result<Option<i64>> {
    let mut ranked: Vec<(&str, f64)> = Vec::new();
    for row in comparison {
        let (Some(city), Some(metric)) = (row.text(CITY_COLUMN), row.get(CONSTRUCTION_METRIC_COLUMN))
        else {
            continue;
        };
        match metric {
            CellValue::Number(value) => ranked.push((city, *value)),
            CellValue::Text(raw) => {
                return Err(AppError::ParseError(format!(
                    "{} for {} is not numeric: {}",
                    CONSTRUCTION_METRIC_COLUMN, city, raw
                )))
            }
        }
    }

    // Stable: ties keep table order
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(ranked
        .iter()
        .position(|(city, _)| *city == subject)
        .map(|index| index as i64 + 1))
}

/// Years of median household income needed to save a 20% down payment on
/// the median home.
pub fn downpayment_ratio(comparison: &Table, subject: &str) -> Result<Option<i64>> {
    let Some(row) = find_city(comparison, subject) else {
        return Ok(None);
    };
    let (Some(price), Some(income)) = (row.number(MEDIAN_PRICE_COLUMN), row.number(MEDIAN_INCOME_COLUMN))
    else {
        return Ok(None);
    };
    if income == 0.0 {
        return Err(AppError::Internal(format!("{} for {} is zero", MEDIAN_INCOME_COLUMN, subject)));
    }
    Ok(Some((price * DOWN_PAYMENT_SHARE / income).round_ties_even() as i64))
}

/// First row whose city column equals `city`
pub fn find_city<'a>(table: &'a Table, city: &str) -> Option<&'a Row> {
    table.iter().find(|row| row.text(CITY_COLUMN) == Some(city))
}
