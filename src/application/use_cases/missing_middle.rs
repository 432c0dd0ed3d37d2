use once_cell::sync::Lazy;
use regex::Regex;

use super::housing_stats::{find_city, CITY_COLUMN, CONSTRUCTION_METRIC_COLUMN};
use crate::domain::csv::{CellValue, Row, Table};
use crate::domain::error::{AppError, Result};
use crate::domain::housing::MissingMiddleImpact;

/// Zoning table columns
pub const TOTAL_DWELLINGS_COLUMN: &str = "Total_Dwellings";
pub const SINGLE_DETACHED_PCT_COLUMN: &str = "Single_Detached_Pct";
pub const MISSING_MIDDLE_PCT_COLUMN: &str = "Missing_Middle_Pct";

/// Population table columns
pub const YEAR_COLUMN: &str = "Year";
pub const POPULATION_COLUMN: &str = "Population";

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Compare `subject` against its peers in the zoning table.
///
/// Fails with `NotFound` when the zoning table has no row for `subject`;
/// every other missing input shows up as `None` in the result.
pub fn missing_middle_impact(
    zoning: &Table,
    comparison: &Table,
    population: &Table,
    subject: &str,
) -> Result<MissingMiddleImpact> {
    let zoning_row = find_city(zoning, subject)
        .ok_or_else(|| AppError::NotFound(format!("No zoning data found for {}", subject)))?;

    let total_dwellings = zoning_row.number(TOTAL_DWELLINGS_COLUMN);
    let missing_middle_pct = zoning_row.number(MISSING_MIDDLE_PCT_COLUMN);
    let peer_average = peer_average_missing_middle(zoning, subject);

    let additional_units = match (total_dwellings, missing_middle_pct, peer_average) {
        (Some(total), Some(current), Some(peer)) => {
            Some(((total * (peer - current) / 100.0).round_ties_even() as i64).max(0))
        }
        _ => None,
    };

    let latest = latest_population(population);

    Ok(MissingMiddleImpact {
        municipality: subject.to_string(),
        total_dwellings,
        single_detached_pct: zoning_row.number(SINGLE_DETACHED_PCT_COLUMN),
        missing_middle_pct,
        peer_average_missing_middle_pct: peer_average,
        additional_units_at_peer_average: additional_units,
        completions_per_1000: find_city(comparison, subject)
            .and_then(|row| row.number(CONSTRUCTION_METRIC_COLUMN)),
        latest_population: latest.and_then(|(_, row)| row.number(POPULATION_COLUMN)),
        population_year: latest.and_then(|(_, row)| row.get(YEAR_COLUMN)).map(year_label),
    })
}

fn peer_average_missing_middle(zoning: &Table, subject: &str) -> Option<f64> {
    let peers: Vec<f64> = zoning
        .iter()
        .filter(|row| row.text(CITY_COLUMN).is_some_and(|city| city != subject))
        .filter_map(|row| row.number(MISSING_MIDDLE_PCT_COLUMN))
        .collect();
    if peers.is_empty() {
        return None;
    }
    Some(peers.iter().sum::<f64>() / peers.len() as f64)
}

/// Latest-year row that has a numeric population
fn latest_population(population: &Table) -> Option<(f64, &Row)> {
    population
        .iter()
        .filter(|row| row.number(POPULATION_COLUMN).is_some())
        .filter_map(|row| row.get(YEAR_COLUMN).and_then(year_key).map(|year| (year, row)))
        .fold(None, |latest: Option<(f64, &Row)>, candidate| match latest {
            Some(current) if current.0 >= candidate.0 => Some(current),
            _ => Some(candidate),
        })
}

fn year_key(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(year) => Some(*year),
        CellValue::Text(text) => YEAR_PATTERN.find(text)?.as_str().parse().ok(),
    }
}

fn year_label(value: &CellValue) -> String {
    match value {
        CellValue::Number(year) => year.to_string(),
        CellValue::Text(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> Row {
        let mut row = Row::new();
        for (column, value) in cells {
            row.insert(*column, value.clone());
        }
        row
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn num(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn zoning() -> Table {
        vec![
            row(&[
                (CITY_COLUMN, text("Burlington")),
                (TOTAL_DWELLINGS_COLUMN, num(70_000.0)),
                (SINGLE_DETACHED_PCT_COLUMN, num(78.0)),
                (MISSING_MIDDLE_PCT_COLUMN, num(7.0)),
            ]),
            row(&[(CITY_COLUMN, text("Oakville")), (MISSING_MIDDLE_PCT_COLUMN, num(12.0))]),
            row(&[(CITY_COLUMN, text("Waterloo")), (MISSING_MIDDLE_PCT_COLUMN, num(18.0))]),
            row(&[(CITY_COLUMN, text("Guelph")), (MISSING_MIDDLE_PCT_COLUMN, text("n/a"))]),
        ]
    }

    #[test]
    fn test_impact_for_subject() {
        let comparison = vec![row(&[(CITY_COLUMN, text("Burlington")), (CONSTRUCTION_METRIC_COLUMN, num(0.8))])];
        let population = vec![
            row(&[(YEAR_COLUMN, num(2016.0)), (POPULATION_COLUMN, num(183_314.0))]),
            row(&[(YEAR_COLUMN, num(2021.0)), (POPULATION_COLUMN, num(186_948.0))]),
            row(&[(YEAR_COLUMN, num(2026.0))]),
        ];

        let impact = missing_middle_impact(&zoning(), &comparison, &population, "Burlington").unwrap();

        assert_eq!(impact.municipality, "Burlington");
        assert_eq!(impact.single_detached_pct, Some(78.0));
        assert_eq!(impact.peer_average_missing_middle_pct, Some(15.0));
        // 70,000 * (15 - 7) / 100
        assert_eq!(impact.additional_units_at_peer_average, Some(5600));
        assert_eq!(impact.completions_per_1000, Some(0.8));
        assert_eq!(impact.latest_population, Some(186_948.0));
        assert_eq!(impact.population_year.as_deref(), Some("2021"));
    }

    #[test]
    fn test_missing_zoning_row_is_not_found() {
        let err = missing_middle_impact(&zoning(), &Table::new(), &Table::new(), "Milton").unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "No zoning data found for Milton"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sparse_inputs_become_none() {
        let impact = missing_middle_impact(&zoning(), &Table::new(), &Table::new(), "Oakville").unwrap();
        assert_eq!(impact.total_dwellings, None);
        assert_eq!(impact.additional_units_at_peer_average, None);
        // Burlington and Waterloo
        assert_eq!(impact.peer_average_missing_middle_pct, Some(12.5));
        assert_eq!(impact.latest_population, None);
        assert_eq!(impact.population_year, None);
    }

    #[test]
    fn test_additional_units_never_negative() {
        let table = vec![
            row(&[
                (CITY_COLUMN, text("Waterloo")),
                (TOTAL_DWELLINGS_COLUMN, num(50_000.0)),
                (MISSING_MIDDLE_PCT_COLUMN, num(18.0)),
            ]),
            row(&[(CITY_COLUMN, text("Burlington")), (MISSING_MIDDLE_PCT_COLUMN, num(7.0))]),
        ];
        let impact = missing_middle_impact(&table, &Table::new(), &Table::new(), "Waterloo").unwrap();
        assert_eq!(impact.additional_units_at_peer_average, Some(0));
    }

    #[test]
    fn test_text_years_are_ordered_by_their_digits() {
        let population = vec![
            row(&[(YEAR_COLUMN, text("Census 2021")), (POPULATION_COLUMN, num(2.0))]),
            row(&[(YEAR_COLUMN, text("Census 2016")), (POPULATION_COLUMN, num(1.0))]),
        ];
        let (year, latest) = latest_population(&population).unwrap();
        assert_eq!(year, 2021.0);
        assert_eq!(latest.number(POPULATION_COLUMN), Some(2.0));
    }
}
