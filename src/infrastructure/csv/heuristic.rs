// ============================================================
// HEURISTIC TABLE EXTRACTORS
// ============================================================
// Rent and vacancy tables exported from the rental market survey do not
// start at line one and mix footnotes into the data. These extractors find
// the header row by its bedroom-type columns and pull a single number from
// each data row.
//
// The constants below are pinned to the known export layouts. Changing any of
// them changes which numbers are extracted without any other error.

use std::ops::RangeInclusive;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::encoding::read_decoded;
use super::normalize::normalize_cell;
use crate::domain::housing::{RentPoint, VacancyPoint};

/// All three must appear (case-sensitive) on the header line
pub const HEADER_MARKERS: [&str; 3] = ["Bachelor", "1 Bedroom", "2 Bedroom"];

/// Lines containing any of these are footnotes, not data
pub const FOOTER_MARKERS: [&str; 2] = ["Source", "Notes"];

/// 0-based field holding the 2-bedroom average rent in the rent export
pub const RENT_2BR_COLUMN: usize = 5;

/// Rent rows shorter than this cannot hold the 2-bedroom column
pub const MIN_RENT_FIELDS: usize = RENT_2BR_COLUMN + 1;

/// Vacancy rates are percentages; anything outside is a count or a rent
pub const VACANCY_RANGE: RangeInclusive<f64> = 0.0..=10.0;

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Extract 2-bedroom rents from a rent export. Any failure yields an empty table.
pub fn load_rent_points(path: &Path) -> Vec<RentPoint> {
    match read_decoded(path) {
        Ok(content) => rent_points_from_str(&content),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to read rent data");
            Vec::new()
        }
    }
}

/// Extract vacancy rates from a vacancy export. Any failure yields an empty table.
pub fn load_vacancy_points(path: &Path) -> Vec<VacancyPoint> {
    match read_decoded(path) {
        Ok(content) => vacancy_points_from_str(&content),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to read vacancy data");
            Vec::new()
        }
    }
}

pub fn rent_points_from_str(content: &str) -> Vec<RentPoint> {
    data_rows(content, "rent")
        .filter_map(|(year, fields)| {
            if fields.len() < MIN_RENT_FIELDS {
                return None;
            }
            let rent = normalize_cell(fields[RENT_2BR_COLUMN])?.as_f64()?;
            Some(RentPoint { year, rent_2_bedroom: rent })
        })
        .collect()
}

pub fn vacancy_points_from_str(content: &str) -> Vec<VacancyPoint> {
    data_rows(content, "vacancy")
        .filter_map(|(year, fields)| {
            let rate = fields[1..]
                .iter()
                .filter_map(|raw| normalize_cell(raw).and_then(|value| value.as_f64()))
                .find(|rate| VACANCY_RANGE.contains(rate))?;
            Some(VacancyPoint { year, vacancy_rate: rate })
        })
        .collect()
}

fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|marker| line.contains(marker))
}

fn is_footer_line(line: &str) -> bool {
    FOOTER_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Lines after the header that look like data: `(year, comma-split fields)`.
///
/// Every yielded row has at least two fields.
fn data_rows<'a>(
    content: &'a str,
    kind: &'static str,
) -> impl Iterator<Item = (String, Vec<&'a str>)> + 'a {
    let mut lines = content.lines();
    let header_found = lines.by_ref().any(is_header_line);
    if !header_found {
        warn!(kind, "No header row with bedroom columns found");
    }

    lines
        .filter(move |_| header_found)
        .filter(|line| !line.trim().is_empty() && !is_footer_line(line))
        .filter_map(move |line| {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 2 {
                return None;
            }
            match YEAR_PATTERN.find(fields[0]) {
                Some(year) => Some((year.as_str().to_string(), fields)),
                None => {
                    debug!(kind, line, "Skipping row without a year");
                    None
                }
            }
        })
}
