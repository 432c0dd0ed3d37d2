// ============================================================
// DATASETS
// ============================================================
// Every table the API serves, loaded once at startup and read-only after

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use super::housing_stats::compute_housing_stats;
use super::missing_middle::missing_middle_impact;
use crate::domain::csv::Table;
use crate::domain::error::Result;
use crate::domain::housing::{HousingStats, MissingMiddleImpact, RentPoint, VacancyPoint};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::{load_rent_points, load_vacancy_points, CsvParser};

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub subject_municipality: String,
    pub income: Table,
    pub comparison: Table,
    pub rent: Vec<RentPoint>,
    pub vacancy: Vec<VacancyPoint>,
    pub population: Table,
    pub zoning: Table,
    pub completions: Table,
    pub stats: HousingStats,
    /// Read on every request rather than at startup
    pub housing_prices_path: PathBuf,
}

impl Datasets {
    /// Load every table named in `config` and compute the headline stats.
    ///
    /// Missing or broken files produce empty tables; this never fails.
    pub fn load(config: &AppConfig) -> Self {
        let files = &config.files;
        let parser = CsvParser::new();

        let mut datasets = Self {
            subject_municipality: config.subject_municipality.clone(),
            income: parser.load_table(&config.data_path(&files.income)),
            comparison: parser.load_table(&config.data_path(&files.comparison)),
            rent: load_rent_points(&config.data_path(&files.rent)),
            vacancy: load_vacancy_points(&config.data_path(&files.vacancy)),
            population: parser.load_table(&config.data_path(&files.population)),
            zoning: parser.load_table(&config.data_path(&files.zoning)),
            completions: parser.load_table(&config.data_path(&files.completions)),
            stats: HousingStats::default(),
            housing_prices_path: config.data_path(&files.housing_prices),
        };
        datasets.stats = compute_housing_stats(
            &datasets.rent,
            &datasets.comparison,
            &datasets.subject_municipality,
        );

        for (name, rows) in datasets.row_counts() {
            info!(table = name, rows, "Loaded table");
        }
        datasets
    }

    pub fn row_counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("income", self.income.len()),
            ("comparison", self.comparison.len()),
            ("rent", self.rent.len()),
            ("vacancy", self.vacancy.len()),
            ("population", self.population.len()),
            ("zoning", self.zoning.len()),
            ("completions", self.completions.len()),
        ])
    }

    pub fn missing_middle_impact(&self) -> Result<MissingMiddleImpact> {
        missing_middle_impact(
            &self.zoning,
            &self.comparison,
            &self.population,
            &self.subject_municipality,
        )
    }
}
