use serde::{Deserialize, Serialize};

/// Average 2-bedroom rent for one survey year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPoint {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Rent_2Bedroom")]
    pub rent_2_bedroom: f64,
}

/// Rental vacancy rate (percent) for one survey year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyPoint {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Vacancy_Rate")]
    pub vacancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePricePoint {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "MedianPrice")]
    pub median_price: f64,
}

/// Headline numbers shown on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingStats {
    /// Percent growth of 2-bedroom rent since 2010
    pub rent_increase: i64,
    /// 1-based rank by completions per 1,000 residents, 1 = fewest
    pub construction_rank: i64,
    /// Years of median household income needed for a 20% down payment
    pub downpayment_ratio: i64,
}

impl HousingStats {
    pub const DEFAULT_RENT_INCREASE: i64 = 84;
    pub const DEFAULT_CONSTRUCTION_RANK: i64 = 1;
    pub const DEFAULT_DOWNPAYMENT_RATIO: i64 = 15;
}

impl Default for HousingStats {
    fn default() -> Self {
        Self {
            rent_increase: Self::DEFAULT_RENT_INCREASE,
            construction_rank: Self::DEFAULT_CONSTRUCTION_RANK,
            downpayment_ratio: Self::DEFAULT_DOWNPAYMENT_RATIO,
        }
    }
}

/// What legalizing missing-middle housing could mean for one municipality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingMiddleImpact {
    pub municipality: String,
    pub total_dwellings: Option<f64>,
    pub single_detached_pct: Option<f64>,
    pub missing_middle_pct: Option<f64>,
    pub peer_average_missing_middle_pct: Option<f64>,
    pub additional_units_at_peer_average: Option<i64>,
    pub completions_per_1000: Option<f64>,
    pub latest_population: Option<f64>,
    pub population_year: Option<String>,
}
