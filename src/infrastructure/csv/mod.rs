// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection, cell normalization, table loading and the
// heuristic rent/vacancy extractors

mod csv_parser;
mod encoding;
pub mod heuristic;
mod normalize;

pub use csv_parser::CsvParser;
pub use encoding::read_decoded;
pub use heuristic::{load_rent_points, load_vacancy_points};
pub use normalize::normalize_cell;
