// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core table types produced by the loaders
// No I/O, no async

mod csv_row;

pub use csv_row::{CellValue, Row, Table};
