// ============================================================
// CSV PARSER
// ============================================================
// Header-driven parsing of well-formed CSV files into tables

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use super::encoding::read_decoded;
use super::normalize::normalize_cell;
use crate::domain::csv::{Row, Table};
use crate::domain::error::Result;

/// Generic loader: first row is the header, every later row becomes a `Row`
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table, turning any failure into an empty table.
    ///
    /// Missing files and malformed records are logged, never propagated.
    pub fn load_table(&self, path: &Path) -> Table {
        match self.parse_file(path) {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to load table, using empty table");
                Table::new()
            }
        }
    }

    pub fn parse_file(&self, path: &Path) -> Result<Table> {
        let content = read_decoded(path)?;
        self.parse_content(&content)
    }

    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();

        let mut rows = Table::new();
        for result in reader.records() {
            let record = result?;
            rows.push(Self::parse_row(&headers, &record));
        }

        debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV content");
        Ok(rows)
    }

    /// Pair cells with headers, dropping blanks and cells past the header width
    fn parse_row(headers: &StringRecord, record: &StringRecord) -> Row {
        let mut row = Row::new();
        for (header, raw) in headers.iter().zip(record.iter()) {
            if let Some(value) = normalize_cell(raw) {
                row.insert(header, value);
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::CellValue;

    #[test]
    fn test_parse_simple_csv() {
        let content = "City,Population,Median_Household_Income\nBurlington,\"186,948\",119000\nOakville,213759,\n";
        let rows = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("City"), Some("Burlington"));
        assert_eq!(rows[0].number("Population"), Some(186948.0));
        assert_eq!(rows[0].number("Median_Household_Income"), Some(119000.0));
        // Blank income is omitted, not null
        assert_eq!(rows[1].len(), 2);
        assert!(rows[1].get("Median_Household_Income").is_none());
    }

    #[test]
    fn test_short_and_long_records() {
        let content = "a,b,c\n1\n1,2,3,4\n";
        let rows = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].get("a"), Some(&CellValue::Number(1.0)));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_serialized_rows_have_no_nulls() {
        let content = "Year,Completions,Notes\n2021,,\n2022,1500,provisional\n";
        let rows = CsvParser::new().parse_content(content).unwrap();
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(
            json,
            r#"[{"Year":2021.0},{"Year":2022.0,"Completions":1500.0,"Notes":"provisional"}]"#
        );
    }

    #[test]
    fn test_missing_file_yields_empty_table() {
        let table = CsvParser::new().load_table(Path::new("/no/such/dir/income.csv"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_table_from_disk() {
        let path = std::env::temp_dir().join(format!("income-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "Year,Median_Income\n2021,\"95,000\"\n").unwrap();

        let table = CsvParser::new().load_table(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].number("Median_Income"), Some(95000.0));
    }
}
