use crate::dataset::Dataset;
use crate::db::Connection;
use crate::etl::csv_parser::CsvParser;
use crate::DbResult;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: String,
    pub total_rows: usize,
    pub rows_inserted: usize,
}

impl LoadReport {
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }
        self.rows_inserted as f64 / self.total_rows as f64
    }
}

pub struct Loader {
    delimiter: u8,
    has_headers: bool,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    // Parses the delimited file and appends every row to the named table,
    // creating the table if it does not exist.
    pub fn load_file<P: AsRef<Path>>(
        &self,
        path: P,
        table: &str,
        db_url: &str,
    ) -> DbResult<LoadReport> {
        let parser = CsvParser::new()
            .with_delimiter(self.delimiter)
            .with_headers(self.has_headers);
        let dataset = parser.parse_file(path)?;
        self.load_dataset(&dataset, table, db_url)
    }

    pub fn load_dataset(
        &self,
        dataset: &Dataset,
        table: &str,
        db_url: &str,
    ) -> DbResult<LoadReport> {
        // The connection lives for this call only; dropping it releases the
        // handle whether the append succeeded or not.
        let mut conn = Connection::open(db_url)?;
        let rows_inserted = conn.append(table, dataset)?;
        Ok(LoadReport {
            table: table.to_string(),
            total_rows: dataset.len(),
            rows_inserted,
        })
    }
}
