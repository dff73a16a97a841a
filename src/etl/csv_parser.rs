use crate::dataset::{Dataset, Value};
use crate::{DbError, DbResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct CsvParser {
    delimiter: u8,
    has_headers: bool,
}

impl CsvParser {
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

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> DbResult<Dataset> {
        let file = File::open(&path).map_err(|e| {
            DbError::Csv(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        self.parse_reader(file)
    }

    // Reads the whole input into a dataset. The header row names the columns;
    // without headers, names are synthesized from the width of the first record.
    pub fn parse_reader<R: Read>(&self, reader: R) -> DbResult<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .from_reader(reader);

        let mut dataset = if self.has_headers {
            let headers = csv_reader
                .headers()
                .map_err(|e| DbError::Csv(format!("failed to read header row: {}", e)))?;
            Some(Dataset::new(
                headers.iter().map(|h| h.trim().to_string()).collect(),
            ))
        } else {
            None
        };

        for (idx, result) in csv_reader.records().enumerate() {
            let record =
                result.map_err(|e| DbError::Csv(format!("row {}: {}", idx + 1, e)))?;
            let dataset = dataset.get_or_insert_with(|| {
                Dataset::new((0..record.len()).map(|i| format!("column_{}", i)).collect())
            });
            dataset.push_row(record.iter().map(Value::parse).collect())?;
        }

        Ok(dataset.unwrap_or_else(|| Dataset::new(Vec::new())))
    }
}
