//! CSV file reader with header validation

use crate::reader::{coerce_numeric, IoError, IoResult, Row, TableRow};
use crate::schema::{ColumnIndex, TableSchema};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV table held fully in memory
pub struct CsvReader {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl CsvReader {
    /// Open a CSV file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let reader = Self::from_reader(BufReader::new(file), delimiter)?;

        tracing::info!(
            path,
            rows = reader.records.len(),
            columns = reader.headers.len(),
            "loaded table"
        );
        Ok(reader)
    }

    /// Read a delimited table from any source; the first row is the header
    pub fn from_reader<R: Read>(source: R, delimiter: u8) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| match e.kind() {
                csv::ErrorKind::Io(io) => IoError::Io(io.to_string()),
                _ => IoError::InvalidFormat(e.to_string()),
            })?;

        Ok(Self { headers, records })
    }

    /// Validate the header row against `T`'s schema and build every row
    pub fn read_rows<T: TableRow>(&self) -> IoResult<Vec<T>> {
        let schema = T::schema();
        let index = schema.resolve(self.headers.iter().map(String::as_str))?;

        for (column, count) in self.count_numeric_issues(&schema, &index) {
            tracing::warn!(
                table = %schema.name,
                column = %column,
                count,
                "non-numeric cells treated as missing"
            );
        }

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
                T::from_row(&Row::new(&index, record, line))
            })
            .collect();

        Ok(rows)
    }

    /// Cells in the schema's numeric columns that hold text but no usable
    /// number, per column in schema order
    pub fn numeric_issues(&self, schema: &TableSchema) -> IoResult<Vec<(String, usize)>> {
        let index = schema.resolve(self.headers.iter().map(String::as_str))?;
        Ok(self.count_numeric_issues(schema, &index))
    }

    fn count_numeric_issues(
        &self,
        schema: &TableSchema,
        index: &ColumnIndex,
    ) -> Vec<(String, usize)> {
        schema
            .columns
            .iter()
            .filter(|column| column.dtype.is_numeric())
            .filter_map(|column| {
                let position = index.position(&column.name)?;
                let count = self
                    .records
                    .iter()
                    .filter_map(|record| record.get(position))
                    .filter(|cell| !cell.trim().is_empty() && coerce_numeric(cell).is_none())
                    .count();
                (count > 0).then(|| (column.name.clone(), count))
            })
            .collect()
    }

    /// Number of data records (header excluded)
    pub fn num_records(&self) -> usize {
        self.records.len()
    }
}
