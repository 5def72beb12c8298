//! Columnar schema inference from a sampled CSV prefix
//!
//! Inference is heuristic and bounded: only the first [`SAMPLE_ROWS`]
//! records are read. A column whose later rows hold incompatible values is
//! not caught here and surfaces as a load-time type error instead.

use crate::error::{Result, WarehouseError};
use std::fmt;
use std::path::Path;

/// Number of records sampled per file.
const SAMPLE_ROWS: usize = 100;

/// The three type buckets inference distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Float,
    Text,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::Float => write!(f, "FLOAT"),
            SqlType::Text => write!(f, "VARCHAR(256)"),
        }
    }
}

/// Table name and typed columns derived from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredSchema {
    /// File stem, used verbatim as the table name.
    pub table_name: String,
    /// (column name, type) in file-column order.
    pub columns: Vec<(String, SqlType)>,
}

impl InferredSchema {
    /// Render the CREATE TABLE statement, one quoted column per line.
    pub fn create_statement(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(name, sql_type)| format!("  \"{name}\" {sql_type}"))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE {} (\n{}\n);", self.table_name, columns)
    }
}

#[derive(Clone, Copy)]
struct ColumnGuess {
    integer: bool,
    float: bool,
    observed: bool,
}

impl ColumnGuess {
    fn observe(&mut self, value: &str) {
        self.observed = true;
        if self.integer && value.parse::<i64>().is_err() {
            self.integer = false;
        }
        if self.float && value.parse::<f64>().is_err() {
            self.float = false;
        }
    }

    fn resolve(self) -> SqlType {
        // A column with no sampled values gives numeric inference nothing
        // to stand on; type it as text like any other unparseable column.
        if !self.observed {
            SqlType::Text
        } else if self.integer {
            SqlType::Integer
        } else if self.float {
            SqlType::Float
        } else {
            SqlType::Text
        }
    }
}

/// Infer a table schema from the file's header row and a bounded sample of
/// its records.
///
/// Integer-valued columns become `INTEGER`, floating-point columns `FLOAT`,
/// and everything else (text, mixed values, or empties that break numeric
/// parsing) a fixed-width text type.
pub fn infer_schema(path: &Path) -> Result<InferredSchema> {
    let table_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| WarehouseError::InvalidFileName(path.display().to_string()))?
        .to_string();

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut guesses = vec![
        ColumnGuess {
            integer: true,
            float: true,
            observed: false
        };
        headers.len()
    ];
    for record in reader.records().take(SAMPLE_ROWS) {
        let record = record?;
        for (guess, value) in guesses.iter_mut().zip(record.iter()) {
            guess.observe(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(guesses)
        .map(|(name, guess)| (name, guess.resolve()))
        .collect();

    Ok(InferredSchema {
        table_name,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn infers_integer_float_and_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "scores.csv", "id,name,score\n1,Alice,88.5\n2,Bob,90.0\n");

        let schema = infer_schema(&path).unwrap();
        assert_eq!(schema.table_name, "scores");
        assert_eq!(
            schema.columns,
            vec![
                ("id".to_string(), SqlType::Integer),
                ("name".to_string(), SqlType::Text),
                ("score".to_string(), SqlType::Float),
            ]
        );

        let statement = schema.create_statement();
        assert!(statement.contains("\"id\" INTEGER"));
        assert!(statement.contains("\"score\" FLOAT"));
        assert!(statement.contains("\"name\" VARCHAR(256)"));
        assert!(statement.starts_with("CREATE TABLE scores"));
    }

    #[test]
    fn empty_values_demote_numeric_columns_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "gaps.csv", "id,count\n1,10\n2,\n");

        let schema = infer_schema(&path).unwrap();
        assert_eq!(schema.columns[0].1, SqlType::Integer);
        assert_eq!(schema.columns[1].1, SqlType::Text);
    }

    #[test]
    fn sampling_stops_at_the_row_bound() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = String::from("value\n");
        for i in 0..SAMPLE_ROWS {
            contents.push_str(&format!("{i}\n"));
        }
        // Row beyond the sample window holds text; inference must not see it.
        contents.push_str("not-a-number\n");
        let path = write_csv(&dir, "bounded.csv", &contents);

        let schema = infer_schema(&path).unwrap();
        assert_eq!(schema.columns[0].1, SqlType::Integer);
    }

    #[test]
    fn header_only_file_types_every_column_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", "id,name\n");

        let schema = infer_schema(&path).unwrap();
        assert_eq!(
            schema.columns,
            vec![
                ("id".to_string(), SqlType::Text),
                ("name".to_string(), SqlType::Text),
            ]
        );
    }

    #[test]
    fn table_name_strips_the_extension_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "olist_order_reviews.csv", "a\n1\n");

        let schema = infer_schema(&path).unwrap();
        assert_eq!(schema.table_name, "olist_order_reviews");
    }
}
