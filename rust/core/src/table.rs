// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSV staging for line and point layers
//!
//! Import only stages the header and raw rows. Which columns hold X, Y, Z,
//! the line ID or the colour value is decided afterwards, when the layer is
//! configured.

use crate::error::{Error, Result};
use crate::fast_parse::parse_f64;

const FORMAT: &str = "csv";

/// Header plus raw string rows of a delimited file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnTable {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ColumnTable {
    /// Number of data rows (header excluded)
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Raw cell text
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column)).map(String::as_str)
    }

    /// Numeric cell; a non-numeric cell is a malformed-input error
    pub fn number(&self, row: usize, column: usize) -> Result<f64> {
        let cell = self.cell(row, column).unwrap_or("");
        parse_f64(cell).ok_or_else(|| {
            Error::malformed(
                FORMAT,
                row + 2,
                format!(
                    "column '{}' holds '{}', expected a number",
                    self.fields.get(column).map(String::as_str).unwrap_or("?"),
                    cell
                ),
            )
        })
    }

    /// Every value of a named column as numbers
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.column_index(name)?;
        (0..self.rows.len()).map(|row| self.number(row, column)).collect()
    }
}

/// Parse comma-delimited text with a mandatory header row
pub fn parse_table(text: &str) -> Result<ColumnTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if fields.is_empty() || fields.iter().all(String::is_empty) {
        return Err(Error::malformed(FORMAT, 1, "missing header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(ColumnTable { fields, rows })
}

/// Staged CSV for a ribbon (line set) layer
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LinesParameters {
    pub table: ColumnTable,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub z_column: Option<String>,
    pub line_column: Option<String>,
    /// Scalar column that colours the ribbon
    pub value_column: Option<String>,
}

impl LinesParameters {
    pub fn new(table: ColumnTable) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    /// Select the coordinate and grouping columns
    pub fn with_columns(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        self.x_column = Some(x.into());
        self.y_column = Some(y.into());
        self.z_column = Some(z.into());
        self.line_column = Some(line.into());
        self
    }

    pub fn with_value_column(mut self, value: impl Into<String>) -> Self {
        self.value_column = Some(value.into());
        self
    }

    /// Position of the colouring column, if one is selected
    pub fn value_index(&self) -> Result<Option<usize>> {
        self.value_column
            .as_deref()
            .map(|name| self.table.column_index(name))
            .transpose()
    }

    /// Resolved `[x, y, z, line]` column positions
    pub fn column_indices(&self) -> Result<[usize; 4]> {
        Ok([
            resolve(&self.table, &self.x_column, "X")?,
            resolve(&self.table, &self.y_column, "Y")?,
            resolve(&self.table, &self.z_column, "Z")?,
            resolve(&self.table, &self.line_column, "line ID")?,
        ])
    }
}

/// Staged CSV for a point-sphere layer
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PointsParameters {
    pub table: ColumnTable,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub z_column: Option<String>,
    /// Scalar column that colours each sphere
    pub value_column: Option<String>,
    /// Rows whose colour value equals this are dropped
    pub no_data: Option<f64>,
}

impl PointsParameters {
    pub fn new(table: ColumnTable) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    pub fn with_columns(mut self, x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        self.x_column = Some(x.into());
        self.y_column = Some(y.into());
        self.z_column = Some(z.into());
        self
    }

    pub fn with_value_column(mut self, value: impl Into<String>) -> Self {
        self.value_column = Some(value.into());
        self
    }

    pub fn with_no_data(mut self, no_data: f64) -> Self {
        self.no_data = Some(no_data);
        self
    }

    /// Position of the colouring column, if one is selected
    pub fn value_index(&self) -> Result<Option<usize>> {
        self.value_column
            .as_deref()
            .map(|name| self.table.column_index(name))
            .transpose()
    }

    /// Resolved `[x, y, z]` column positions
    pub fn column_indices(&self) -> Result<[usize; 3]> {
        Ok([
            resolve(&self.table, &self.x_column, "X")?,
            resolve(&self.table, &self.y_column, "Y")?,
            resolve(&self.table, &self.z_column, "Z")?,
        ])
    }
}

fn resolve(table: &ColumnTable, column: &Option<String>, role: &'static str) -> Result<usize> {
    match column {
        Some(name) => table.column_index(name),
        None => Err(Error::UnmappedColumn(role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &str = "Line,x_27,y_27,altitude,mag\n1,0,0,10,5.5\n1,10,0,10,6\n2,0,5,12,7\n";

    #[test]
    fn test_parse_table() {
        let table = parse_table(LINES).unwrap();
        assert_eq!(table.fields, vec!["Line", "x_27", "y_27", "altitude", "mag"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(2, 0), Some("2"));
        assert_eq!(table.numeric_column("mag").unwrap(), vec![5.5, 6.0, 7.0]);
    }

    #[test]
    fn test_missing_column() {
        let table = parse_table(LINES).unwrap();
        assert!(matches!(table.column_index("easting"), Err(Error::MissingColumn(_))));
    }

    #[test]
    fn test_non_numeric_cell() {
        let table = parse_table("x,y\n1,abc\n").unwrap();
        match table.numeric_column("y").unwrap_err() {
            Error::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(matches!(parse_table("a,b\n1,2\n3\n"), Err(Error::Csv(_))));
    }

    #[test]
    fn test_column_mapping() {
        let params = LinesParameters::new(parse_table(LINES).unwrap());
        assert!(matches!(params.column_indices(), Err(Error::UnmappedColumn("X"))));

        let params = params.with_columns("x_27", "y_27", "altitude", "Line");
        assert_eq!(params.column_indices().unwrap(), [1, 2, 3, 0]);
        assert_eq!(params.value_index().unwrap(), None);

        let params = params.with_value_column("mag");
        assert_eq!(params.value_index().unwrap(), Some(4));
    }

    #[test]
    fn test_points_value_column() {
        let params = PointsParameters::new(parse_table(LINES).unwrap())
            .with_columns("x_27", "y_27", "altitude")
            .with_value_column("grade")
            .with_no_data(-99.0);
        assert_eq!(params.column_indices().unwrap(), [1, 2, 3]);
        assert!(matches!(params.value_index(), Err(Error::MissingColumn(_))));
    }
}
