// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing layer data
#[derive(Error, Debug)]
pub enum Error {
    /// A positional text format does not match its declared counts
    #[error("Malformed {format} input at line {line}: {detail}")]
    Malformed {
        format: &'static str,
        line: usize,
        detail: String,
    },

    #[error("Column '{0}' not found in table header")]
    MissingColumn(String),

    #[error("Column mapping incomplete: {0} column not selected")]
    UnmappedColumn(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Raster decode error: {0}")]
    Raster(#[from] tiff::TiffError),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Unknown layer kind: {0}")]
    UnknownLayerKind(String),

    #[error("Import source missing: {0}")]
    MissingSource(String),

    #[error("Invalid UTF-8 content")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

impl Error {
    /// Shorthand for a positional-format violation
    pub fn malformed(format: &'static str, line: usize, detail: impl Into<String>) -> Self {
        Error::Malformed {
            format,
            line,
            detail: detail.into(),
        }
    }
}
