// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Positional text parsing
//!
//! The drillhole (`.dh`) and volume (`.mesh`) formats are newline-delimited
//! records whose meaning depends only on their position and on counts
//! declared earlier in the file. [`LineCursor`] walks such a file line by
//! line and turns every shortfall into a descriptive [`Error::Malformed`].

use std::str::Lines;

use crate::error::{Error, Result};

/// Parse a finite float token with fast-float
///
/// `nan` and `inf` tokens are rejected like any other non-number.
#[inline]
pub fn parse_f64(token: &str) -> Option<f64> {
    fast_float::parse::<f64, _>(token.trim())
        .ok()
        .filter(|v: &f64| v.is_finite())
}

/// Parse a non-negative integer token with lexical-core
#[inline]
pub fn parse_usize(token: &str) -> Option<usize> {
    lexical_core::parse::<u64>(token.trim().as_bytes())
        .ok()
        .and_then(|v| usize::try_from(v).ok())
}

/// Sequential reader over the lines of a positional text format
pub struct LineCursor<'a> {
    format: &'static str,
    lines: Lines<'a>,
    line_no: usize,
    input_len: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor; `format` names the format in error messages
    pub fn new(format: &'static str, text: &'a str) -> Self {
        Self {
            format,
            lines: text.lines(),
            line_no: 0,
            input_len: text.len(),
        }
    }

    /// 1-based number of the line most recently consumed
    #[inline]
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Capacity to reserve for `count` declared records
    ///
    /// Declared counts are untrusted; every record takes at least one byte of
    /// input, so the reservation never exceeds the input length.
    #[inline]
    pub fn capacity_for(&self, count: usize) -> usize {
        count.min(self.input_len)
    }

    /// Build a malformed-input error pointing at the current line
    pub fn error(&self, detail: impl Into<String>) -> Error {
        Error::malformed(self.format, self.line_no, detail)
    }

    /// Consume the next line, failing if the input is exhausted
    pub fn next_line(&mut self, what: &str) -> Result<&'a str> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(line.trim())
            }
            None => Err(Error::malformed(
                self.format,
                self.line_no + 1,
                format!("expected {}, found end of input", what),
            )),
        }
    }

    /// Consume a line holding a single float
    pub fn next_f64(&mut self, what: &str) -> Result<f64> {
        let line = self.next_line(what)?;
        parse_f64(line).ok_or_else(|| self.error(format!("expected {}, found '{}'", what, line)))
    }

    /// Consume a line holding a single count
    pub fn next_count(&mut self, what: &str) -> Result<usize> {
        let line = self.next_line(what)?;
        parse_usize(line).ok_or_else(|| self.error(format!("expected {}, found '{}'", what, line)))
    }

    /// Consume a line of exactly `N` whitespace-separated floats
    pub fn next_f64_row<const N: usize>(&mut self, what: &str) -> Result<[f64; N]> {
        let line = self.next_line(what)?;
        let mut row = [0.0; N];
        let mut count = 0;
        for token in line.split_whitespace() {
            if count == N {
                return Err(self.error(format!("{} has more than {} values", what, N)));
            }
            row[count] = parse_f64(token)
                .ok_or_else(|| self.error(format!("invalid number '{}' in {}", token, what)))?;
            count += 1;
        }
        if count != N {
            return Err(self.error(format!("{} has {} values, expected {}", what, count, N)));
        }
        Ok(row)
    }

    /// Consume a line of exactly `N` whitespace-separated indices
    pub fn next_index_row<const N: usize>(&mut self, what: &str) -> Result<[u32; N]> {
        let line = self.next_line(what)?;
        let mut row = [0u32; N];
        let mut count = 0;
        for token in line.split_whitespace() {
            if count == N {
                return Err(self.error(format!("{} has more than {} indices", what, N)));
            }
            row[count] = lexical_core::parse::<u32>(token.as_bytes())
                .map_err(|_| self.error(format!("invalid index '{}' in {}", token, what)))?;
            count += 1;
        }
        if count != N {
            return Err(self.error(format!("{} has {} indices, expected {}", what, count, N)));
        }
        Ok(row)
    }

    /// Ensure nothing but blank lines remain
    pub fn finish(mut self) -> Result<()> {
        while let Some(line) = self.lines.next() {
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Err(self.error("unexpected trailing content"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_f64(" 12.5 "), Some(12.5));
        assert_eq!(parse_f64("-3e2"), Some(-300.0));
        assert_eq!(parse_f64("abc"), None);
        assert_eq!(parse_f64("nan"), None);
        assert_eq!(parse_f64("-inf"), None);
        assert_eq!(parse_f64("1e400"), None);
        assert_eq!(parse_usize("42"), Some(42));
        assert_eq!(parse_usize("-1"), None);
    }

    #[test]
    fn test_cursor_rows() {
        let mut cursor = LineCursor::new("test", "1 2 3\n4 5 6 7 8 9 10 11\n");
        let row: [f64; 3] = cursor.next_f64_row("vertex").unwrap();
        assert_eq!(row, [1.0, 2.0, 3.0]);
        let idx: [u32; 8] = cursor.next_index_row("voxel").unwrap();
        assert_eq!(idx, [4, 5, 6, 7, 8, 9, 10, 11]);
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_cursor_reports_line_numbers() {
        let mut cursor = LineCursor::new("test", "1\n");
        cursor.next_count("count").unwrap();
        let err = cursor.next_f64("depth").unwrap_err();
        match err {
            Error::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_capacity_bounded_by_input() {
        let cursor = LineCursor::new("test", "1\n2\n");
        assert_eq!(cursor.capacity_for(2), 2);
        assert_eq!(cursor.capacity_for(usize::MAX), 4);
    }

    #[test]
    fn test_non_finite_row_rejected() {
        let mut cursor = LineCursor::new("test", "1 nan 3\n");
        assert!(cursor.next_f64_row::<3>("vertex").is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let mut cursor = LineCursor::new("test", "1 2\n");
        assert!(cursor.next_f64_row::<3>("vertex").is_err());
    }

    #[test]
    fn test_trailing_content_rejected() {
        let cursor = LineCursor::new("test", "\n\nextra\n");
        assert!(cursor.finish().is_err());
    }
}
