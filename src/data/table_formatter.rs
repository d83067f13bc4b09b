//! Fixed-width text preview of a table window.
//!
//! Every column shares one width, the longest header or cell in the window:
//!
//! ```text
//! -----------------------
//! | Date     | Item     |
//! -----------------------
//! | 2014-1-1 | Printer  |
//! -----------------------
//! ```

use crate::data::datatable::{DataTable, DEFAULT_PRINT_LIMIT};
use crate::error::Result;
use std::fmt;

const SEPARATOR: &str = "|";
const LINE_CHAR: char = '-';

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn draw_line(out: &mut String, length: usize) {
    out.extend(std::iter::repeat(LINE_CHAR).take(length));
    out.push('\n');
}

fn draw_row<S: AsRef<str>>(out: &mut String, cells: &[S], width: usize) {
    out.push_str(SEPARATOR);
    for cell in cells {
        out.push_str(&format!(" {:<width$} {}", cell.as_ref(), SEPARATOR, width = width));
    }
    out.push('\n');
}

fn skipped_message(skipped_first: usize, skipped_last: usize) -> String {
    let mut parts = Vec::new();
    if skipped_first > 0 {
        parts.push(format!("first {}", skipped_first));
    }
    if skipped_last > 0 {
        parts.push(format!("last {}", skipped_last));
    }
    format!("Skipped {} rows.", parts.join(" and "))
}

impl DataTable {
    /// Renders up to `limit` display rows starting at `start`. When rows fall
    /// outside the window a trailing notice says how many were skipped.
    pub fn to_preview(&self, start: usize, limit: usize) -> Result<String> {
        let headers = self.headers();
        let rows: Vec<Vec<String>> = self.formatted_iter_window(start, Some(limit))?.collect();

        let width = headers
            .iter()
            .chain(rows.iter().flatten())
            .map(|text| text_width(text))
            .max()
            .unwrap_or(0);
        let columns = headers.len();
        let total = (width + 2) * columns + columns + 1;

        let mut out = String::new();
        draw_line(&mut out, total);
        draw_row(&mut out, &headers, width);
        draw_line(&mut out, total);
        for row in &rows {
            draw_row(&mut out, row, width);
        }

        let skipped_first = start;
        let skipped_last = self.row_count() - start - rows.len();
        if skipped_first > 0 || skipped_last > 0 {
            let inner = total.saturating_sub(2);
            out.push_str(&format!("{} {:>inner$}\n", SEPARATOR, SEPARATOR, inner = inner));
            let message = skipped_message(skipped_first, skipped_last);
            let inner = total.saturating_sub(3);
            out.push_str(&format!(
                "{}{:>inner$} {}\n",
                SEPARATOR,
                message,
                SEPARATOR,
                inner = inner
            ));
        }

        draw_line(&mut out, total);
        Ok(out)
    }
}

/// Preview of the first [`DEFAULT_PRINT_LIMIT`] rows.
impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = self.to_preview(0, DEFAULT_PRINT_LIMIT).map_err(|_| fmt::Error)?;
        f.write_str(&preview)
    }
}
