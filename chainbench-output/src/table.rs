//! Plain-text box tables for the run log
//!
//! Tables are drawn with `+`, `-` and `|` so the run log stays readable in
//! any viewer. Every cell is centered in its column and a cell may span
//! several lines; the row grows to the tallest cell.

use std::fmt;

/// A header row plus data rows, rendered in `+---+` box style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing trailing cells render empty, extra cells are dropped
    pub fn add_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| cell_width(h)).collect();

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(cell_width(cell));
            }
        }
        col_widths
    }

    fn write_separator(f: &mut fmt::Formatter<'_>, col_widths: &[usize]) -> fmt::Result {
        write!(f, "+")?;
        for &width in col_widths {
            write!(f, "{}+", "-".repeat(width + 2))?;
        }
        Ok(())
    }

    fn write_row(
        f: &mut fmt::Formatter<'_>,
        cells: &[String],
        col_widths: &[usize],
    ) -> fmt::Result {
        let split: Vec<Vec<&str>> = cells.iter().map(|c| c.split('\n').collect()).collect();
        let height = split.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            write!(f, "\n|")?;
            for (i, lines) in split.iter().enumerate() {
                let text = lines.get(line).copied().unwrap_or("");
                write!(f, " {} |", center(text, col_widths[i]))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col_widths = self.column_widths();

        Self::write_separator(f, &col_widths)?;
        Self::write_row(f, &self.headers, &col_widths)?;
        writeln!(f)?;
        Self::write_separator(f, &col_widths)?;
        for row in &self.rows {
            Self::write_row(f, row, &col_widths)?;
        }
        writeln!(f)?;
        Self::write_separator(f, &col_widths)
    }
}

/// Widest line of a possibly multi-line cell
fn cell_width(cell: &str) -> usize {
    cell.split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Center `text` in `width` columns. With an odd remainder, odd-length text
/// gets the extra space on the right and even-length text on the left.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let excess = width.saturating_sub(len);
    let half = excess / 2;

    let (left, right) = if excess % 2 == 0 {
        (half, half)
    } else if len % 2 == 1 {
        (half, half + 1)
    } else {
        (half + 1, half)
    };

    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Render a report number the way the run log always has: whole values keep
/// one decimal (`941.0`), everything else uses the shortest exact form.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_table() {
        let mut table = TextTable::new(["Parameter", "Max"]);
        table.add_row(["cpu", "12.5"]);

        let expected = "\
+-----------+------+
| Parameter | Max  |
+-----------+------+
|    cpu    | 12.5 |
+-----------+------+";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_multi_line_cell_grows_row() {
        let mut table = TextTable::new(["Details", "Avg"]);
        table.add_row(["Protocols: TCP\nStreams: 1", "935.75"]);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        // separator, header, separator, two content lines, separator
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "| Protocols: TCP | 935.75 |");
        assert_eq!(lines[4], "|   Streams: 1   |        |");
    }

    #[test]
    fn test_center_odd_remainder() {
        assert_eq!(center("ab", 5), "  ab ");
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("abcd", 4), "abcd");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = TextTable::new(["a", "b", "c"]);
        table.add_row(["1"]);
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(941.0), "941.0");
        assert_eq!(format_value(935.75), "935.75");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(0.405), "0.405");
    }
}
