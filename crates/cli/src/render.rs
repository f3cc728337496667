//! Plain-text table rendering for terminal output.

use rust_decimal::Decimal;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A fixed-column text table.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given headers.
    #[must_use]
    pub fn new(headers: &[(&str, Align)]) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(title, align)| ((*title).to_string(), *align))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty; extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Returns true if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render headers, a rule and every row, each line newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, (title, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_cells: Vec<String> = self.headers.iter().map(|(t, _)| t.clone()).collect();
        let mut out = self.render_line(&header_cells, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.render_line(row, &widths));
        }
        out
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        let line: Vec<String> = self
            .headers
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, ((_, align), &width))| {
                let cell = cells.get(i).map_or("", String::as_str);
                match align {
                    Align::Left => format!("{cell:<width$}"),
                    Align::Right => format!("{cell:>width$}"),
                }
            })
            .collect();
        let mut line = line.join("  ").trim_end().to_string();
        line.push('\n');
        line
    }
}

/// Format a quantity with three decimals (the tolerance's resolution).
#[must_use]
pub fn quantity(value: Decimal) -> String {
    format!("{:.3}", value.round_dp(3))
}
