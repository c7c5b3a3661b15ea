//! Table rendering utilities for CLI outputs.

use crate::utils::colors::RESET;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            width: header.chars().count(),
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// ANSI color per row; empty string for none.
    colors: Vec<&'static str>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Append a row, widening columns as needed. Missing cells render empty.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (col, cell) in self.columns.iter_mut().zip(row.iter()) {
            col.width = col.width.max(cell.chars().count());
        }
        self.rows.push(row);
        self.colors.push("");
    }

    /// Like [`Table::add_row`], the whole line painted in `color`.
    /// Widths are computed on the plain text.
    pub fn add_colored_row(&mut self, row: Vec<String>, color: &'static str) {
        self.add_row(row);
        if let Some(last) = self.colors.last_mut() {
            *last = color;
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&format!("{:<width$} ", col.header, width = col.width));
        }
        out.push('\n');

        for col in &self.columns {
            out.push_str(&format!("{} ", "-".repeat(col.width)));
        }
        out.push('\n');

        // Rows
        for (row, color) in self.rows.iter().zip(&self.colors) {
            out.push_str(color);
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&format!("{:<width$} ", cell, width = col.width));
            }
            if !color.is_empty() {
                out.push_str(RESET);
            }
            out.push('\n');
        }

        out
    }
}
