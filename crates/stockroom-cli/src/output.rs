//! Plain-text rendering for command results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use stockroom_core::models::PaginationInfo;
use stockroom_core::utils::{format_currency, page_window, truncate_text, PageLink};

/// Widest a single cell may get before it is cut.
const MAX_CELL_WIDTH: usize = 40;

/// A simple column-aligned table written to stdout.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(
            cells
                .into_iter()
                .map(|cell| truncate_text(&cell, MAX_CELL_WIDTH))
                .collect(),
        );
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let headers: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let mut out = vec![line(&headers), line(&rule)];
        for row in &self.rows {
            out.push(line(row));
        }
        out.join("\n")
    }

    pub fn print(&self) {
        if self.rows.is_empty() {
            println!("No data found.");
        } else {
            println!("{}", self.render());
        }
    }
}

/// "Showing 11 - 20 of 23" followed by the page bar, e.g. `1 ... 4 [5] 6 ... 10`.
pub fn page_footer(pagination: &PaginationInfo, limit: u32) -> String {
    let (first, last) = pagination.showing_range(limit);
    let links = page_window(pagination.current, pagination.total_page)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == pagination.current => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Showing {} - {} of {}    {}",
        first, last, pagination.total_data, links
    )
}

/// Render a decimal string from the API as rupiah, or as-is if unparseable.
pub fn currency_str(raw: &str) -> String {
    raw.trim()
        .parse::<f64>()
        .map(format_currency)
        .unwrap_or_else(|_| raw.to_string())
}

pub fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write a downloaded PDF, defaulting to `<stem>.pdf` in the working directory.
pub fn save_pdf(bytes: &[u8], output: Option<PathBuf>, stem: &str) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| Path::new(".").join(format!("{}.pdf", stem)));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(&["ID", "Name"]);
        table.row(vec!["c1".to_string(), "Minuman".to_string()]);
        table.row(vec!["c10".to_string(), "Alat Tulis".to_string()]);
        assert_eq!(
            table.render(),
            "ID   Name\n---  ----------\nc1   Minuman\nc10  Alat Tulis"
        );
    }

    #[test]
    fn test_page_footer_marks_current_page() {
        let pagination = PaginationInfo {
            total_data: 95,
            total_page: 10,
            current: 5,
            ..Default::default()
        };
        assert_eq!(
            page_footer(&pagination, 10),
            "Showing 41 - 50 of 95    1 ... 4 [5] 6 ... 10"
        );
    }

    #[test]
    fn test_currency_str() {
        assert_eq!(currency_str("45000.00"), "Rp 45.000");
        assert_eq!(currency_str("n/a"), "n/a");
    }

    #[test]
    fn test_save_pdf_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("po-11.pdf");
        let written = save_pdf(b"%PDF", Some(target.clone()), "ignored").unwrap();
        assert_eq!(written, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF");
    }
}
