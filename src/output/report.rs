//! End-of-run report of crawled pages
//!
//! The report is built from the frontier's claimed set once the crawl window
//! has closed and rendered as a bordered text table.

use crate::model::Page;
use std::collections::HashMap;

const TABLE_TITLE: &str = "Crawled pages";
const HEADERS: [&str; 4] = ["URL", "TITLE", "DEPTH", "NUMBER OF RELATED PAGES"];

/// One crawled page in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub url: String,
    pub title: String,
    pub depth: u32,
    pub related_pages: usize,
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Crawled pages, sorted by depth then URL
    pub rows: Vec<ReportRow>,

    /// Number of URLs claimed by any spider, crawled or not
    pub total_claimed: usize,
}

impl CrawlReport {
    /// Builds the report from a frontier snapshot
    ///
    /// Pages that were claimed but never finished are counted in
    /// `total_claimed` only.
    pub fn from_snapshot(snapshot: &HashMap<String, Page>) -> Self {
        let mut rows: Vec<ReportRow> = snapshot
            .iter()
            .filter(|(_, page)| page.is_crawled)
            .map(|(url, page)| ReportRow {
                url: url.clone(),
                title: page.title.clone(),
                depth: page.depth,
                related_pages: page.related_count(),
            })
            .collect();

        rows.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));

        Self {
            rows,
            total_claimed: snapshot.len(),
        }
    }

    /// Number of crawled pages
    pub fn crawled(&self) -> usize {
        self.rows.len()
    }
}

/// Renders the report as a text table followed by the claimed total
pub fn render_table(report: &CrawlReport) -> String {
    let cells: Vec<[String; 4]> = report
        .rows
        .iter()
        .map(|row| {
            [
                row.url.clone(),
                // Titles may contain newlines; keep one row per page
                row.title.split_whitespace().collect::<Vec<_>>().join(" "),
                row.depth.to_string(),
                row.related_pages.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    // Columns plus " | " separators, inside the outer "| " and " |"
    let inner_width = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);

    let column_border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut lines = vec![
        format!("+{}+", "-".repeat(inner_width + 2)),
        format!("| {} |", pad_right(TABLE_TITLE, inner_width)),
        column_border.clone(),
        format_row(&HEADERS.map(String::from), &widths),
        column_border.clone(),
    ];
    lines.extend(cells.iter().map(|row| format_row(row, &widths)));
    lines.push(column_border);
    lines.push(format!("Totalling {} pages", report.total_claimed));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Prints the report table to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", render_table(report));
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // Depth and related-page count are right-aligned
            if i >= 2 {
                pad_left(cell, *width)
            } else {
                pad_right(cell, *width)
            }
        })
        .collect();

    format!("| {} |", padded.join(" | "))
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", " ".repeat(fill), text)
}
