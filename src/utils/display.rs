//! Display and output formatting utilities

use crate::map::{ObstacleCatalog, ObstacleRecord, ObstacleTable, Path, Point};
use crate::removal::{PathOutcome, PathReport};

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Grids wider than this are summarised instead of drawn.
pub const MAX_DRAWN_GRID: usize = 256;

/// Format results and maps for the console
pub struct ResultFormatter;

impl ResultFormatter {
    /// One line per path: status, cost and removal count
    pub fn format_summary(reports: &[PathReport], catalog: &ObstacleCatalog) -> String {
        let mut output = String::new();

        output.push_str("Results Summary:\n");
        output.push_str("Path         | Status      | Cost   | Models | Removed\n");
        output.push_str("-------------|-------------|--------|--------|--------\n");

        for report in reports {
            let summary = report.summary(catalog);
            output.push_str(&format!(
                "{:12} | {:11} | {:>6} | {:>6} | {:>7}\n",
                report.path_type.description(),
                summary.status,
                summary.cost.map_or("-".to_string(), |cost| cost.to_string()),
                summary
                    .solutions_found
                    .map_or("-".to_string(), |found| found.to_string()),
                summary.removed.len()
            ));
        }

        output
    }

    /// Statistics and clearance details of one path
    pub fn format_report(report: &PathReport, catalog: &ObstacleCatalog) -> String {
        let mut output = String::new();
        output.push_str(&format!("=== {} path ===\n", report.path_type));

        let solve = match &report.result {
            Ok(solve) => solve,
            Err(e) => {
                output.push_str(&format!("Failed: {}\n", e));
                return output;
            }
        };

        output.push_str(&solve.encoding.to_string());
        if let Some(enumeration) = &solve.enumeration {
            output.push_str(&enumeration.to_string());
        }

        match &solve.outcome {
            PathOutcome::Solved(solution) => {
                output.push_str(&format!("Best solution: {}\n", solution));
                for obstacle in solution.removed_obstacles(catalog) {
                    output.push_str(&format!("  remove {}\n", obstacle));
                }
            }
            PathOutcome::NoSolution => output.push_str("No solution: path formula is unsatisfiable\n"),
        }

        if let Some(clearance) = &solve.clearance {
            output.push_str(&clearance.to_string());
        }

        output
    }

    /// Draw the grid with obstacles labelled by glyph and the path marked `*`.
    ///
    /// Row `n-1` is printed first so that `y` grows upwards.
    pub fn render_grid(grid_size: usize, records: &[ObstacleRecord], path: Option<&Path>) -> String {
        let mut output = String::new();

        if grid_size > MAX_DRAWN_GRID {
            output.push_str(&format!(
                "grid too large to draw ({}x{}, limit {})\n",
                grid_size, grid_size, MAX_DRAWN_GRID
            ));
            Self::push_legend(&mut output, records);
            return output;
        }

        for y in (0..grid_size).rev() {
            output.push_str(&format!("{:3} ", y));
            for x in 0..grid_size {
                let point = Point::new(x, y);
                let glyph = records
                    .iter()
                    .position(|record| record.covers(point))
                    .map_or('·', glyph);
                let marker = if path.is_some_and(|path| path.contains(point)) {
                    '*'
                } else {
                    ' '
                };
                output.push(glyph);
                output.push(marker);
                output.push(' ');
            }
            output.push('\n');
        }

        output.push_str("    ");
        for x in 0..grid_size {
            output.push_str(&format!("{:<3}", x % 100));
        }
        output.push('\n');

        Self::push_legend(&mut output, records);
        output
    }

    fn push_legend(output: &mut String, records: &[ObstacleRecord]) {
        if !records.is_empty() {
            output.push_str("\nLegend:\n");
            for (index, record) in records.iter().enumerate() {
                output.push_str(&format!(
                    "  {}: x [{}, {}], y [{}, {}], weight {}\n",
                    glyph(index),
                    record.x_min,
                    record.x_max,
                    record.y_min,
                    record.y_max,
                    record.weight
                ));
            }
        }
    }

    /// Render a parsed map or result file, with its path when the label names one
    pub fn render_table(table: &ObstacleTable) -> String {
        let path = table
            .path_type()
            .and_then(|path_type| Path::generate(table.grid_size, path_type).ok());

        let mut output = String::new();
        let title = match &path {
            Some(path) => format!("Removed obstacles for the {} path", path.path_type()),
            None => "Obstacle map".to_string(),
        };
        output.push_str(&format!(
            "{} on a {}x{} grid:\n",
            title, table.grid_size, table.grid_size
        ));
        output.push_str(&Self::render_grid(table.grid_size, &table.records, path.as_ref()));
        output
    }
}

fn glyph(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()] as char
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
