use colored::Colorize;
use line_diff_core::{format_side_by_side, format_summary, DiffRow};

/// Render aligned diff rows for terminal output, colored by row kind.
pub fn render_diff(rows: &[DiffRow]) -> String {
    let plain = format_side_by_side(rows);
    let mut out = Vec::with_capacity(rows.len());

    for (line, row) in plain.lines().zip(rows) {
        let colored = match row {
            DiffRow::Added { .. } => line.green().to_string(),
            DiffRow::Removed { .. } => line.red().to_string(),
            DiffRow::Changed { .. } => line.yellow().to_string(),
            DiffRow::Unchanged { .. } => line.to_string(),
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(rows: &[DiffRow]) -> String {
    format_summary(rows).cyan().to_string()
}
