use crate::diff::result::DiffRow;

/// Format rows as prefixed single-column text.
pub fn format_text(rows: &[DiffRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        match row {
            DiffRow::Unchanged { line } => lines.push(format!("  {line}")),
            DiffRow::Added { right } => lines.push(format!("+ {right}")),
            DiffRow::Removed { left } => lines.push(format!("- {left}")),
            DiffRow::Changed { left, right } => {
                lines.push(format!("- {left}"));
                lines.push(format!("+ {right}"));
            }
        }
    }
    lines.join("\n")
}

/// Format rows as two aligned columns with sdiff-style gutter markers:
/// space for unchanged, `>` added, `<` removed, `|` changed.
pub fn format_side_by_side(rows: &[DiffRow]) -> String {
    let width = rows
        .iter()
        .filter_map(|row| row.left().map(str::len))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let marker = match row {
            DiffRow::Unchanged { .. } => ' ',
            DiffRow::Added { .. } => '>',
            DiffRow::Removed { .. } => '<',
            DiffRow::Changed { .. } => '|',
        };
        let left = row.left().unwrap_or("");
        let right = row.right().unwrap_or("");
        lines.push(format!("{left:<width$} {marker} {right}"));
    }
    lines.join("\n")
}

/// Format a simple summary of row counts.
pub fn format_summary(rows: &[DiffRow]) -> String {
    let mut unchanged = 0;
    let mut added = 0;
    let mut removed = 0;
    let mut changed = 0;

    for row in rows {
        match row {
            DiffRow::Unchanged { .. } => unchanged += 1,
            DiffRow::Added { .. } => added += 1,
            DiffRow::Removed { .. } => removed += 1,
            DiffRow::Changed { .. } => changed += 1,
        }
    }

    format!("unchanged={unchanged} added={added} removed={removed} changed={changed}")
}
