//! Output formatting utilities for MCP tools.
//!
//! Every tool answers with plain text. Tabular data is rendered as an ASCII
//! table in the style of the MySQL and psql command-line clients.

use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

/// Render a single cell value.
pub fn format_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

/// Join a list of names for display inside one cell.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Render `rows` under `headers` as a bordered table.
///
/// Column widths are measured in terminal display width so that CJK and
/// other wide characters line up. Rows shorter than the header are padded
/// with `NULL`.
pub fn format_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<JsonValue>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<(String, bool)>> = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|i| match row.get(i) {
                    Some(value) => (format_value(value), value.is_number()),
                    None => (format_value(&JsonValue::Null), false),
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().width()).collect();
    for row in &cells {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.width());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let mut output = String::new();
    output.push_str(&separator);
    let header: String = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("| {} ", pad_center(h.as_ref(), *w)))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in &cells {
        let line: String = row
            .iter()
            .zip(&widths)
            .map(|((text, numeric), w)| {
                if *numeric {
                    format!("| {} ", pad_right_align(text, *w))
                } else {
                    format!("| {} ", pad_left_align(text, *w))
                }
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&line);
    }

    output.push_str(&separator);
    output
}

/// Render a list of names as a one-column table.
pub fn format_name_list(header: &str, names: &[String]) -> String {
    let rows: Vec<Vec<JsonValue>> = names
        .iter()
        .map(|n| vec![JsonValue::String(n.clone())])
        .collect();
    format_table(&[header], &rows)
}

/// `1 row`, `3 rows`.
pub fn row_count_text(row_count: usize) -> String {
    let row_text = if row_count == 1 { "row" } else { "rows" };
    format!("{} {}", row_count, row_text)
}

/// Footer line for a result set.
pub fn row_count_footer(row_count: usize) -> String {
    format!("{} in set", row_count_text(row_count))
}

// `format!` width specifiers count chars, not display columns, so padding
// is computed by hand.

fn pad_left_align(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn pad_right_align(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(fill), text)
}

fn pad_center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    let left = fill / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
}
