//! Rendering of report and query results to stdout

use anyhow::Result;
use retain_query::{OutputFormat, QueryResult, cell_text};
use serde_json::Value;

/// Widest a table column may grow before values are truncated
const MAX_WIDTH: usize = 50;

/// Print a result in the requested format
pub fn print_result(result: &QueryResult, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Table => render_table(result),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Csv => result.to_csv(),
    };
    print!("{}", rendered);
    Ok(())
}

/// Render as an ASCII table
pub fn render_table(result: &QueryResult) -> String {
    if result.is_empty() {
        return "(empty result)\n".to_string();
    }

    let mut widths: Vec<usize> = result
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .collect();

    for row in &result.rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_value(value).chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_WIDTH);
    }

    let mut out = String::new();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:width$}", c.name, width = *w))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&sep.join("-+-"));
    out.push('\n');

    for row in &result.rows {
        let values: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:width$}", truncate(&display_value(v), *w), width = *w))
            .collect();
        out.push_str(values.join(" | ").trim_end());
        out.push('\n');
    }

    out
}

/// Render as a pretty-printed JSON array of objects
pub fn render_json(result: &QueryResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&result.to_objects())?;
    json.push('\n');
    Ok(json)
}

/// Cell text for the table view; nulls are spelled out
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => cell_text(other),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_query::{Column, DataType};
    use serde_json::json;

    fn sample() -> QueryResult {
        QueryResult::new(
            vec![
                Column::required("stage", DataType::String),
                Column::optional("pct", DataType::Float64),
            ],
            vec![
                vec![json!("home"), json!(100.0)],
                vec![json!("purchase"), Value::Null],
            ],
            0,
        )
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "stage    | pct");
        assert_eq!(lines[1], "---------+------");
        assert_eq!(lines[2], "home     | 100.0");
        assert_eq!(lines[3], "purchase | NULL");
    }

    #[test]
    fn test_render_empty_table() {
        let empty = QueryResult::new(sample().columns, Vec::new(), 0);
        assert_eq!(render_table(&empty), "(empty result)\n");
    }

    #[test]
    fn test_render_table_truncates_long_values() {
        let result = QueryResult::new(
            vec![Column::required("uri", DataType::String)],
            vec![vec![json!("x".repeat(80))]],
            0,
        );
        let table = render_table(&result);
        let row = table.lines().nth(2).unwrap();
        assert_eq!(row.chars().count(), MAX_WIDTH);
        assert!(row.ends_with("..."));
    }

    #[test]
    fn test_render_json_keeps_column_order() {
        let json = render_json(&sample()).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["pct"], Value::Null);
        assert!(json.find("\"stage\"").unwrap() < json.find("\"pct\"").unwrap());
    }
}
