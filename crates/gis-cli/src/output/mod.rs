use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => {
            // A single list field (e.g. `{"projects": [...]}`) renders as its rows.
            if map.len() == 1 {
                if let Some(Value::Array(items)) = map.values().next() {
                    return Ok(render_array_table(items));
                }
            }

            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&["field", "value"], &rows, table_options()))
        }
        scalar => Ok(table::render_entity_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            table_options(),
        )),
    }
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, table_options());
    }

    // `id` first when present, then the remaining keys alphabetically.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    headers.sort_by(|a, b| (a != "id").cmp(&(b != "id")).then_with(|| a.cmp(b)));

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, table_options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format!("{f:.2}"),
            _ => n.to_string(),
        },
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::{render, table::render_entity_table, value_to_cell};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Zone {
        id: &'static str,
        zone_type: &'static str,
        keywords: Vec<&'static str>,
    }

    fn zone() -> Zone {
        Zone {
            id: "zon-1",
            zone_type: "C-1",
            keywords: vec!["public market", "plaza"],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&zone(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["zone_type"], "C-1");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&zone(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        assert!(out.contains("\"id\":\"zon-1\""));
    }

    #[test]
    fn object_table_lists_fields() {
        let out = render(&zone(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("field")));
        assert!(out.contains("public market, plaza"));
    }

    #[test]
    fn array_table_puts_id_first() {
        let out = render(&vec![zone()], OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().expect("header line");
        assert!(header.starts_with("id"));
        assert!(header.find("keywords") < header.find("zone_type"));
    }

    #[test]
    fn single_list_wrapper_renders_rows() {
        let out = render(&json!({ "zones": [{"id": "zon-1"}] }), OutputFormat::Table)
            .expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.starts_with("id")));
        assert!(out.contains("zon-1"));
    }

    #[test]
    fn floats_render_with_two_decimals() {
        assert_eq!(value_to_cell(&json!(72.456)), "72.46");
        assert_eq!(value_to_cell(&json!(3)), "3");
        assert_eq!(value_to_cell(&json!(null)), "-");
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["id", "status", "name"];
        let rows = vec![
            vec!["prj-1".to_string(), "planned".to_string(), "Road".to_string()],
            vec![
                "prj-200".to_string(),
                "in_progress".to_string(),
                "Apokon Health Center".to_string(),
            ],
        ];

        let table = render_entity_table(
            &headers,
            &rows,
            super::table::TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("status"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }
}
