// File: crates/dashboard-core/tests/export.rs
// Purpose: CSV / XLS / on-screen table serialization of rows.

use dashboard_core::export::print_page_html;
use dashboard_core::{collect_rows, data_table_html, rows_to_csv, rows_to_xls, Row};
use serde_json::{json, Value};

fn sample_rows() -> Vec<Row> {
    vec![
        Row::new().with("trace", "S1").with("x", 1).with("y", 10.5).with("text", "a, b").with("customdata", ""),
        Row::new().with("trace", "S1").with("x", 2).with("y", Value::Null).with("text", "say \"hi\"").with("customdata", "{\"a\":1}"),
    ]
}

#[test]
fn csv_of_no_rows_is_default_header() {
    assert_eq!(rows_to_csv(&[]).unwrap(), "trace,x,y,text,customdata");
}

#[test]
fn csv_quotes_only_where_needed() {
    let csv = rows_to_csv(&sample_rows()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "trace,x,y,text,customdata");
    assert_eq!(lines[1], "S1,1,10.5,\"a, b\",");
    assert_eq!(lines[2], "S1,2,,\"say \"\"hi\"\"\",\"{\"\"a\"\":1}\"");
    assert!(!csv.ends_with('\n'));
}

#[test]
fn csv_reads_back_with_header_order() {
    let rows = vec![Row::new().with("sector", "Minería").with("pct", 12.25).with("total", 3400)];
    let csv = rows_to_csv(&rows).unwrap();
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, ["sector", "pct", "total"]);
    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Minería");
    assert_eq!(&records[0][1], "12.25");
    assert_eq!(&records[0][2], "3400");
}

#[test]
fn csv_uses_first_row_keys_for_every_row() {
    let rows = vec![Row::new().with("a", 1).with("b", 2), Row::new().with("b", 3).with("c", 4)];
    assert_eq!(rows_to_csv(&rows).unwrap(), "a,b\n1,2\n,3");
}

#[test]
fn xls_has_one_header_row_and_one_row_per_record() {
    let rows = sample_rows();
    let html = rows_to_xls(&rows);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<meta charset=\"UTF-8\">"));
    assert_eq!(html.matches("<tr>").count(), 1 + rows.len());
    assert_eq!(html.matches("<th>").count(), 5);
    assert_eq!(html.matches("<td>").count(), 5 * rows.len());
    // null renders as an empty cell
    assert!(html.contains("<td>2</td><td></td>"));
}

#[test]
fn xls_cells_are_escaped() {
    let rows = vec![Row::new().with("label", "<b>R&D</b>")];
    let html = rows_to_xls(&rows);
    assert!(html.contains("<th>label</th>"));
    assert!(html.contains("<td>&lt;b&gt;R&amp;D&lt;/b&gt;</td>"));
}

#[test]
fn xls_of_no_rows_has_header_only() {
    let html = rows_to_xls(&[]);
    assert_eq!(html.matches("<tr>").count(), 1);
    assert!(html.contains("<th>trace</th><th>x</th><th>y</th><th>text</th><th>customdata</th>"));
}

#[test]
fn data_table_wraps_rows_in_head_and_body() {
    let rows = collect_rows(&[serde_json::from_value(json!({"name": "S1", "x": [1, 2], "y": [10, 20]})).unwrap()]);
    let html = data_table_html(&rows);
    assert!(html.contains("<title>Datos del gráfico</title>"));
    assert!(html.contains("<thead><tr><th>trace</th>"));
    let body = html.split("<tbody>").nth(1).unwrap();
    assert_eq!(body.matches("<tr>").count(), 2);
    assert!(body.contains("<td>S1</td><td>2</td><td>20</td><td></td><td></td>"));
}

#[test]
fn print_page_embeds_image_source() {
    let html = print_page_html("data:image/png;base64,AAAA");
    assert!(html.contains("<img src=\"data:image/png;base64,AAAA\""));
    assert!(html.contains("window.print()"));
}

#[test]
fn csv_single_empty_column_is_bare() {
    let rows = vec![Row::new().with("a", ""), Row::new().with("a", "x"), Row::new().with("a", Value::Null)];
    assert_eq!(rows_to_csv(&rows).unwrap(), "a\n\nx\n");
    let rows = vec![Row::new().with("a", "").with("b", "")];
    assert_eq!(rows_to_csv(&rows).unwrap(), "a,b\n,");
}

#[test]
fn csv_keeps_quoted_newlines_inside_fields() {
    let rows = vec![Row::new().with("label", "line1\nline2").with("n", 1)];
    assert_eq!(rows_to_csv(&rows).unwrap(), "label,n\n\"line1\nline2\",1");
}
