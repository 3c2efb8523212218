// File: crates/dashboard-core/src/export.rs
// Summary: Row serializers: CSV, spreadsheet-compatible HTML (.xls), on-screen table and print page.

use thiserror::Error;

use crate::rows::{header, Row};
use crate::text::escape_html;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(String),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Title of the on-screen data table page.
pub const TABLE_TITLE: &str = "Datos del gráfico";

const TABLE_STYLE: &str = "body{font-family:Arial, sans-serif;padding:12px;}\
table{border-collapse:collapse;width:100%;}\
th,td{border:1px solid #ccc;padding:6px;text-align:left;}\
thead{background:#f5f5f5;}";

/// Comma-separated text; header = keys of the first row (or the default
/// header), quoting only where needed, no trailing newline.
pub fn rows_to_csv(rows: &[Row]) -> Result<String, ExportError> {
    let columns = header(rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(&columns)?);
    for row in rows {
        let cells: Vec<String> = columns.iter().map(|c| row.cell(c)).collect();
        lines.push(csv_line(&cells)?);
    }
    Ok(lines.join("\n"))
}

// One record without its terminator. An all-empty record is bare delimiters,
// so a lone empty field is an empty line rather than `""`.
fn csv_line(fields: &[String]) -> Result<String, ExportError> {
    if fields.iter().all(String::is_empty) {
        return Ok(",".repeat(fields.len().saturating_sub(1)));
    }
    let mut wtr = csv::WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(fields)?;
    let bytes = wtr.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    let mut line = String::from_utf8(bytes)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Minimal HTML document with one table, importable by spreadsheet
/// applications under an `.xls` name.
pub fn rows_to_xls(rows: &[Row]) -> String {
    let (head, body) = table_parts(rows);
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head><body><table>{head}{body}</table></body></html>"
    )
}

/// Human-readable page showing the same table.
pub fn data_table_html(rows: &[Row]) -> String {
    let (head, body) = table_parts(rows);
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>{TABLE_TITLE}</title>\
<style>{TABLE_STYLE}</style></head><body><h3>{TABLE_TITLE}</h3>\
<table><thead>{head}</thead><tbody>{body}</tbody></table></body></html>"
    )
}

/// Print-ready page around a captured image; prints and closes once loaded.
pub fn print_page_html(image_src: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Imprimir Gráfico</title>\n<style>\n\
body {{ margin: 0; padding: 20px; display: flex; justify-content: center; align-items: center; min-height: 100vh; }}\n\
img {{ max-width: 100%; height: auto; }}\n\
@media print {{ body {{ padding: 0; }} }}\n\
</style>\n</head>\n<body>\n\
<img src=\"{}\" alt=\"Gráfico\" onload=\"window.print(); window.close();\">\n\
</body>\n</html>\n",
        escape_html(image_src)
    )
}

// Header row and body rows; cells are escaped.
fn table_parts(rows: &[Row]) -> (String, String) {
    let columns = header(rows);
    let head = format!(
        "<tr>{}</tr>",
        columns.iter().map(|h| format!("<th>{}</th>", escape_html(h))).collect::<String>()
    );
    let body = rows
        .iter()
        .map(|row| {
            let cells: String = columns
                .iter()
                .map(|c| format!("<td>{}</td>", escape_html(&row.cell(c))))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect::<String>();
    (head, body)
}
