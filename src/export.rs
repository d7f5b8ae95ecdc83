// CSV export: header from the first record's key order, cells JSON-stringified.
// Deliberately not RFC 4180; the column/quoting behavior is a compatibility
// contract with the existing dashboard export.

use serde::Serialize;
use serde_json::Value;

/// Renders uniformly-shaped records as CSV text. First line is the
/// comma-joined field names of the first record; each following line is the
/// comma-joined JSON encoding of that record's values in the same order.
/// Fields missing from a later record render as `""`. Empty input yields an
/// empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<String> {
    let values: Vec<Value> = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let Some(Value::Object(first)) = values.first() else {
        if values.is_empty() {
            return Ok(String::new());
        }
        anyhow::bail!("csv export requires record-shaped rows");
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut lines = Vec::with_capacity(values.len() + 1);
    lines.push(headers.join(","));
    for row in &values {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                let cell = row.get(h).cloned().unwrap_or_else(|| Value::from(""));
                // serde_json::Value always serializes cleanly.
                serde_json::to_string(&cell).unwrap_or_default()
            })
            .collect();
        lines.push(cells.join(","));
    }
    Ok(lines.join("\n"))
}
