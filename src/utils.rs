use uuid::Uuid;

use crate::types::HeaderTableRow;

pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a `--header` flag value of the form "Name: Value".
///
/// Used as a clap value parser; returns an error string describing what is
/// wrong with the input so clap can surface it directly.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("header cannot be empty".to_string());
    }

    let Some((name, value)) = raw.split_once(':') else {
        return Err(format!("invalid header '{}': expected 'Name: Value'", raw));
    };

    let name = name.trim();
    let value = value.trim();

    if name.is_empty() {
        return Err(format!("invalid header '{}': empty header name", raw));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("invalid header name '{}'", name));
    }

    Ok((name.to_string(), value.to_string()))
}

pub fn sort_header_rows(rows: &mut Vec<HeaderTableRow>) {
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}
