//! Minimal CSV codec for the data files
//!
//! Handles the subset of RFC 4180 the staff and schedule files need:
//! comma separators, double-quoted fields with `""` escapes, and quoted
//! fields spanning line breaks. Both `\n` and `\r\n` endings are accepted.

use std::collections::HashMap;

/// Encode one record as a CSV line (with trailing `\n`)
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line.push('\n');
    line
}

#[inline]
fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

/// Parse a whole document into records. Blank lines are skipped.
pub fn parse_document(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Distinguishes `""` (one empty field) from a blank line
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }
    finish_record(&mut records, &mut record, &mut field, field_started);

    records
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
) {
    if !field_started && record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Column lookup built from a header row
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(header: &[String]) -> Self {
        let columns = header
            .iter()
            .enumerate()
            // Excel likes to prepend a BOM to the first column
            .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        Self { columns }
    }

    /// Names from `required` that the header lacks
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.columns.contains_key(*name))
            .collect()
    }

    /// Field value for `column`, if the header has it and the row is long enough
    pub fn get<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        self.columns
            .get(column)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
    }
}
