//! CSV rendering for attendance exports.
//!
//! Fields are quoted the way spreadsheet tools expect: a field containing the separator, a
//! double quote, whitespace, a line break or a backslash is wrapped in double quotes with
//! embedded quotes doubled. Every row, including the last, ends with `\n`.

use crate::{db::models::clock_events::ClockEventExportRow, timestamps};
use chrono::NaiveDateTime;

pub const EXPORT_HEADER: [&str; 4] = ["Employee Name", "Email", "Event Type", "Timestamp"];

fn needs_quotes(field: &str) -> bool {
    field
        .chars()
        .any(|c| matches!(c, ',' | '"' | ' ' | '\t' | '\r' | '\n' | '\\'))
}

fn push_field(out: &mut String, field: &str) {
    if needs_quotes(field) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Append one CSV row to `out`.
pub fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field.as_ref());
    }
    out.push('\n');
}

/// Render export rows under the standard header.
pub fn render_export(rows: &[ClockEventExportRow]) -> String {
    let mut out = String::new();
    push_row(&mut out, &EXPORT_HEADER);
    for row in rows {
        push_row(
            &mut out,
            &[
                row.name.clone(),
                row.email.clone(),
                row.event_type.to_string(),
                timestamps::format(&row.timestamp),
            ],
        );
    }
    out
}

/// Filename of a full export generated at `now`.
pub fn export_filename(now: &NaiveDateTime) -> String {
    format!("clockmate_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Filename of a single-employee export generated at `now`.
///
/// Spaces in the name become underscores; double quotes are dropped so the name can sit inside
/// a quoted `Content-Disposition` filename.
pub fn employee_export_filename(name: &str, now: &NaiveDateTime) -> String {
    let name: String = name.chars().filter(|c| *c != '"').map(|c| if c == ' ' { '_' } else { c }).collect();
    format!("{name}_logs_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
