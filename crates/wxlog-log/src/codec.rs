//! Comma-delimited text encoding
//!
//! Fields containing a delimiter, quote or line break are quoted, with
//! embedded quotes doubled. The parser accepts `\n` and `\r\n` line ends.

use crate::{LogError, LogResult};
use std::borrow::Cow;
use std::mem;

/// Parsed row with the 1-based line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join fields into one line, without the terminator
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split text into rows. Blank lines are skipped.
pub fn parse_rows(text: &str) -> LogResult<Vec<Row>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut has_content = false;
    let mut line = 1;
    let mut row_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                has_content = true;
            }
            ',' => {
                fields.push(mem::take(&mut field));
                has_content = true;
            }
            '\r' => {}
            '\n' => {
                if has_content {
                    fields.push(mem::take(&mut field));
                    rows.push(Row {
                        line: row_line,
                        fields: mem::take(&mut fields),
                    });
                }
                has_content = false;
                line += 1;
                row_line = line;
            }
            _ => {
                field.push(c);
                has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(LogError::MalformedRecord {
            line: row_line,
            reason: "unterminated quoted field".into(),
        });
    }
    if has_content {
        fields.push(field);
        rows.push(Row {
            line: row_line,
            fields,
        });
    }

    Ok(rows)
}
