//! Per-crew logbook of notable moments.
//!
//! Entries are stored and persisted as a single text line with `~` as the
//! field delimiter: `time~code~name~text`. The free-text field comes last so
//! it may contain anything except the delimiter itself; delimiters inside it
//! are replaced at construction.

use serde::{Deserialize, Serialize};

const DELIMITER: char = '~';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookEntry {
    /// Universal time of the moment, in seconds.
    pub universal_time: f64,
    /// Activity code that caused the entry.
    pub code: String,
    /// Crew member the entry belongs to.
    pub crew_name: String,
    /// Free-form text shown in the log.
    pub text: String,
}

impl LogbookEntry {
    pub fn new(
        universal_time: f64,
        code: impl Into<String>,
        crew_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            universal_time,
            code: sanitize(code.into()),
            crew_name: sanitize(crew_name.into()),
            text: sanitize(text.into()),
        }
    }

    /// Serialize to the single-line text form.
    pub fn as_line(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.universal_time, self.code, self.crew_name, self.text
        )
    }

    /// Parse the single-line text form. Returns None on a malformed line;
    /// the caller decides whether to skip or complain.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, DELIMITER);
        let universal_time: f64 = fields.next()?.parse().ok()?;
        let code = fields.next()?.to_string();
        let crew_name = fields.next()?.to_string();
        let text = fields.next()?.to_string();
        Some(Self {
            universal_time,
            code,
            crew_name,
            text,
        })
    }
}

fn sanitize(field: String) -> String {
    if field.contains(DELIMITER) {
        field.replace(DELIMITER, "-")
    } else {
        field
    }
}
