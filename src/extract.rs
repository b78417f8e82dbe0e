use tracing::{debug, warn};

use crate::pattern::{Pattern, Segment};

/// Fields captured by one successful scan, in capture-wildcard order.
pub type Record = Vec<String>;

/// Scan `text` with `pattern` and return the records found, at most `limit`
/// of them when bounded.
///
/// Scanning stops at the end of the text, at the first attempt that captures
/// nothing, or at the first attempt whose literal anchors cannot all be found.
/// A failed attempt is discarded whole; fields captured before the missing
/// anchor are not returned.
pub fn extract(text: &str, pattern: &Pattern, limit: Option<usize>) -> Vec<Record> {
    let mut records = Vec::new();
    let mut cursor = 0;

    while cursor < text.len() && limit.map_or(true, |max| records.len() < max) {
        let start = cursor;
        let Some(record) = scan_once(text, pattern, &mut cursor) else {
            debug!(cursor, "anchor not found, stopping scan");
            break;
        };
        if record.is_empty() {
            break;
        }
        records.push(record);

        // Backstop: a kept record has always consumed a non-empty anchor or
        // the tail of the text.
        if cursor <= start {
            warn!(cursor, "pattern made no progress, stopping scan");
            break;
        }
    }

    debug!(records = records.len(), "extraction finished");
    records
}

/// One record attempt starting at `cursor`. The cursor only moves when every
/// literal was found.
fn scan_once(text: &str, pattern: &Pattern, cursor: &mut usize) -> Option<Record> {
    let mut pos = *cursor;
    let mut capturing = false;
    let mut record = Vec::new();

    for segment in pattern.segments() {
        match segment {
            Segment::Literal(anchor) => {
                let found = pos + text[pos..].find(anchor.as_str())?;
                if capturing {
                    record.push(text[pos..found].to_string());
                }
                pos = found + anchor.len();
            }
            Segment::SkipWildcard => capturing = false,
            Segment::CaptureWildcard => capturing = true,
        }
    }

    if pattern.captures_tail() {
        record.push(text[pos..].to_string());
        pos = text.len();
    }

    *cursor = pos;
    Some(record)
}

// ── Tests ──
