use std::sync::LazyLock;

use regex::Regex;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[*%]\}").unwrap());

/// Matches and discards the text up to the next literal.
pub const SKIP_MARKER: &str = "{*}";
/// Matches the text up to the next literal and keeps it as a field.
pub const CAPTURE_MARKER: &str = "{%}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    SkipWildcard,
    CaptureWildcard,
}

/// A compiled delimiter pattern such as `<li>{*}<a href="{%}">{%}</a>`.
///
/// Any string compiles. A pattern without markers is a pure delimiter and
/// never captures anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for m in MARKER_RE.find_iter(source) {
            push_literal(&mut segments, &source[last..m.start()]);
            segments.push(if m.as_str() == SKIP_MARKER {
                Segment::SkipWildcard
            } else {
                Segment::CaptureWildcard
            });
            last = m.end();
        }
        push_literal(&mut segments, &source[last..]);

        Pattern { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when at least one capture wildcard is present.
    pub fn captures(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::CaptureWildcard))
    }

    /// True when the pattern ends in a capture wildcard, i.e. the last field
    /// runs to the end of the text.
    pub fn captures_tail(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CaptureWildcard))
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::compile(source)
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
}

// ── Tests ──
