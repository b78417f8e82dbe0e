use std::num::NonZeroUsize;
use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{%(\d+)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// 1-based field index.
    Placeholder(NonZeroUsize),
}

/// A per-field template such as `https://example.com{%1}`, expanded against
/// the fields of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// `{%0}` and indices too large to represent are kept as literal text.
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&source[last..whole.start()]);
            match caps[1].parse::<NonZeroUsize>() {
                Ok(index) => {
                    flush(&mut segments, &mut literal);
                    segments.push(Segment::Placeholder(index));
                }
                Err(_) => literal.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        literal.push_str(&source[last..]);
        flush(&mut segments, &mut literal);

        Template { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholders past the end of `fields` expand to nothing.
    pub fn render<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(index) => {
                    if let Some(field) = fields.get(index.get() - 1) {
                        out.push_str(field.as_ref());
                    }
                }
            }
        }
        out
    }
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

// ── Tests ──
