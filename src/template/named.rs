use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\(([^)]*)\)s|%%").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A document skeleton with `%(name)s` placeholders, filled from a field map.
/// `%%` stands for a single `%`; any other `%` is literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedTemplate {
    segments: Vec<Segment>,
}

impl NamedTemplate {
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&source[last..whole.start()]);
            match caps.get(1) {
                Some(name) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.as_str().to_string()));
                }
                None => literal.push('%'),
            }
            last = whole.end();
        }
        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        NamedTemplate { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names referenced by the template, in order of first use.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Unknown names expand to nothing.
    pub fn render(&self, fields: &HashMap<&str, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match fields.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => debug!(name = %name, "no value for placeholder"),
                },
            }
        }
        out
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn compile_mixed() {
        let t = NamedTemplate::compile("<title>%(title)s</title>");
        assert_eq!(
            t.segments(),
            &[
                Segment::Literal("<title>".into()),
                Segment::Placeholder("title".into()),
                Segment::Literal("</title>".into()),
            ]
        );
    }

    #[test]
    fn render_by_name() {
        let t = NamedTemplate::compile("%(link)s|%(title)s|%(link)s");
        let f = fields(&[("title", "T"), ("link", "L")]);
        assert_eq!(t.render(&f), "L|T|L");
    }

    #[test]
    fn unknown_name_is_empty() {
        let t = NamedTemplate::compile("[%(missing)s]");
        assert_eq!(t.render(&HashMap::new()), "[]");
    }

    #[test]
    fn percent_escapes() {
        let t = NamedTemplate::compile("100%% of %(x)s, 5% off, %(y)d");
        let f = fields(&[("x", "it")]);
        assert_eq!(t.render(&f), "100% of it, 5% off, %(y)d");
    }

    #[test]
    fn positional_syntax_is_literal() {
        let t = NamedTemplate::compile("{%1}");
        assert_eq!(t.segments(), &[Segment::Literal("{%1}".into())]);
    }

    #[test]
    fn names_in_first_use_order() {
        let t = NamedTemplate::compile("%(b)s %(a)s %(b)s");
        assert_eq!(t.names(), vec!["b", "a"]);
    }

    #[test]
    fn compile_is_idempotent() {
        let src = "<item>%(title)s %% %(desc)s</item>";
        assert_eq!(NamedTemplate::compile(src), NamedTemplate::compile(src));
    }
}
