//! Two template dialects share the same literal/placeholder shape:
//! `{%N}` picks the Nth captured field of a record, `%(name)s` picks a named
//! value when assembling the document.

pub mod named;
pub mod positional;

pub use named::NamedTemplate;
pub use positional::Template;
