//! Make an RSS 2.0 feed (or any flat text document) from a HTML, XML or
//! similar document.
//!
//! Items are located with a small delimiter language: literal text anchors
//! interleaved with `{*}` (skip) and `{%}` (capture). A main pattern picks the
//! region holding the items, then an item pattern is matched repeatedly inside
//! it. Each item's captured fields are expanded into `{%N}` templates and
//! placed into a `%(name)s` document skeleton.
//!
//! ```
//! use mkfeed::feed::{FeedMaker, FeedProperties, FeedTemplate, ItemProperties, Patterns};
//!
//! let maker = FeedMaker::new(
//!     Patterns::compile("{%}", "<i>{%}</i>"),
//!     FeedProperties::default(),
//!     ItemProperties::compile("{%1}", "", ""),
//!     FeedTemplate::new("%(items)s", "* %(title)s"),
//! );
//!
//! assert_eq!(maker.make_feed("<i>A</i><i>B</i>"), "* A\n* B");
//! ```

pub mod cli;
pub mod error;
pub mod extract;
pub mod feed;
pub mod pattern;
pub mod settings;
pub mod template;

pub use error::{Error, Result};
pub use extract::{extract, Record};
pub use feed::{Feed, FeedMaker};
pub use pattern::Pattern;
