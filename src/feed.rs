use std::collections::HashMap;

use tracing::{debug, warn};

use crate::extract::{extract, Record};
use crate::pattern::Pattern;
use crate::template::{NamedTemplate, Template};

/// Outer pattern used when none is given: the whole document is the region.
pub const DEFAULT_MAIN_PATTERN: &str = "{%}";

pub const RSS_MAIN_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
 <channel>
  <title>%(title)s</title>
  <link>%(link)s</link>
  <description><![CDATA[%(desc)s]]></description>
%(items)s
 </channel>
</rss>"#;

pub const RSS_ITEM_TEMPLATE: &str = r#"  <item>
   <title>%(title)s</title>
   <link>%(link)s</link>
   <description><![CDATA[%(desc)s]]></description>
  </item>"#;

const ITEM_FIELDS: &[&str] = &["title", "link", "desc"];
const MAIN_FIELDS: &[&str] = &["title", "link", "desc", "items"];

/// Document skeleton: `main` receives `title`, `link`, `desc` and `items`;
/// `item` receives the rendered `title`, `link` and `desc` of one record.
#[derive(Debug, Clone)]
pub struct FeedTemplate {
    pub main: NamedTemplate,
    pub item: NamedTemplate,
}

impl FeedTemplate {
    pub fn new(main: &str, item: &str) -> Self {
        FeedTemplate {
            main: NamedTemplate::compile(main),
            item: NamedTemplate::compile(item),
        }
    }

    pub fn rss() -> Self {
        FeedTemplate::new(RSS_MAIN_TEMPLATE, RSS_ITEM_TEMPLATE)
    }

    /// Placeholder names that no run will ever fill.
    pub fn unknown_names(&self) -> Vec<&str> {
        let main = self
            .main
            .names()
            .into_iter()
            .filter(|n| !MAIN_FIELDS.iter().any(|f| f == n));
        let item = self
            .item
            .names()
            .into_iter()
            .filter(|n| !ITEM_FIELDS.iter().any(|f| f == n));
        main.chain(item).collect()
    }
}

impl Default for FeedTemplate {
    fn default() -> Self {
        FeedTemplate::rss()
    }
}

#[derive(Debug, Clone)]
pub struct Patterns {
    pub main: Pattern,
    pub item: Pattern,
}

impl Patterns {
    pub fn compile(main: &str, item: &str) -> Self {
        Patterns {
            main: Pattern::compile(main),
            item: Pattern::compile(item),
        }
    }
}

/// Channel-level values, inserted into the document as given.
#[derive(Debug, Clone, Default)]
pub struct FeedProperties {
    pub title: String,
    pub link: String,
    pub desc: String,
}

/// Per-item templates, expanded against each record's fields.
#[derive(Debug, Clone, Default)]
pub struct ItemProperties {
    pub title: Template,
    pub link: Template,
    pub desc: Template,
}

impl ItemProperties {
    pub fn compile(title: &str, link: &str, desc: &str) -> Self {
        ItemProperties {
            title: Template::compile(title),
            link: Template::compile(link),
            desc: Template::compile(desc),
        }
    }

    fn expand(&self, record: &[String]) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", self.title.render(record)),
            ("link", self.link.render(record)),
            ("desc", self.desc.render(record)),
        ])
    }
}

/// Everything one run needs, apart from the source text.
#[derive(Debug, Clone)]
pub struct FeedMaker {
    patterns: Patterns,
    feed_prop: FeedProperties,
    item_prop: ItemProperties,
    template: FeedTemplate,
}

impl FeedMaker {
    pub fn new(
        patterns: Patterns,
        feed_prop: FeedProperties,
        item_prop: ItemProperties,
        template: FeedTemplate,
    ) -> Self {
        FeedMaker {
            patterns,
            feed_prop,
            item_prop,
            template,
        }
    }

    /// Two-stage scan: the main pattern isolates the region holding the
    /// items, then the item pattern is repeated inside that region.
    pub fn find_items(&self, source: &str) -> Feed<'_> {
        if !self.patterns.item.captures() {
            warn!("item pattern has no capture marker, no items will be found");
        }
        for name in self.template.unknown_names() {
            warn!(name, "template placeholder is never filled");
        }
        let region = extract(source, &self.patterns.main, Some(1));
        let records = match region.first().and_then(|r| r.first()) {
            Some(body) => {
                debug!(region_len = body.len(), "main pattern matched");
                extract(body, &self.patterns.item, None)
            }
            None => {
                debug!("main pattern matched nothing");
                Vec::new()
            }
        };
        debug!(items = records.len(), "item pattern finished");

        Feed {
            maker: self,
            records,
        }
    }

    /// Render one record through the item templates and the item skeleton.
    pub fn make_item(&self, record: &[String]) -> String {
        self.template.item.render(&self.item_prop.expand(record))
    }

    /// Extract and render in one call.
    pub fn make_feed(&self, source: &str) -> String {
        self.find_items(source).render()
    }
}

/// Records found by one run, tied to the maker that found them.
#[derive(Debug)]
pub struct Feed<'a> {
    maker: &'a FeedMaker,
    records: Vec<Record>,
}

impl Feed<'_> {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn render(&self) -> String {
        let items = self
            .records
            .iter()
            .map(|r| self.maker.make_item(r))
            .collect::<Vec<_>>()
            .join("\n");

        let feed = &self.maker.feed_prop;
        let fields = HashMap::from([
            ("items", items),
            ("title", feed.title.clone()),
            ("link", feed.link.clone()),
            ("desc", feed.desc.clone()),
        ]);
        self.maker.template.main.render(&fields)
    }
}

// ── Tests ──
