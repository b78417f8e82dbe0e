use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::feed::{
    FeedMaker, FeedProperties, FeedTemplate, ItemProperties, Patterns, DEFAULT_MAIN_PATTERN,
    RSS_ITEM_TEMPLATE, RSS_MAIN_TEMPLATE,
};

/// Environment variables are read as `MKFEED_<SETTING>`, e.g. `MKFEED_PATTERN_ITEM`.
pub const ENV_PREFIX: &str = "MKFEED";

/// One layer of settings. Layers are merged with [`Settings::or`] and
/// validated with [`Settings::into_maker`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pattern_main: Option<String>,
    pub pattern_item: Option<String>,
    pub feed_title: Option<String>,
    pub feed_link: Option<String>,
    pub feed_desc: Option<String>,
    pub item_title: Option<String>,
    pub item_link: Option<String>,
    pub item_desc: Option<String>,
    pub template_main: Option<PathBuf>,
    pub template_item: Option<PathBuf>,
}

impl Settings {
    /// Optional TOML file first, environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path));
        }
        Self::from_builder(builder.add_source(Environment::with_prefix(prefix)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Fill unset values from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            pattern_main: self.pattern_main.or(fallback.pattern_main),
            pattern_item: self.pattern_item.or(fallback.pattern_item),
            feed_title: self.feed_title.or(fallback.feed_title),
            feed_link: self.feed_link.or(fallback.feed_link),
            feed_desc: self.feed_desc.or(fallback.feed_desc),
            item_title: self.item_title.or(fallback.item_title),
            item_link: self.item_link.or(fallback.item_link),
            item_desc: self.item_desc.or(fallback.item_desc),
            template_main: self.template_main.or(fallback.template_main),
            template_item: self.template_item.or(fallback.template_item),
        }
    }

    pub fn into_maker(self) -> Result<FeedMaker> {
        let template = FeedTemplate::new(
            &read_template(self.template_main.as_deref(), RSS_MAIN_TEMPLATE)?,
            &read_template(self.template_item.as_deref(), RSS_ITEM_TEMPLATE)?,
        );

        let patterns = Patterns::compile(
            self.pattern_main.as_deref().unwrap_or(DEFAULT_MAIN_PATTERN),
            &require(self.pattern_item, "pattern-item")?,
        );
        let feed_prop = FeedProperties {
            title: require(self.feed_title, "feed-title")?,
            link: require(self.feed_link, "feed-link")?,
            desc: require(self.feed_desc, "feed-desc")?,
        };
        let item_prop = ItemProperties::compile(
            &require(self.item_title, "item-title")?,
            &require(self.item_link, "item-link")?,
            &require(self.item_desc, "item-desc")?,
        );

        Ok(FeedMaker::new(patterns, feed_prop, item_prop, template))
    }
}

fn require(value: Option<String>, flag: &'static str) -> Result<String> {
    value.ok_or(Error::MissingSetting(flag))
}

fn read_template(path: Option<&Path>, default: &str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::Template {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(default.to_string()),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    fn complete() -> Settings {
        Settings {
            pattern_item: Some("<i>{%}</i>".into()),
            feed_title: Some("T".into()),
            feed_link: Some("L".into()),
            feed_desc: Some("D".into()),
            item_title: Some("{%1}".into()),
            item_link: Some("{%1}".into()),
            item_desc: Some("{%1}".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn toml_layer() {
        let s = from_toml(
            r#"
            pattern_item = "<li>{%}</li>"
            feed_title = "News"
            template_main = "main.tmpl"
            "#,
        );
        assert_eq!(s.pattern_item.as_deref(), Some("<li>{%}</li>"));
        assert_eq!(s.feed_title.as_deref(), Some("News"));
        assert_eq!(s.template_main, Some(PathBuf::from("main.tmpl")));
        assert!(s.pattern_main.is_none());
    }

    #[test]
    fn empty_layer() {
        assert_eq!(from_toml(""), Settings::default());
    }

    #[test]
    fn earlier_layer_wins() {
        let cli = Settings {
            feed_title: Some("from cli".into()),
            ..Settings::default()
        };
        let file = Settings {
            feed_title: Some("from file".into()),
            feed_link: Some("https://example.com".into()),
            ..Settings::default()
        };
        let merged = cli.or(file);
        assert_eq!(merged.feed_title.as_deref(), Some("from cli"));
        assert_eq!(merged.feed_link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn environment_over_file_cli_over_both() {
        // Own prefix so other tests reading MKFEED_* are unaffected.
        let prefix = "MKFEED_LAYERS";
        let path = std::env::temp_dir().join(format!("mkfeed-layers-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "feed_title = \"from file\"\nfeed_link = \"https://file.example\"\n",
        )
        .unwrap();
        std::env::set_var("MKFEED_LAYERS_FEED_TITLE", "from env");
        std::env::set_var("MKFEED_LAYERS_PATTERN_ITEM", "<x>{%}</x>");

        let loaded = Settings::load_with_prefix(Some(&path), prefix);
        std::env::remove_var("MKFEED_LAYERS_FEED_TITLE");
        std::env::remove_var("MKFEED_LAYERS_PATTERN_ITEM");
        std::fs::remove_file(&path).unwrap();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.feed_title.as_deref(), Some("from env"));
        assert_eq!(loaded.pattern_item.as_deref(), Some("<x>{%}</x>"));
        assert_eq!(loaded.feed_link.as_deref(), Some("https://file.example"));

        let cli = Settings {
            feed_title: Some("from cli".into()),
            ..Settings::default()
        };
        let merged = cli.or(loaded);
        assert_eq!(merged.feed_title.as_deref(), Some("from cli"));
        assert_eq!(merged.pattern_item.as_deref(), Some("<x>{%}</x>"));
        assert_eq!(merged.feed_link.as_deref(), Some("https://file.example"));
    }

    #[test]
    fn missing_setting_named() {
        let s = Settings {
            item_desc: None,
            ..complete()
        };
        let err = s.into_maker().unwrap_err();
        assert!(matches!(err, Error::MissingSetting("item-desc")));
        assert_eq!(err.to_string(), "missing required setting: --item-desc");
    }

    #[test]
    fn main_pattern_defaults_to_whole_document() {
        let maker = complete().into_maker().unwrap();
        let feed = maker.find_items("<i>A</i><i>B</i>");
        assert_eq!(feed.records().len(), 2);
    }

    #[test]
    fn template_files_loaded() {
        let dir = std::env::temp_dir().join(format!("mkfeed-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let main = dir.join("main.tmpl");
        let item = dir.join("item.tmpl");
        std::fs::write(&main, "# %(title)s\n%(items)s").unwrap();
        std::fs::write(&item, "- %(title)s").unwrap();

        let s = Settings {
            template_main: Some(main),
            template_item: Some(item),
            ..complete()
        };
        let out = s.into_maker().unwrap().make_feed("<i>A</i><i>B</i>");
        assert_eq!(out, "# T\n- A\n- B");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_template_file() {
        let s = Settings {
            template_item: Some(PathBuf::from("/nonexistent/mkfeed/item.tmpl")),
            ..complete()
        };
        assert!(matches!(s.into_maker(), Err(Error::Template { .. })));
    }
}
