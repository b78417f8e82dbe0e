use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::error::Result;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "mkfeed",
    version,
    about = "Make an RSS 2.0 feed from a HTML, XML or similar document. \
             Input is taken from stdin, and output goes to stdout."
)]
pub struct Cli {
    /// Pattern selecting the part of the input that holds the items [default: {%}]
    #[arg(long, value_name = "PATTERN")]
    pub pattern_main: Option<String>,
    /// Pattern matched repeatedly to find each item
    #[arg(long, value_name = "PATTERN")]
    pub pattern_item: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub feed_title: Option<String>,
    #[arg(long, value_name = "URL")]
    pub feed_link: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub feed_desc: Option<String>,
    /// Item title, with {%N} standing for the Nth captured field
    #[arg(long, value_name = "TEMPLATE")]
    pub item_title: Option<String>,
    #[arg(long, value_name = "TEMPLATE")]
    pub item_link: Option<String>,
    #[arg(long, value_name = "TEMPLATE")]
    pub item_desc: Option<String>,
    /// Document template file using %(title)s, %(link)s, %(desc)s and %(items)s
    #[arg(long, value_name = "FILE")]
    pub template_main: Option<PathBuf>,
    /// Item template file using %(title)s, %(link)s and %(desc)s
    #[arg(long, value_name = "FILE")]
    pub template_item: Option<PathBuf>,
    /// TOML file with default settings (MKFEED_* environment variables also apply)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print the extracted records as JSON instead of a feed
    #[arg(long)]
    pub records: bool,
}

impl Cli {
    /// Settings given on the command line, without fallbacks.
    pub fn settings(&self) -> Settings {
        Settings {
            pattern_main: self.pattern_main.clone(),
            pattern_item: self.pattern_item.clone(),
            feed_title: self.feed_title.clone(),
            feed_link: self.feed_link.clone(),
            feed_desc: self.feed_desc.clone(),
            item_title: self.item_title.clone(),
            item_link: self.item_link.clone(),
            item_desc: self.item_desc.clone(),
            template_main: self.template_main.clone(),
            template_item: self.template_item.clone(),
        }
    }
}

/// Read the whole document from `input` and write the feed (or the records)
/// to `output`.
pub fn run<R: Read, W: Write>(cli: &Cli, mut input: R, mut output: W) -> Result<()> {
    let settings = cli.settings().or(Settings::load(cli.config.as_deref())?);
    let maker = settings.into_maker()?;

    let mut source = String::new();
    input.read_to_string(&mut source)?;

    let feed = maker.find_items(&source);
    info!(bytes = source.len(), items = feed.records().len(), "extracted items");

    if cli.records {
        serde_json::to_writer_pretty(&mut output, feed.records())?;
        writeln!(output)?;
    } else {
        writeln!(output, "{}", feed.render())?;
    }
    output.flush()?;
    Ok(())
}

// ── Tests ──
