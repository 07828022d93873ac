//! Render one generic, syndication-agnostic feed into the formats readers
//! actually consume.
//!
//! Callers populate a [`Feed`] with [`Item`]s and ask for a serialized
//! representation:
//!
//! - **RSS 2.0** via [`Rss`]
//! - **Atom 1.0** via [`Atom`]
//! - **OPML 2.0** via [`Opml`]
//! - **JSON Feed 1.1** via [`Json`]
//! - **HTML** via [`Html`], a streaming writer that needs no intermediate tree
//!
//! The structured formats first build a format-specific tree (for example
//! [`RssDocument`]) that callers may tweak before serializing it themselves.
//!
//! # Example
//!
//! ```
//! use feedsmith::{Author, Feed, Format, Item, Link};
//!
//! let mut feed = Feed::new("jmoiron.net blog", "http://jmoiron.net/blog", "tech and footie");
//! feed.author = Some(Author::new("Jason Moiron", "jmoiron@jmoiron.net"));
//! feed.add(Item::new("Limiting Concurrency", "http://jmoiron.net/blog/limiting-concurrency/"));
//!
//! let rss = feed.to_rss().unwrap();
//! assert!(rss.contains("<title>Limiting Concurrency</title>"));
//!
//! let html = feed.render(Format::Html).unwrap();
//! assert!(html.starts_with("<!doctype html>"));
//! ```

pub mod config;
mod error;
pub mod feed;
pub mod html;
mod model;
pub mod util;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use config::{ConfigError, RenderConfig};
pub use error::{FeedError, Result};
pub use feed::{
    Atom, AtomDocument, Json, JsonFeed, Opml, OpmlDocument, OpmlOutline, Rss, RssDocument,
};
pub use html::Html;
pub use model::{Author, Enclosure, Feed, Image, Item, Link};

/// Shared capability of every output adapter: turn the borrowed feed into text.
pub trait Render {
    /// Streams the rendered document into `out`.
    fn write_to(&self, out: &mut dyn Write, config: &RenderConfig) -> Result<()>;

    /// Renders the document into a `String`.
    fn render(&self, config: &RenderConfig) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, config)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Output formats a [`Feed`] can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Rss,
    Atom,
    Opml,
    Json,
    Html,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Rss,
        Format::Atom,
        Format::Opml,
        Format::Json,
        Format::Html,
    ];

    /// MIME type to serve the rendered document with.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Rss => "application/rss+xml",
            Format::Atom => "application/atom+xml",
            Format::Opml => "text/x-opml",
            Format::Json => "application/feed+json",
            Format::Html => "text/html; charset=utf-8",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Rss => "rss",
            Format::Atom => "atom",
            Format::Opml => "opml",
            Format::Json => "json",
            Format::Html => "html",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Rss => "rss",
            Format::Atom => "atom",
            Format::Opml => "opml",
            Format::Json => "json",
            Format::Html => "html",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown feed format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rss" | "rss2" => Ok(Format::Rss),
            "atom" => Ok(Format::Atom),
            "opml" => Ok(Format::Opml),
            "json" | "jsonfeed" => Ok(Format::Json),
            "html" | "htm" => Ok(Format::Html),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl Feed {
    /// Renders the feed in `format` with the default configuration.
    pub fn render(&self, format: Format) -> Result<String> {
        self.render_with(format, &RenderConfig::default())
    }

    /// Renders the feed in `format` with an explicit configuration.
    pub fn render_with(&self, format: Format, config: &RenderConfig) -> Result<String> {
        match format {
            Format::Rss => Rss::new(self).render(config),
            Format::Atom => Atom::new(self).render(config),
            Format::Opml => Opml::new(self).render(config),
            Format::Json => Json::new(self).render(config),
            Format::Html => Html::new(self).render(config),
        }
    }

    /// Streams the feed in `format` into `out`.
    pub fn write(&self, format: Format, out: &mut dyn Write, config: &RenderConfig) -> Result<()> {
        match format {
            Format::Rss => Rss::new(self).write_to(out, config),
            Format::Atom => Atom::new(self).write_to(out, config),
            Format::Opml => Opml::new(self).write_to(out, config),
            Format::Json => Json::new(self).write_to(out, config),
            Format::Html => Html::new(self).write_to(out, config),
        }
    }

    pub fn to_rss(&self) -> Result<String> {
        self.render(Format::Rss)
    }

    pub fn to_atom(&self) -> Result<String> {
        self.render(Format::Atom)
    }

    pub fn to_opml(&self) -> Result<String> {
        self.render(Format::Opml)
    }

    pub fn to_json(&self) -> Result<String> {
        self.render(Format::Json)
    }

    pub fn to_html(&self) -> Result<String> {
        self.render(Format::Html)
    }
}
