//! Format adapters for the structured syndication formats.
//!
//! Each adapter borrows a [`Feed`](crate::Feed) and builds a tree that
//! mirrors its format's markup, applying the shared fallback rules from
//! [`crate::util`]:
//!
//! - [`rss`] - RSS 2.0 channel with `content:encoded` bodies
//! - [`atom`] - Atom 1.0 feed and entries
//! - [`opml`] - OPML 2.0 outline of the items
//! - [`json`] - JSON Feed 1.1
//!
//! The XML trees are plain serde structs (attributes are `@`-prefixed,
//! empty optional fields are skipped) handed to quick-xml by [`xml`].
//!
//! # Example
//!
//! ```
//! use feedsmith::{Feed, Item, Opml, RenderConfig};
//! use feedsmith::feed::xml::to_xml;
//!
//! let mut feed = Feed::new("Blog", "http://x/", "");
//! feed.add(Item::new("Post", "http://x/1"));
//!
//! // Tweak the tree before serializing it
//! let mut doc = Opml::new(&feed).document();
//! doc.head.owner_id = "abcd1234".to_string();
//! let xml = to_xml(&doc, RenderConfig::default().xml_indent).unwrap();
//! assert!(xml.contains("<ownerId>abcd1234</ownerId>"));
//! ```

pub mod atom;
pub mod json;
pub mod opml;
pub mod rss;
pub mod xml;

pub use atom::{Atom, AtomDocument, AtomEntry};
pub use json::{Json, JsonFeed, JsonItem};
pub use opml::{Opml, OpmlDocument, OpmlOutline};
pub use rss::{Rss, RssDocument, RssItem};
