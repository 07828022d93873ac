//! The format-agnostic feed that callers populate before rendering.
//!
//! Nothing here knows about RSS, Atom, OPML, JSON Feed or HTML. Optional
//! sub-objects are `Option`s and optional text is an empty `String`; the
//! adapters decide what "present" means through [`crate::util`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hyperlink. Only rendered when `href` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
    /// Media type of the linked resource (Atom `type`).
    pub media_type: String,
    /// Size in bytes of the linked resource (Atom `length`).
    pub length: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = rel.into();
        self
    }
}

/// The person responsible for a feed or an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Feed logo or banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub title: String,
    /// Where clicking the image should lead. Empty means "not a link".
    pub link: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }
}

/// A media file attached to an item (podcast episode, picture, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    pub url: String,
    /// Size in bytes, when known.
    pub length: Option<u64>,
    pub mime_type: String,
}

impl Enclosure {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>, length: Option<u64>) -> Self {
        Self {
            url: url.into(),
            length,
            mime_type: mime_type.into(),
        }
    }

    /// Whether the enclosure is a picture rather than an arbitrary attachment.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// One entry of a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub title: String,
    pub link: Option<Link>,
    /// Alternate link, typically the feed the item originally came from.
    pub source: Option<Link>,
    pub author: Option<Author>,
    /// Summary. May contain HTML markup.
    pub description: String,
    /// Full body. May contain HTML markup.
    pub content: String,
    pub id: String,
    /// RSS `guid@isPermaLink`; `None` leaves the attribute out.
    pub is_perma_link: Option<bool>,
    pub updated: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub enclosure: Option<Enclosure>,
}

impl Item {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: Some(Link::new(link)),
            ..Self::default()
        }
    }
}

/// The root document handed to every adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub title: String,
    pub link: Option<Link>,
    pub description: String,
    pub author: Option<Author>,
    pub updated: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub id: String,
    pub subtitle: String,
    pub items: Vec<Item>,
    pub copyright: String,
    pub image: Option<Image>,
}

impl Feed {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: Some(Link::new(link)),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Appends an item, keeping insertion order.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Reorders the items with `compare`. The sort is stable.
    pub fn sort_items_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        self.items.sort_by(compare);
    }
}
