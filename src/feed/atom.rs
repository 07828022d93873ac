use std::io::Write;

use serde::Serialize;
use uuid::Uuid;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::model::{Author, Feed, Item};
use crate::util::{
    any_time_format, first_of, href_of, item_identifier, valid_author, valid_enclosure,
    valid_image, valid_link, TimeLayout,
};
use crate::Render;

use super::xml::write_xml;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// `<feed xmlns="http://www.w3.org/2005/Atom">` root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "feed")]
pub struct AtomDocument {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rights: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generator: String,
    #[serde(rename = "link", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<AtomLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AtomPerson>,
    #[serde(rename = "entry", skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<AtomEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AtomLink {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@rel", skip_serializing_if = "String::is_empty")]
    pub rel: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    #[serde(rename = "@length", skip_serializing_if = "String::is_empty")]
    pub length: String,
}

/// Atom person construct. `name` is required, so it falls back to the email.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AtomPerson {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl AtomPerson {
    fn from_author(author: Option<&Author>) -> Option<Self> {
        let author = author.filter(|a| valid_author(Some(*a)))?;
        Some(AtomPerson {
            name: first_of([author.name.as_str(), author.email.as_str()]).to_string(),
            uri: String::new(),
            email: author.email.clone(),
        })
    }
}

/// Text construct carrying HTML (`type="html"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AtomText {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "$text")]
    pub value: String,
}

impl AtomText {
    fn html(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| AtomText {
            kind: "html".to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AtomEntry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub published: String,
    #[serde(rename = "link", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<AtomLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AtomText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<AtomText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AtomPerson>,
}

impl AtomEntry {
    pub fn from_item(item: &Item) -> Self {
        let mut links = Vec::new();
        let mut link_rel = "";
        if let Some(link) = item.link.as_ref().filter(|l| valid_link(Some(*l))) {
            link_rel = link.rel.as_str();
            links.push(AtomLink {
                href: link.href.clone(),
                rel: first_of([link.rel.as_str(), "alternate"]).to_string(),
                media_type: link.media_type.clone(),
                length: link.length.clone(),
            });
        }

        // A link already marked as the enclosure is not repeated
        if let Some(enclosure) = item.enclosure.as_ref().filter(|e| valid_enclosure(Some(*e))) {
            if link_rel != "enclosure" {
                links.push(AtomLink {
                    href: enclosure.url.clone(),
                    rel: "enclosure".to_string(),
                    media_type: enclosure.mime_type.clone(),
                    length: enclosure.length.map(|l| l.to_string()).unwrap_or_default(),
                });
            }
        }

        AtomEntry {
            title: item.title.clone(),
            id: item_identifier(item),
            updated: any_time_format(TimeLayout::Rfc3339, &[item.updated, item.created]),
            published: any_time_format(TimeLayout::Rfc3339, &[item.created, item.updated]),
            links,
            summary: AtomText::html(&item.description),
            content: AtomText::html(&item.content),
            author: AtomPerson::from_author(item.author.as_ref()),
        }
    }
}

/// Atom 1.0 adapter over a borrowed [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Atom<'a> {
    feed: &'a Feed,
}

impl<'a> Atom<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Feed id: explicit id, then the link, then a name-based UUID.
    fn feed_id(&self) -> String {
        let feed = self.feed;
        let link = href_of(feed.link.as_ref()).unwrap_or_default();
        let id = first_of([feed.id.as_str(), link]);
        if !id.is_empty() {
            return id.to_string();
        }
        let seed = format!("{}|{}", feed.title, feed.description);
        format!("urn:uuid:{}", Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes()))
    }

    /// Builds the `<feed>` tree, entries in feed order.
    pub fn document(&self, config: &RenderConfig) -> AtomDocument {
        let feed = self.feed;

        let links = feed
            .link
            .as_ref()
            .filter(|l| valid_link(Some(*l)))
            .map(|l| AtomLink {
                href: l.href.clone(),
                rel: first_of([l.rel.as_str(), "alternate"]).to_string(),
                media_type: l.media_type.clone(),
                length: l.length.clone(),
            })
            .into_iter()
            .collect();

        let logo = feed
            .image
            .as_ref()
            .filter(|i| valid_image(Some(*i)))
            .map(|i| i.url.clone())
            .unwrap_or_default();

        let entries: Vec<_> = feed.items.iter().map(AtomEntry::from_item).collect();
        tracing::debug!(format = "atom", entries = entries.len(), "Built Atom feed");

        AtomDocument {
            xmlns: ATOM_NAMESPACE.to_string(),
            title: feed.title.clone(),
            id: self.feed_id(),
            updated: any_time_format(TimeLayout::Rfc3339, &[feed.updated, feed.created]),
            subtitle: first_of([feed.subtitle.as_str(), feed.description.as_str()]).to_string(),
            rights: feed.copyright.clone(),
            icon: String::new(),
            logo,
            generator: config.generator.clone().unwrap_or_default(),
            links,
            author: AtomPerson::from_author(feed.author.as_ref()),
            entries,
        }
    }
}

impl Render for Atom<'_> {
    fn write_to(&self, out: &mut dyn Write, config: &RenderConfig) -> Result<()> {
        write_xml(&self.document(config), out, config.xml_indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Enclosure, Image, Link};
    use chrono::{TimeZone, Utc};

    fn render(feed: &Feed) -> String {
        Atom::new(feed).render(&RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_feed_basics() {
        let mut feed = Feed::new("Blog", "http://x/", "About things");
        feed.copyright = "(c) me".to_string();
        feed.author = Some(Author::new("", "jane@example.com"));
        feed.image = Some(Image::new("http://x/logo.png", "Logo"));
        feed.updated = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let xml = render(&feed);
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<title>Blog</title>"));
        assert!(xml.contains("<id>http://x/</id>"));
        assert!(xml.contains("<updated>2024-01-02T03:04:05Z</updated>"));
        assert!(xml.contains("<subtitle>About things</subtitle>"));
        assert!(xml.contains("<rights>(c) me</rights>"));
        assert!(xml.contains("<logo>http://x/logo.png</logo>"));
        assert!(xml.contains(r#"<link href="http://x/" rel="alternate"/>"#));
        assert!(xml.contains("<name>jane@example.com</name>"));
        assert!(xml.contains("<email>jane@example.com</email>"));
    }

    #[test]
    fn test_feed_id_precedence() {
        let mut feed = Feed::new("Blog", "http://x/", "");
        feed.id = "urn:blog".to_string();
        assert_eq!(Atom::new(&feed).feed_id(), "urn:blog");

        feed.id.clear();
        assert_eq!(Atom::new(&feed).feed_id(), "http://x/");

        feed.link = None;
        let id = Atom::new(&feed).feed_id();
        assert!(id.starts_with("urn:uuid:"));
        assert_eq!(id, Atom::new(&feed).feed_id());
    }

    #[test]
    fn test_entry_dates() {
        let mut item = Item::new("Post", "http://x/1");
        item.created = Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        let entry = AtomEntry::from_item(&item);
        assert_eq!(entry.updated, "2024-01-02T00:00:00Z");
        assert_eq!(entry.published, "2024-01-02T00:00:00Z");

        item.updated = Some(Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap());
        let entry = AtomEntry::from_item(&item);
        assert_eq!(entry.updated, "2024-05-06T00:00:00Z");
        assert_eq!(entry.published, "2024-01-02T00:00:00Z");
    }

    #[test]
    fn test_entry_links_and_text() {
        let mut item = Item::new("Post", "http://x/1");
        item.description = "<b>short</b>".to_string();
        item.content = "long".to_string();
        item.enclosure = Some(Enclosure::new("http://x/a.mp3", "audio/mpeg", Some(99)));
        let entry = AtomEntry::from_item(&item);

        assert_eq!(entry.links.len(), 2);
        assert_eq!(entry.links[0].rel, "alternate");
        assert_eq!(entry.links[1].rel, "enclosure");
        assert_eq!(entry.links[1].length, "99");
        assert_eq!(entry.summary.as_ref().unwrap().kind, "html");

        let mut feed = Feed::default();
        feed.add(item);
        let xml = render(&feed);
        assert!(xml.contains(r#"<summary type="html">&lt;b"#));
        assert!(xml.contains(r#"<content type="html">long</content>"#));
        assert!(xml.contains(
            r#"<link href="http://x/a.mp3" rel="enclosure" type="audio/mpeg" length="99"/>"#
        ));
    }

    #[test]
    fn test_enclosure_link_not_repeated() {
        let mut item = Item::new("Post", "");
        item.link = Some(Link::new("http://x/a.mp3").with_rel("enclosure"));
        item.enclosure = Some(Enclosure::new("http://x/a.mp3", "audio/mpeg", None));
        let entry = AtomEntry::from_item(&item);
        assert_eq!(entry.links.len(), 1);
        assert_eq!(entry.links[0].rel, "enclosure");
    }

    #[test]
    fn test_missing_parts_omitted() {
        let mut feed = Feed::default();
        let mut item = Item::default();
        item.title = "Lonely".to_string();
        item.author = Some(Author::default());
        feed.add(item);

        let xml = render(&feed);
        for absent in ["<link", "<author>", "<updated>", "<published>", "<summary", "<content", "<logo>"] {
            assert!(!xml.contains(absent), "{absent} should be omitted:\n{xml}");
        }
        assert!(xml.contains("<id>urn:uuid:"));
    }
}
