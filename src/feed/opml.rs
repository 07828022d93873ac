use std::io::Write;

use serde::Serialize;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::model::{Feed, Item};
use crate::util::{any_time_format, href_of, valid_author, TimeLayout};
use crate::Render;

use super::xml::write_xml;

/// An OPML 2.0 document: `<opml version="2.0">` with a head and a body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "opml")]
pub struct OpmlDocument {
    #[serde(rename = "@version")]
    pub version: String,
    pub head: OpmlHead,
    pub body: OpmlBody,
}

/// Document metadata. Every field is optional and omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpmlHead {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_modified: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner_email: String,
    /// Page that lets a reader contact the owner. Mirrors the owner email.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner_id: String,
    /// Location of the OPML format documentation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docs: String,
    /// Comma-separated line numbers of expanded headlines.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expansion_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert_scroll_state: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_right: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpmlBody {
    #[serde(rename = "outline", skip_serializing_if = "Vec::is_empty")]
    pub outlines: Vec<OpmlOutline>,
}

/// One `<outline>` node.
///
/// Two flavors share this shape: an inclusion outline (`type="link"`, uses
/// `url`) and a subscription-list outline (`type="rss"`, uses `title`,
/// `description`, `xml_url`, `html_url`, `language` and `version`).
/// Outlines nest through `children`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpmlOutline {
    #[serde(rename = "@text")]
    pub text: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(rename = "@isComment", skip_serializing_if = "Option::is_none")]
    pub is_comment: Option<bool>,
    #[serde(rename = "@isBreakpoint", skip_serializing_if = "Option::is_none")]
    pub is_breakpoint: Option<bool>,
    #[serde(rename = "@created", skip_serializing_if = "String::is_empty")]
    pub created: String,
    /// Comma-separated, slash-delimited category strings.
    #[serde(rename = "@category", skip_serializing_if = "String::is_empty")]
    pub category: String,

    #[serde(rename = "@url", skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(rename = "@title", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "@description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "@xmlUrl", skip_serializing_if = "String::is_empty")]
    pub xml_url: String,
    #[serde(rename = "@htmlUrl", skip_serializing_if = "String::is_empty")]
    pub html_url: String,
    #[serde(rename = "@language", skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// `RSS1`, `RSS` or `scriptingNews`.
    #[serde(rename = "@version", skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(rename = "outline", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OpmlOutline>,
}

impl OpmlOutline {
    /// Inclusion outline pointing at the item's page.
    ///
    /// The url prefers the item's source link over its own link; when both
    /// exist the link is kept as `htmlUrl`.
    pub fn inclusion(item: &Item) -> Self {
        let mut outline = OpmlOutline {
            text: item.title.clone(),
            kind: "link".to_string(),
            created: any_time_format(TimeLayout::Rfc822, &[item.created, item.updated]),
            ..Self::default()
        };

        let link = href_of(item.link.as_ref());
        if let Some(source) = href_of(item.source.as_ref()) {
            outline.url = source.to_string();
            if let Some(link) = link {
                outline.html_url = link.to_string();
            }
        } else if let Some(link) = link {
            outline.url = link.to_string();
        }
        outline
    }

    /// Subscription-list outline treating the item as a pointer to another feed.
    ///
    /// `xmlUrl` prefers the source link; when both exist the link becomes
    /// `htmlUrl`.
    pub fn subscription(item: &Item) -> Self {
        let mut outline = OpmlOutline {
            text: item.title.clone(),
            kind: "rss".to_string(),
            created: any_time_format(TimeLayout::Rfc822, &[item.created, item.updated]),
            title: item.title.clone(),
            description: item.description.clone(),
            ..Self::default()
        };

        let link = href_of(item.link.as_ref());
        if let Some(source) = href_of(item.source.as_ref()) {
            outline.xml_url = source.to_string();
            if let Some(link) = link {
                outline.html_url = link.to_string();
            }
        } else if let Some(link) = link {
            outline.xml_url = link.to_string();
        }
        outline
    }

    /// Appends a nested outline.
    pub fn push(&mut self, child: OpmlOutline) {
        self.children.push(child);
    }
}

/// OPML adapter over a borrowed [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Opml<'a> {
    feed: &'a Feed,
}

impl<'a> Opml<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Builds the OPML tree. Every item becomes an inclusion outline, in order.
    pub fn document(&self) -> OpmlDocument {
        let feed = self.feed;
        let mut head = OpmlHead {
            title: feed.title.clone(),
            date_created: any_time_format(TimeLayout::Rfc822, &[feed.created, feed.updated]),
            // Modification date never falls back to the creation date
            date_modified: any_time_format(TimeLayout::Rfc822, &[feed.updated]),
            ..OpmlHead::default()
        };

        if let Some(author) = feed.author.as_ref().filter(|a| valid_author(Some(*a))) {
            head.owner_name = author.name.clone();
            head.owner_email = author.email.clone();
            head.owner_id = author.email.clone();
        }

        let outlines: Vec<_> = feed.items.iter().map(OpmlOutline::inclusion).collect();
        tracing::debug!(format = "opml", outlines = outlines.len(), "Built OPML document");

        OpmlDocument {
            version: "2.0".to_string(),
            head,
            body: OpmlBody { outlines },
        }
    }
}

impl Render for Opml<'_> {
    fn write_to(&self, out: &mut dyn Write, config: &RenderConfig) -> Result<()> {
        write_xml(&self.document(), out, config.xml_indent)
    }
}
