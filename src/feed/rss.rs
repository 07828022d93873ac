use std::io::Write;

use serde::Serialize;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::model::{Author, Feed, Item};
use crate::util::{
    any_time_format, first_of, href_of, valid_author, valid_enclosure, valid_image, TimeLayout,
};
use crate::Render;

use super::xml::write_xml;

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// `<rss version="2.0">` root wrapping the single channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "rss")]
pub struct RssDocument {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "@xmlns:content")]
    pub content_namespace: String,
    pub channel: RssChannel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssChannel {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub managing_editor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub web_master: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_build_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generator: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docs: String,
    /// Minutes the channel may be cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<RssImage>,
    #[serde(rename = "item", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RssItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RssImage {
    pub url: String,
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "content:encoded", skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<RssEnclosure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<RssGuid>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RssSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RssEnclosure {
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "@length")]
    pub length: u64,
    #[serde(rename = "@type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RssGuid {
    #[serde(rename = "@isPermaLink", skip_serializing_if = "Option::is_none")]
    pub is_perma_link: Option<bool>,
    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RssSource {
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "$text")]
    pub title: String,
}

/// `managingEditor`/`author` value: `email (name)`, or whichever is set.
fn rss_person(author: Option<&Author>) -> String {
    match author {
        Some(a) if valid_author(Some(a)) => {
            if !a.email.is_empty() && !a.name.is_empty() {
                format!("{} ({})", a.email, a.name)
            } else {
                first_of([a.email.as_str(), a.name.as_str()]).to_string()
            }
        }
        _ => String::new(),
    }
}

impl RssItem {
    pub fn from_item(item: &Item) -> Self {
        let mut rss = RssItem {
            title: item.title.clone(),
            link: href_of(item.link.as_ref()).unwrap_or_default().to_string(),
            description: item.description.clone(),
            content: item.content.clone(),
            author: rss_person(item.author.as_ref()),
            pub_date: any_time_format(TimeLayout::Rfc1123Z, &[item.created, item.updated]),
            ..Self::default()
        };

        if !item.id.is_empty() {
            rss.guid = Some(RssGuid {
                is_perma_link: item.is_perma_link,
                value: item.id.clone(),
            });
        }

        if let Some(source) = href_of(item.source.as_ref()) {
            rss.source = Some(RssSource {
                url: source.to_string(),
                title: source.to_string(),
            });
        }

        if let Some(enclosure) = item.enclosure.as_ref().filter(|e| valid_enclosure(Some(*e))) {
            if enclosure.mime_type.is_empty() {
                tracing::warn!(url = %enclosure.url, "Dropping RSS enclosure without MIME type");
            } else {
                rss.enclosure = Some(RssEnclosure {
                    url: enclosure.url.clone(),
                    length: enclosure.length.unwrap_or(0),
                    mime_type: enclosure.mime_type.clone(),
                });
            }
        }

        rss
    }
}

/// RSS 2.0 adapter over a borrowed [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Rss<'a> {
    feed: &'a Feed,
}

impl<'a> Rss<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Builds the `<rss>` tree, items in feed order.
    pub fn document(&self, config: &RenderConfig) -> RssDocument {
        let feed = self.feed;
        let link = href_of(feed.link.as_ref()).unwrap_or_default();

        let image = feed
            .image
            .as_ref()
            .filter(|i| valid_image(Some(*i)))
            .map(|i| RssImage {
                url: i.url.clone(),
                title: first_of([i.title.as_str(), feed.title.as_str()]).to_string(),
                link: first_of([i.link.as_str(), link]).to_string(),
                width: Some(i.width).filter(|w| *w > 0),
                height: Some(i.height).filter(|h| *h > 0),
            });

        let items: Vec<_> = feed.items.iter().map(RssItem::from_item).collect();
        tracing::debug!(format = "rss", items = items.len(), "Built RSS channel");

        RssDocument {
            version: "2.0".to_string(),
            content_namespace: CONTENT_NAMESPACE.to_string(),
            channel: RssChannel {
                title: feed.title.clone(),
                link: link.to_string(),
                description: first_of([feed.description.as_str(), feed.subtitle.as_str()])
                    .to_string(),
                language: config.language.clone().unwrap_or_default(),
                copyright: feed.copyright.clone(),
                managing_editor: rss_person(feed.author.as_ref()),
                pub_date: any_time_format(TimeLayout::Rfc1123Z, &[feed.created, feed.updated]),
                last_build_date: any_time_format(TimeLayout::Rfc1123Z, &[feed.updated]),
                generator: config.generator.clone().unwrap_or_default(),
                image,
                items,
                ..RssChannel::default()
            },
        }
    }
}

impl Render for Rss<'_> {
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
        Rss::new(feed).render(&RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_channel_basics() {
        let mut feed = Feed::new("Blog", "http://x/", "About things");
        feed.copyright = "(c) me".to_string();
        feed.author = Some(Author::new("Jane", "jane@example.com"));

        let xml = render(&feed);
        assert!(xml.contains(r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#));
        assert!(xml.contains("<title>Blog</title>"));
        assert!(xml.contains("<link>http://x/</link>"));
        assert!(xml.contains("<description>About things</description>"));
        assert!(xml.contains("<copyright>(c) me</copyright>"));
        assert!(xml.contains("<managingEditor>jane@example.com (Jane)</managingEditor>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_channel_dates() {
        let mut feed = Feed::new("Blog", "http://x/", "d");
        feed.created = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let channel = Rss::new(&feed).document(&RenderConfig::default()).channel;
        assert_eq!(channel.pub_date, "Tue, 02 Jan 2024 03:04:05 +0000");
        assert_eq!(channel.last_build_date, "");

        feed.updated = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        let channel = Rss::new(&feed).document(&RenderConfig::default()).channel;
        assert_eq!(channel.pub_date, "Tue, 02 Jan 2024 03:04:05 +0000");
        assert_eq!(channel.last_build_date, "Thu, 01 Feb 2024 00:00:00 +0000");
    }

    #[test]
    fn test_config_fields() {
        let feed = Feed::new("Blog", "http://x/", "d");
        let config = RenderConfig {
            generator: Some("feedsmith".to_string()),
            language: Some("en-us".to_string()),
            ..RenderConfig::default()
        };
        let xml = Rss::new(&feed).render(&config).unwrap();
        assert!(xml.contains("<generator>feedsmith</generator>"));
        assert!(xml.contains("<language>en-us</language>"));
    }

    #[test]
    fn test_item_fields() {
        let mut feed = Feed::new("Blog", "http://x/", "d");
        let mut item = Item::new("Post", "http://x/1");
        item.description = "Summary".to_string();
        item.content = "<p>Body</p>".to_string();
        item.id = "post-1".to_string();
        item.is_perma_link = Some(false);
        item.source = Some(Link::new("http://origin/feed.xml"));
        item.author = Some(Author::new("Jane", ""));
        item.enclosure = Some(Enclosure::new("http://x/ep.mp3", "audio/mpeg", Some(1234)));
        feed.add(item);

        let rss = Rss::new(&feed).document(&RenderConfig::default());
        let item = &rss.channel.items[0];
        assert_eq!(item.author, "Jane");
        assert_eq!(
            item.guid,
            Some(RssGuid {
                is_perma_link: Some(false),
                value: "post-1".to_string()
            })
        );

        let xml = render(&feed);
        assert!(xml.contains(r#"<guid isPermaLink="false">post-1</guid>"#));
        assert!(xml.contains("<content:encoded>&lt;p"));
        assert!(xml.contains(r#"<enclosure url="http://x/ep.mp3" length="1234" type="audio/mpeg"/>"#));
        assert!(xml.contains(r#"<source url="http://origin/feed.xml">"#));
    }

    #[test]
    fn test_item_pub_date_prefers_created() {
        let mut item = Item::new("Post", "http://x/1");
        item.created = Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        item.updated = Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
        assert_eq!(
            RssItem::from_item(&item).pub_date,
            "Tue, 02 Jan 2024 00:00:00 +0000"
        );

        item.created = None;
        assert_eq!(
            RssItem::from_item(&item).pub_date,
            "Mon, 04 Mar 2024 00:00:00 +0000"
        );
    }

    #[test]
    fn test_optional_parts_omitted() {
        let mut feed = Feed::default();
        let mut item = Item::new("Post", "");
        item.author = Some(Author::default());
        item.source = Some(Link::default());
        item.enclosure = Some(Enclosure::new("http://x/ep.mp3", "", None));
        feed.add(item);

        let xml = render(&feed);
        for absent in ["<link>", "<author>", "<source", "<enclosure", "<guid", "<pubDate>", "<image>"] {
            assert!(!xml.contains(absent), "{absent} should be omitted:\n{xml}");
        }
        assert!(xml.contains("<title>Post</title>"));
    }

    #[test]
    fn test_image_fallbacks() {
        let mut feed = Feed::new("Blog", "http://x/", "d");
        feed.image = Some(Image::new("http://x/logo.png", ""));
        let image = Rss::new(&feed)
            .document(&RenderConfig::default())
            .channel
            .image
            .unwrap();
        assert_eq!(image.title, "Blog");
        assert_eq!(image.link, "http://x/");
        assert_eq!(image.width, None);

        feed.image = Some(Image::new("", "no url"));
        assert!(Rss::new(&feed)
            .document(&RenderConfig::default())
            .channel
            .image
            .is_none());
    }

    #[test]
    fn test_description_falls_back_to_subtitle() {
        let mut feed = Feed::new("Blog", "http://x/", "");
        feed.subtitle = "Plays the blues".to_string();
        let channel = Rss::new(&feed).document(&RenderConfig::default()).channel;
        assert_eq!(channel.description, "Plays the blues");
    }
}
