use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::model::{Author, Feed, Item};
use crate::util::{
    any_time_format, first_of, href_of, item_identifier, valid_author, valid_enclosure,
    valid_image, TimeLayout,
};
use crate::Render;

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

/// Top-level JSON Feed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonFeed {
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub home_page_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub feed_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_comment: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub next_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub favicon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// JSON Feed 1.0 field, kept for older readers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<JsonAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<JsonAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    pub items: Vec<JsonItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonAuthor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avatar: String,
}

impl JsonAuthor {
    fn from_author(author: Option<&Author>) -> Option<Self> {
        let author = author.filter(|a| valid_author(Some(*a)))?;
        Some(JsonAuthor {
            name: first_of([author.name.as_str(), author.email.as_str()]).to_string(),
            url: if author.email.is_empty() {
                String::new()
            } else {
                format!("mailto:{}", author.email)
            },
            avatar: String::new(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonAttachment {
    pub url: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonItem {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_html: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub banner_image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_published: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<JsonAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<JsonAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<JsonAttachment>,
}

impl JsonItem {
    pub fn from_item(item: &Item) -> Self {
        let author = JsonAuthor::from_author(item.author.as_ref());
        let mut json = JsonItem {
            id: item_identifier(item),
            url: href_of(item.link.as_ref()).unwrap_or_default().to_string(),
            external_url: href_of(item.source.as_ref()).unwrap_or_default().to_string(),
            title: item.title.clone(),
            content_html: item.content.clone(),
            summary: item.description.clone(),
            date_published: any_time_format(TimeLayout::Rfc3339, &[item.created, item.updated]),
            date_modified: any_time_format(TimeLayout::Rfc3339, &[item.updated]),
            authors: author.iter().cloned().collect(),
            author,
            ..Self::default()
        };

        if let Some(enclosure) = item.enclosure.as_ref().filter(|e| valid_enclosure(Some(*e))) {
            if enclosure.is_image() {
                json.image = enclosure.url.clone();
            } else {
                json.attachments.push(JsonAttachment {
                    url: enclosure.url.clone(),
                    mime_type: first_of([enclosure.mime_type.as_str(), "application/octet-stream"])
                        .to_string(),
                    size_in_bytes: enclosure.length,
                    ..JsonAttachment::default()
                });
            }
        }
        json
    }
}

/// Formatter that writes `<`, `>`, `&`, U+2028 and U+2029 inside strings as
/// `\uXXXX` escapes, so markup never appears raw in the JSON text.
///
/// Layout is delegated to the wrapped formatter.
struct MarkupSafe<F>(F);

impl<F: Formatter> Formatter for MarkupSafe<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object_value(writer)
    }
}

/// JSON Feed 1.1 adapter over a borrowed [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Json<'a> {
    feed: &'a Feed,
}

impl<'a> Json<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Builds the JSON Feed object, items in feed order.
    pub fn document(&self, config: &RenderConfig) -> JsonFeed {
        let feed = self.feed;
        let author = JsonAuthor::from_author(feed.author.as_ref());
        let items: Vec<_> = feed.items.iter().map(JsonItem::from_item).collect();
        tracing::debug!(format = "json", items = items.len(), "Built JSON feed");

        JsonFeed {
            version: JSON_FEED_VERSION.to_string(),
            title: feed.title.clone(),
            home_page_url: href_of(feed.link.as_ref()).unwrap_or_default().to_string(),
            description: first_of([feed.description.as_str(), feed.subtitle.as_str()]).to_string(),
            icon: feed
                .image
                .as_ref()
                .filter(|i| valid_image(Some(*i)))
                .map(|i| i.url.clone())
                .unwrap_or_default(),
            language: config.language.clone().unwrap_or_default(),
            authors: author.iter().cloned().collect(),
            author,
            items,
            ..JsonFeed::default()
        }
    }
}

impl Render for Json<'_> {
    fn write_to(&self, out: &mut dyn Write, config: &RenderConfig) -> Result<()> {
        let document = self.document(config);
        let mut bytes = Vec::with_capacity(1024);
        if config.json_pretty {
            let formatter = MarkupSafe(PrettyFormatter::new());
            document.serialize(&mut Serializer::with_formatter(&mut bytes, formatter))?;
        } else {
            let formatter = MarkupSafe(CompactFormatter);
            document.serialize(&mut Serializer::with_formatter(&mut bytes, formatter))?;
        }
        out.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Enclosure, Image, Link};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn render(feed: &Feed) -> Value {
        let text = Json::new(feed).render(&RenderConfig::default()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_feed_fields() {
        let mut feed = Feed::new("Blog", "http://x/", "About things");
        feed.author = Some(Author::new("Jane", "jane@example.com"));
        feed.image = Some(Image::new("http://x/icon.png", ""));

        let json = render(&feed);
        assert_eq!(json["version"], JSON_FEED_VERSION);
        assert_eq!(json["title"], "Blog");
        assert_eq!(json["home_page_url"], "http://x/");
        assert_eq!(json["description"], "About things");
        assert_eq!(json["icon"], "http://x/icon.png");
        assert_eq!(json["author"]["name"], "Jane");
        assert_eq!(json["authors"][0]["url"], "mailto:jane@example.com");
        assert_eq!(json["items"], Value::Array(vec![]));
        assert!(json.get("language").is_none());
    }

    #[test]
    fn test_item_fields() {
        let mut item = Item::new("Post", "http://x/1");
        item.id = "post-1".to_string();
        item.source = Some(Link::new("http://origin/"));
        item.description = "short".to_string();
        item.content = "<p>long</p>".to_string();
        item.created = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let json = JsonItem::from_item(&item);
        assert_eq!(json.id, "post-1");
        assert_eq!(json.url, "http://x/1");
        assert_eq!(json.external_url, "http://origin/");
        assert_eq!(json.summary, "short");
        assert_eq!(json.content_html, "<p>long</p>");
        assert_eq!(json.date_published, "2024-01-02T03:04:05Z");
        assert_eq!(json.date_modified, "");
        assert!(json.author.is_none());
        assert!(json.authors.is_empty());
    }

    #[test]
    fn test_item_id_falls_back() {
        let mut item = Item::new("Post", "https://example.com/p/1");
        item.updated = Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(
            JsonItem::from_item(&item).id,
            "tag:example.com,2024-01-02:/p/1"
        );
    }

    #[test]
    fn test_enclosures() {
        let mut item = Item::new("Pic", "http://x/1");
        item.enclosure = Some(Enclosure::new("http://x/a.png", "image/png", None));
        let json = JsonItem::from_item(&item);
        assert_eq!(json.image, "http://x/a.png");
        assert!(json.attachments.is_empty());

        item.enclosure = Some(Enclosure::new("http://x/a.mp3", "audio/mpeg", Some(42)));
        let json = JsonItem::from_item(&item);
        assert_eq!(json.image, "");
        assert_eq!(json.attachments.len(), 1);
        assert_eq!(json.attachments[0].mime_type, "audio/mpeg");
        assert_eq!(json.attachments[0].size_in_bytes, Some(42));
    }

    #[test]
    fn test_compact_output() {
        let feed = Feed::new("Blog", "http://x/", "");
        let config = RenderConfig {
            json_pretty: false,
            ..RenderConfig::default()
        };
        let text = Json::new(&feed).render(&config).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with(r#"{"version":"https://jsonfeed.org/version/1.1","title":"Blog""#));
    }

    #[test]
    fn test_markup_characters_escaped_in_strings() {
        let mut feed = Feed::new("A < B & C", "http://x/?a=1&b=2", "");
        let mut item = Item::new("x <b> & y", "http://x/1");
        item.content = "<p>line\u{2028}break</p>".to_string();
        feed.add(item);

        for json_pretty in [true, false] {
            let config = RenderConfig {
                json_pretty,
                ..RenderConfig::default()
            };
            let text = Json::new(&feed).render(&config).unwrap();
            assert!(text.contains(r#""A \u003c B \u0026 C""#), "{text}");
            assert!(text.contains(r#""x \u003cb\u003e \u0026 y""#));
            assert!(text.contains(r#""\u003cp\u003eline\u2028break\u003c/p\u003e""#));
            assert!(!text.contains('<') && !text.contains('&'));

            let value: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value["title"], "A < B & C");
            assert_eq!(value["home_page_url"], "http://x/?a=1&b=2");
            assert_eq!(value["items"][0]["content_html"], "<p>line\u{2028}break</p>");
        }
    }

    #[test]
    fn test_pretty_output_uses_two_spaces() {
        let feed = Feed::new("Blog", "", "");
        let text = Json::new(&feed).render(&RenderConfig::default()).unwrap();
        assert!(text.contains("\n  \"title\": \"Blog\""));
        assert!(!text.contains("home_page_url"));
    }
}
