//! Human-readable HTML rendering of a feed.
//!
//! Unlike the structured formats there is no intermediate tree: the
//! [`HtmlWriter`] walks the feed and streams a standalone
//! `<!doctype html>` document straight into the sink.
//!
//! Item descriptions and contents are expected to already hold HTML and are
//! written unescaped. Everything else is escaped.

mod writer;

pub use writer::{Attrs, HtmlWriter};

use std::io::{self, Write};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::model::{Feed, Image, Item};
use crate::util::{
    any_time_format, author_display, first_of, href_of, starts_with_paragraph, valid_author,
    valid_enclosure, valid_image, valid_link, TimeLayout,
};
use crate::Render;

/// Marker linking to an item's source. Wordless, so it needs no translation.
const SOURCE_GLYPH: &str = " (\u{2197})";

/// HTML adapter over a borrowed [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Html<'a> {
    feed: &'a Feed,
}

impl<'a> Html<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Streams the whole document into `out`.
    ///
    /// On the first write failure nothing more is written and the error is
    /// returned; the partial output is not a valid document.
    pub fn write_html<W: Write>(&self, out: W) -> io::Result<()> {
        let feed = self.feed;
        let mut w = HtmlWriter::new(out);

        w.line("<!doctype html>");
        w.wrap_tag("html", &[], |w| {
            w.wrap_tag("head", &[], |w| write_head(w, feed));
            w.wrap_tag("body", &[], |w| write_body(w, feed));
        });

        tracing::debug!(
            format = "html",
            items = feed.items.len(),
            failed = w.failed(),
            "Wrote HTML document"
        );
        w.finish()
    }
}

impl Render for Html<'_> {
    fn write_to(&self, out: &mut dyn Write, _config: &RenderConfig) -> Result<()> {
        self.write_html(out)?;
        Ok(())
    }
}

fn write_head<W: Write>(w: &mut HtmlWriter<W>, feed: &Feed) {
    w.standalone_tag("meta", &[("charset", "utf-8")]);

    if !feed.title.is_empty() {
        w.tag("title", &feed.title, &[]);
    }

    if let Some(link) = feed.link.as_ref().filter(|l| valid_link(Some(*l))) {
        let rel = first_of([link.rel.as_str(), "author"]);
        w.standalone_tag("link", &[("rel", rel), ("href", link.href.as_str())]);
    }

    if valid_author(feed.author.as_ref()) {
        let author = author_display(feed.author.as_ref(), true);
        w.standalone_tag("meta", &[("name", "author"), ("content", author.as_str())]);
    }

    if !feed.description.is_empty() {
        w.standalone_tag(
            "meta",
            &[("name", "description"), ("content", feed.description.as_str())],
        );
    }
}

fn write_body<W: Write>(w: &mut HtmlWriter<W>, feed: &Feed) {
    if let Some(image) = feed.image.as_ref().filter(|i| valid_image(Some(*i))) {
        w.wrap_tag("p", &[], |w| write_image(w, image));
    }

    if !feed.title.is_empty() {
        w.tag("h1", &feed.title, &[]);
    }
    if !feed.subtitle.is_empty() {
        w.tag("h2", &feed.subtitle, &[]);
    }

    w.wrap_tag("ul", &[], |w| {
        for item in &feed.items {
            w.wrap_tag("li", &[], |w| write_item(w, item));
        }
    });

    let date = any_time_format(TimeLayout::Rfc1123, &[feed.updated, feed.created]);
    if !feed.copyright.is_empty() || !date.is_empty() {
        w.wrap_tag("p", &[], |w| {
            if !feed.copyright.is_empty() {
                w.text_line(&feed.copyright);
            }
            if !date.is_empty() {
                if !feed.copyright.is_empty() {
                    w.standalone_tag("br", &[]);
                }
                w.tag("small", &date, &[]);
            }
        });
    }
}

fn write_image<W: Write>(w: &mut HtmlWriter<W>, image: &Image) {
    w.maybe_wrap_tag(
        "a",
        !image.link.is_empty(),
        &[("href", image.link.as_str())],
        |w| {
            w.standalone_tag(
                "img",
                &[("src", image.url.as_str()), ("title", image.title.as_str())],
            )
        },
    );
}

fn write_item<W: Write>(w: &mut HtmlWriter<W>, item: &Item) {
    w.wrap_tag("p", &[], |w| {
        if !item.id.is_empty() {
            w.tag("a", "", &[("name", item.id.as_str())]);
        }

        // The date is shown once: either as the link text or below it
        let mut time = any_time_format(TimeLayout::Rfc1123, &[item.updated, item.created]);
        let title = first_of([item.title.as_str(), item.id.as_str(), time.as_str()]).to_string();
        if title == time {
            time.clear();
        }

        let href = href_of(item.link.as_ref()).unwrap_or("#");
        w.tag("a", &title, &[("href", href)]);

        if !time.is_empty() {
            w.standalone_tag("br", &[]);
            w.tag("small", &time, &[]);
        }
    });

    if let Some(enclosure) = item.enclosure.as_ref().filter(|e| valid_enclosure(Some(*e))) {
        w.wrap_tag("p", &[], |w| {
            w.standalone_tag("img", &[("src", enclosure.url.as_str())])
        });
    }

    if !item.description.is_empty() {
        let has_content = !item.content.is_empty();
        w.maybe_wrap_tag("p", !starts_with_paragraph(&item.description), &[], |w| {
            w.maybe_wrap_tag("em", has_content, &[], |w| w.line(&item.description));
        });
    }

    if !item.content.is_empty() {
        w.maybe_wrap_tag("p", !starts_with_paragraph(&item.content), &[], |w| {
            w.line(&item.content)
        });
    }

    let author = item.author.as_ref().filter(|a| valid_author(Some(*a)));
    let source = href_of(item.source.as_ref());
    if author.is_some() || source.is_some() {
        w.wrap_tag("p", &[], |w| {
            w.wrap_tag("cite", &[], |w| {
                if let Some(author) = author {
                    let name = author_display(Some(author), false);
                    if author.email.is_empty() {
                        w.text_line(&name);
                    } else {
                        let mailto = format!("mailto:{}", author.email);
                        w.tag("a", &name, &[("href", mailto.as_str())]);
                    }
                }
                if let Some(source) = source {
                    w.tag("a", SOURCE_GLYPH, &[("href", source)]);
                }
                w.standalone_tag("br", &[]);
            });
        });
    }
}
