use std::borrow::Cow;

use crate::model::Author;

use super::first_of;

/// Escapes `<`, `>`, `&`, `'` and `"` for use in HTML text and attribute values.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use feedsmith::util::escape_html;
///
/// assert_eq!(escape_html("Fish & <Chips>"), "Fish &amp; &lt;Chips&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Display string for an author.
///
/// With both a name and an email, `combine` yields `"Name (email)"` and
/// otherwise just the name. With only one of them, that one is returned.
pub fn author_display(author: Option<&Author>, combine: bool) -> String {
    let Some(author) = author else {
        return String::new();
    };

    if !author.name.is_empty() && !author.email.is_empty() {
        if combine {
            format!("{} ({})", author.name, author.email)
        } else {
            author.name.clone()
        }
    } else {
        first_of([author.name.as_str(), author.email.as_str()]).to_string()
    }
}

/// Whether a markup fragment already opens with a paragraph tag.
pub fn starts_with_paragraph(markup: &str) -> bool {
    markup.starts_with("<p>")
}
