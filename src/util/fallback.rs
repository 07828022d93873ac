use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{Author, Enclosure, Image, Link};

/// Returns the first candidate that is not its type's zero value.
///
/// The zero value is `T::default()`: `""` for strings, `None` for options,
/// `0` for numbers. If every candidate is zero, the zero value is returned.
///
/// # Examples
///
/// ```
/// use feedsmith::util::first_of;
///
/// assert_eq!(first_of(["", "id-42", "2024-01-01"]), "id-42");
/// assert_eq!(first_of([0, 0]), 0);
/// assert_eq!(first_of([None, Some(3), Some(4)]), Some(3));
/// ```
pub fn first_of<T, I>(candidates: I) -> T
where
    I: IntoIterator<Item = T>,
    T: Default + PartialEq,
{
    let zero = T::default();
    candidates
        .into_iter()
        .find(|candidate| *candidate != zero)
        .unwrap_or(zero)
}

/// Date layouts required by the supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    /// `02 Jan 06 15:04 UTC` (OPML).
    Rfc822,
    /// `Mon, 02 Jan 2006 15:04:05 UTC` (HTML).
    Rfc1123,
    /// `Mon, 02 Jan 2006 15:04:05 +0000` (RSS).
    Rfc1123Z,
    /// `2006-01-02T15:04:05Z` (Atom, JSON Feed).
    Rfc3339,
    /// `2006-01-02` (tag URIs).
    Date,
}

impl TimeLayout {
    pub fn format(self, time: &DateTime<Utc>) -> String {
        match self {
            TimeLayout::Rfc822 => time.format("%d %b %y %H:%M %Z").to_string(),
            TimeLayout::Rfc1123 => time.format("%a, %d %b %Y %H:%M:%S %Z").to_string(),
            TimeLayout::Rfc1123Z => time.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
            TimeLayout::Rfc3339 => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeLayout::Date => time.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Formats the first set timestamp with `layout`, or returns `""` when none is set.
///
/// Candidate order is the fallback precedence, so callers list the most
/// specific timestamp first. An unset timestamp never produces output.
pub fn any_time_format(layout: TimeLayout, times: &[Option<DateTime<Utc>>]) -> String {
    times
        .iter()
        .flatten()
        .next()
        .map(|time| layout.format(time))
        .unwrap_or_default()
}

pub fn valid_link(link: Option<&Link>) -> bool {
    link.is_some_and(|l| !l.href.is_empty())
}

/// The link's href when the link is present enough to render.
pub fn href_of(link: Option<&Link>) -> Option<&str> {
    link.filter(|l| valid_link(Some(*l))).map(|l| l.href.as_str())
}

/// An author is present when it has a name or an email.
pub fn valid_author(author: Option<&Author>) -> bool {
    author.is_some_and(|a| !a.name.is_empty() || !a.email.is_empty())
}

pub fn valid_image(image: Option<&Image>) -> bool {
    image.is_some_and(|i| !i.url.is_empty())
}

pub fn valid_enclosure(enclosure: Option<&Enclosure>) -> bool {
    enclosure.is_some_and(|e| !e.url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, day, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_first_of_strings() {
        assert_eq!(first_of(["a", "b"]), "a");
        assert_eq!(first_of(["", "b"]), "b");
        assert_eq!(first_of(["", ""]), "");
        assert_eq!(first_of(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_first_of_owned_strings() {
        let picked = first_of([String::new(), "x".to_string()]);
        assert_eq!(picked, "x");
    }

    #[test]
    fn test_layouts() {
        let time = t(2);
        assert_eq!(TimeLayout::Rfc822.format(&time), "02 Jan 06 15:04 UTC");
        assert_eq!(TimeLayout::Rfc1123.format(&time), "Mon, 02 Jan 2006 15:04:05 UTC");
        assert_eq!(TimeLayout::Rfc1123Z.format(&time), "Mon, 02 Jan 2006 15:04:05 +0000");
        assert_eq!(TimeLayout::Rfc3339.format(&time), "2006-01-02T15:04:05Z");
        assert_eq!(TimeLayout::Date.format(&time), "2006-01-02");
    }

    #[test]
    fn test_any_time_format_precedence() {
        let (updated, created) = (Some(t(3)), Some(t(2)));
        assert_eq!(
            any_time_format(TimeLayout::Date, &[updated, created]),
            "2006-01-03"
        );
        assert_eq!(
            any_time_format(TimeLayout::Date, &[None, created]),
            "2006-01-02"
        );
        assert_eq!(any_time_format(TimeLayout::Date, &[None, None]), "");
        assert_eq!(any_time_format(TimeLayout::Date, &[]), "");
    }

    #[test]
    fn test_valid_link() {
        assert!(!valid_link(None));
        assert!(!valid_link(Some(&Link::default())));
        assert!(!valid_link(Some(&Link::default().with_rel("self"))));
        assert!(valid_link(Some(&Link::new("http://x/"))));
    }

    #[test]
    fn test_href_of() {
        assert_eq!(href_of(None), None);
        assert_eq!(href_of(Some(&Link::default())), None);
        assert_eq!(href_of(Some(&Link::new("http://x/"))), Some("http://x/"));
    }

    #[test]
    fn test_valid_author() {
        assert!(!valid_author(None));
        assert!(!valid_author(Some(&Author::default())));
        assert!(valid_author(Some(&Author::new("Jane", ""))));
        assert!(valid_author(Some(&Author::new("", "jane@example.com"))));
    }

    #[test]
    fn test_valid_image_and_enclosure() {
        assert!(!valid_image(None));
        assert!(!valid_image(Some(&Image::new("", "logo"))));
        assert!(valid_image(Some(&Image::new("http://x/logo.png", ""))));

        assert!(!valid_enclosure(None));
        assert!(!valid_enclosure(Some(&Enclosure::default())));
        assert!(valid_enclosure(Some(&Enclosure::new("http://x/a.mp3", "", None))));
    }
}
