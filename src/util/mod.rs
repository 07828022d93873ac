//! Helpers shared by every adapter and the HTML writer.
//!
//! These are the backbone of every fallback decision, so all formats go
//! through the same functions:
//!
//! - **Fallbacks**: [`first_of`] and [`any_time_format`] pick titles, dates and
//!   display strings from whatever generic data is present
//! - **Presence**: [`valid_link`], [`valid_author`], [`valid_image`] and
//!   [`valid_enclosure`] gate whether a sub-object is rendered at all
//! - **Text**: escaping and author display strings
//! - **Identity**: stable identifiers for items that do not carry one
//!
//! # Examples
//!
//! ```
//! use feedsmith::util::{any_time_format, first_of, TimeLayout};
//!
//! assert_eq!(first_of(["", "fallback", "later"]), "fallback");
//! assert_eq!(any_time_format(TimeLayout::Rfc3339, &[None, None]), "");
//! ```

mod fallback;
mod identity;
mod text;

pub use fallback::{
    any_time_format, first_of, href_of, valid_author, valid_enclosure, valid_image, valid_link,
    TimeLayout,
};
pub use identity::item_identifier;
pub use text::{author_display, escape_html, starts_with_paragraph};
