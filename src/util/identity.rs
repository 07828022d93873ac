use url::Url;
use uuid::Uuid;

use crate::model::Item;

use super::{any_time_format, TimeLayout};

/// Identifier for an item in formats that require one (Atom, JSON Feed).
///
/// Precedence:
/// 1. the item's own id
/// 2. a `tag:` URI built from the link host, the item date and the link path,
///    when the item has both a link and a timestamp
/// 3. a `urn:uuid:` derived from the item's text
///
/// The result is deterministic, so rendering the same item twice yields the
/// same identifier.
pub fn item_identifier(item: &Item) -> String {
    let id = item.id.trim();
    if !id.is_empty() {
        return id.to_string();
    }

    let href = item.link.as_ref().map(|l| l.href.as_str()).unwrap_or("");
    let date = any_time_format(TimeLayout::Date, &[item.updated, item.created]);
    if !href.is_empty() && !date.is_empty() {
        let (host, path) = match Url::parse(href) {
            Ok(url) => (url.host_str().unwrap_or("").to_string(), url.path().to_string()),
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "Unparseable item link, using it as tag authority");
                (href.to_string(), "/invalid.html".to_string())
            }
        };
        return format!("tag:{},{}:{}", host, date, path);
    }

    let seed = format!(
        "{}|{}|{}|{}|{}",
        href, item.title, item.description, item.content, date
    );
    format!("urn:uuid:{}", Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes()))
}
