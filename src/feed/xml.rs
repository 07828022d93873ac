use std::io::Write;

use quick_xml::se::Serializer;
use serde::Serialize;

use crate::error::{FeedError, Result};

/// Declaration prepended to every XML document.
pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serializes a format tree to an XML document string.
///
/// Trees describe attributes with `@`-prefixed field names and omit empty
/// optional fields through `skip_serializing_if`, so no custom hooks are
/// needed here. `indent` is the number of spaces per level; 0 writes the
/// document on one line after the declaration.
pub fn to_xml<T: Serialize>(tree: &T, indent: usize) -> Result<String> {
    let mut out = String::with_capacity(1024);
    out.push_str(XML_HEADER);
    out.push('\n');

    let mut ser = Serializer::new(&mut out);
    if indent > 0 {
        ser.indent(' ', indent);
    }
    tree.serialize(ser)
        .map_err(|e| FeedError::Xml(e.to_string()))?;

    Ok(out)
}

/// Serializes a format tree and writes it to `out`.
pub fn write_xml<T: Serialize>(tree: &T, out: &mut dyn Write, indent: usize) -> Result<()> {
    let xml = to_xml(tree, indent)?;
    out.write_all(xml.as_bytes())?;
    Ok(())
}
