use std::io::{self, Write};

use crate::util::escape_html;

const INDENT: &str = "    ";
const NEWLINE: &str = "\n";

/// Attribute list as `(name, value)` pairs. Pairs with an empty value are skipped.
pub type Attrs<'a> = &'a [(&'a str, &'a str)];

/// Streaming HTML generator with a sticky error.
///
/// Every primitive writes straight to the sink. The first I/O failure is
/// recorded and every later call becomes a no-op, so the sink never sees
/// another write after it failed. [`HtmlWriter::finish`] returns the
/// recorded error.
///
/// Nesting is composed with [`HtmlWriter::wrap_tag`], which runs a callback
/// one indentation level deeper instead of building a tree.
pub struct HtmlWriter<W: Write> {
    out: W,
    err: Option<io::Error>,
    depth: usize,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            err: None,
            depth: 0,
        }
    }

    /// Whether a write has already failed.
    pub fn failed(&self) -> bool {
        self.err.is_some()
    }

    /// Returns the first write error, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Writes `s` verbatim.
    ///
    /// Short writes are continued, but any error ends the document, including
    /// `Interrupted`: a failed call is never repeated.
    pub fn raw(&mut self, s: &str) {
        if self.err.is_some() {
            return;
        }
        let mut rest = s.as_bytes();
        while !rest.is_empty() {
            match self.out.write(rest) {
                Ok(0) => {
                    self.fail(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "HTML sink accepted no bytes",
                    ));
                    return;
                }
                Ok(n) => rest = &rest[n..],
                Err(e) => {
                    self.fail(e);
                    return;
                }
            }
        }
    }

    fn fail(&mut self, e: io::Error) {
        tracing::debug!(error = %e, "HTML sink failed, suppressing further writes");
        self.err = Some(e);
    }

    /// Writes `s` with HTML special characters escaped.
    pub fn safe(&mut self, s: &str) {
        self.raw(&escape_html(s));
    }

    fn indent(&mut self) {
        if self.depth > 0 {
            self.raw(&INDENT.repeat(self.depth));
        }
    }

    /// Writes one indented line of markup, unescaped.
    pub fn line(&mut self, markup: &str) {
        self.indent();
        self.raw(markup);
        self.raw(NEWLINE);
    }

    /// Writes one indented line of text, escaped.
    pub fn text_line(&mut self, text: &str) {
        self.indent();
        self.safe(text);
        self.raw(NEWLINE);
    }

    pub fn open_tag(&mut self, name: &str, attrs: Attrs<'_>) {
        self.raw("<");
        self.raw(name);
        for (key, value) in attrs.iter().filter(|(_, v)| !v.is_empty()) {
            self.raw(" ");
            self.raw(key);
            self.raw("=\"");
            self.safe(value);
            self.raw("\"");
        }
        self.raw(">");
    }

    pub fn close_tag(&mut self, name: &str) {
        self.raw("</");
        self.raw(name);
        self.raw(">");
    }

    /// A void element on its own line, such as `<br>` or `<img>`.
    pub fn standalone_tag(&mut self, name: &str, attrs: Attrs<'_>) {
        self.indent();
        self.open_tag(name, attrs);
        self.raw(NEWLINE);
    }

    /// Open tag, escaped text and close tag on one line.
    pub fn tag(&mut self, name: &str, text: &str, attrs: Attrs<'_>) {
        self.indent();
        self.open_tag(name, attrs);
        self.safe(text);
        self.close_tag(name);
        self.raw(NEWLINE);
    }

    /// Writes `name` around whatever `nested` writes, one level deeper.
    pub fn wrap_tag<F>(&mut self, name: &str, attrs: Attrs<'_>, nested: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent();
        self.open_tag(name, attrs);
        self.raw(NEWLINE);

        self.depth += 1;
        nested(self);
        self.depth -= 1;

        self.indent();
        self.close_tag(name);
        self.raw(NEWLINE);
    }

    /// Like [`HtmlWriter::wrap_tag`] when `wrap` is true; otherwise writes the
    /// nested content at the current level without the tag.
    pub fn maybe_wrap_tag<F>(&mut self, name: &str, wrap: bool, attrs: Attrs<'_>, nested: F)
    where
        F: FnOnce(&mut Self),
    {
        if wrap {
            self.wrap_tag(name, attrs, nested);
        } else {
            nested(self);
        }
    }
}
