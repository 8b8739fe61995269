//! Deterministic pretty JSON emission.
//!
//! Output is byte-stable for a given [`Document`]: keys come out in the
//! mapping's sorted order, indentation is fixed, and with `ensure_ascii`
//! every non-ASCII character is written as a `\uXXXX` escape.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};

/// Spaces per nesting level.
pub const DEFAULT_INDENT: usize = 4;

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub indent: usize,
    pub ensure_ascii: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            ensure_ascii: true,
        }
    }
}

impl EmitOptions {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }
}

/// Render a document as pretty JSON (no trailing newline).
pub fn to_pretty_json(document: &Document, options: &EmitOptions) -> DocumentResult<String> {
    let mut out = Vec::new();
    write_json(document, &mut out, options)?;
    String::from_utf8(out).map_err(|e| DocumentError::serialization(e.to_string()))
}

/// Write a document as pretty JSON followed by a newline.
pub fn emit<W: Write>(
    document: &Document,
    mut writer: W,
    options: &EmitOptions,
) -> DocumentResult<()> {
    let rendered = to_pretty_json(document, options)?;
    writeln!(writer, "{}", rendered)
        .and_then(|_| writer.flush())
        .map_err(|source| DocumentError::Io {
            path: "<stdout>".into(),
            source,
        })
}

fn write_json<W: Write>(
    document: &Document,
    writer: W,
    options: &EmitOptions,
) -> DocumentResult<()> {
    let indent = vec![b' '; options.indent];
    let pretty = PrettyFormatter::with_indent(&indent);

    let result = if options.ensure_ascii {
        let formatter = AsciiFormatter { inner: pretty };
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        document.serialize(&mut ser)
    } else {
        let mut ser = serde_json::Serializer::with_formatter(writer, pretty);
        document.serialize(&mut ser)
    };

    result.map_err(|e| DocumentError::serialization(e.to_string()))
}

/// Pretty layout from the wrapped formatter, `\uXXXX` escapes for non-ASCII text.
struct AsciiFormatter<F> {
    inner: F,
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            // DEL is escaped along with everything outside the printable range
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            if start < i {
                writer.write_all(fragment[start..i].as_bytes())?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}
