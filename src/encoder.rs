use std::io::Write;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::decoder::{DEFAULT_ATTRIBUTE_PREFIX, DEFAULT_CONTENT_PREFIX};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::plugins::Plugin;
use crate::sanitize::{escape_json_str, DefaultSanitizer, Sanitizer, TypeConverter};

/// Settings read by [`Encoder::encode`].
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Informational only: attribute labels are fixed when the tree is built,
    /// so rendering never reads this. It is kept in step with the decoder by
    /// the prefix plugins and shows up in the encoder's logs.
    pub attribute_prefix: String,
    /// Label for the text of a complex node that still carries `data`.
    pub content_prefix: String,
    /// Escapes the contents of every quoted scalar.
    pub sanitizer: Arc<dyn Sanitizer>,
    /// Decides which scalars are written unquoted. `None` quotes everything.
    pub type_converter: Option<TypeConverter>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_owned(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_owned(),
            sanitizer: Arc::new(DefaultSanitizer),
            type_converter: None,
        }
    }
}

/// Writes [`Node`] trees to a sink as JSON text.
///
/// Once a write fails the encoder keeps that error and returns it from every
/// later call without writing anything.
pub struct Encoder<W: Write> {
    writer: W,
    options: EncoderOptions,
    err: Option<Error>,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder {
            writer,
            options: EncoderOptions::default(),
            err: None,
        }
    }

    pub fn apply(&mut self, plugin: &dyn Plugin) -> &mut Self {
        plugin.add_to_encoder(&mut self.options);
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `root` as one JSON object.
    ///
    /// `None` and a root without children write nothing.
    pub fn encode<'a, N: Into<Option<&'a Node>>>(&mut self, root: N) -> Result<()> {
        if let Some(err) = &self.err {
            warn!(error = %err, "encoder reused after a failed write");
            return Err(err.clone());
        }
        let root = match root.into() {
            Some(root) if root.is_complex() => root,
            _ => return Ok(()),
        };

        debug!(
            attribute_prefix = %self.options.attribute_prefix,
            content_prefix = %self.options.content_prefix,
            sanitizer = ?self.options.sanitizer,
            type_converter = ?self.options.type_converter,
            "encoding JSON"
        );

        let mut out = String::new();
        self.format(root, &mut out);

        let written = self
            .writer
            .write_all(out.as_bytes())
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            let err = Error::from(e);
            self.err = Some(err.clone());
            return Err(err);
        }

        debug!(bytes = out.len(), "encoded JSON");
        Ok(())
    }

    fn format(&self, n: &Node, out: &mut String) {
        if !n.is_complex() {
            self.scalar(&n.data, out);
            return;
        }

        out.push('{');
        let mut first = true;
        if !n.data.is_empty() {
            write_label(&self.options.content_prefix, out);
            self.scalar(&n.data, out);
            first = false;
        }

        for (label, children) in n.children() {
            if !first {
                out.push(',');
            }
            first = false;
            write_label(label, out);

            match children {
                [only] if !n.force_array => self.format(only, out),
                _ => {
                    out.push('[');
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        self.format(child, out);
                    }
                    out.push(']');
                }
            }
        }
        out.push('}');
    }

    fn scalar(&self, raw: &str, out: &mut String) {
        if let Some(literal) = self.options.type_converter.as_ref().and_then(|tc| tc.literal(raw)) {
            out.push_str(literal);
            return;
        }
        out.push('"');
        out.push_str(&self.options.sanitizer.sanitize(raw));
        out.push('"');
    }
}

fn write_label(label: &str, out: &mut String) {
    out.push('"');
    escape_json_str(label, out);
    out.push_str("\":");
}
