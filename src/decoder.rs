use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::BufRead;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::plugins::Plugin;

pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "-";
pub const DEFAULT_CONTENT_PREFIX: &str = "#content";

/// How several text fragments inside one element are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMerge {
    /// Keep only the longest trimmed fragment.
    #[default]
    Longest,
    /// Append every trimmed fragment in document order.
    Concatenate,
}

/// Settings read by [`Decoder::decode`].
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    pub attribute_prefix: String,
    pub content_prefix: String,
    pub excluded_attributes: HashSet<String>,
    pub text_merge: TextMerge,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_owned(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_owned(),
            excluded_attributes: HashSet::new(),
            text_merge: TextMerge::default(),
        }
    }
}

/// An element whose end tag has not been seen yet.
struct Frame {
    node: Node,
    label: String,
}

/// Reads an XML document and builds a [`Node`] tree from it.
pub struct Decoder<R: BufRead> {
    reader: Reader<R>,
    options: DecoderOptions,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder {
            reader: Reader::from_reader(reader),
            options: DecoderOptions::default(),
        }
    }

    pub fn apply(&mut self, plugin: &dyn Plugin) -> &mut Self {
        plugin.add_to_decoder(&mut self.options);
        self
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn set_attribute_prefix<S: Into<String>>(&mut self, prefix: S) {
        self.options.attribute_prefix = prefix.into();
    }

    pub fn set_content_prefix<S: Into<String>>(&mut self, prefix: S) {
        self.options.content_prefix = prefix.into();
    }

    pub fn decode_with_custom_prefixes(
        &mut self,
        root: &mut Node,
        content_prefix: &str,
        attribute_prefix: &str,
    ) -> Result<()> {
        self.set_content_prefix(content_prefix);
        self.set_attribute_prefix(attribute_prefix);
        self.decode(root)
    }

    /// Reads the whole input and attaches every top-level element to `root`.
    ///
    /// On error `root` may hold a partial tree and should be discarded.
    pub fn decode(&mut self, root: &mut Node) -> Result<()> {
        debug!(
            attribute_prefix = %self.options.attribute_prefix,
            text_merge = ?self.options.text_merge,
            "decoding XML"
        );

        let mut stack: Vec<Frame> = Vec::new();
        let mut buf = Vec::new();
        let mut elements = 0usize;

        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let frame = self.open(&start)?;
                    trace!(label = %frame.label, depth = stack.len(), "start element");
                    stack.push(frame);
                }
                Event::Empty(start) => {
                    let frame = self.open(&start)?;
                    trace!(label = %frame.label, depth = stack.len(), "empty element");
                    self.close(frame, stack.last_mut(), root);
                    elements += 1;
                }
                Event::Text(text) => {
                    let fragment = text.unescape()?;
                    let current = stack.last_mut().map_or(&mut *root, |f| &mut f.node);
                    self.merge_text(current, &fragment);
                }
                Event::CData(cdata) => {
                    let raw = cdata.into_inner();
                    let fragment =
                        str::from_utf8(&raw).map_err(|_| Error::InvalidUtf8("CDATA section"))?;
                    let current = stack.last_mut().map_or(&mut *root, |f| &mut f.node);
                    self.merge_text(current, fragment);
                }
                Event::End(end) => {
                    let frame = match stack.pop() {
                        Some(frame) => frame,
                        None => {
                            let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                            return Err(Error::UnexpectedEnd(name));
                        }
                    };
                    trace!(label = %frame.label, depth = stack.len(), "end element");
                    self.close(frame, stack.last_mut(), root);
                    elements += 1;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(frame) = stack.pop() {
            return Err(Error::UnclosedElement(frame.label));
        }

        debug!(elements, "decoded XML");
        Ok(())
    }

    fn open(&self, start: &BytesStart<'_>) -> Result<Frame> {
        let label = str::from_utf8(start.name().as_ref())
            .map_err(|_| Error::InvalidUtf8("tag name"))?
            .to_owned();

        let mut node = Node::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let local = attr.key.local_name();
            let name =
                str::from_utf8(local.as_ref()).map_err(|_| Error::InvalidUtf8("attribute name"))?;
            if self.options.excluded_attributes.contains(name) {
                continue;
            }
            let value = attr.unescape_value()?;
            node.add_child(
                format!("{}{}", self.options.attribute_prefix, name),
                Node::with_data(value),
            );
        }

        Ok(Frame { node, label })
    }

    /// Hands a finished element to its parent, or to `root` at the top level.
    fn close(&self, frame: Frame, parent: Option<&mut Frame>, root: &mut Node) {
        let Frame { mut node, label } = frame;
        if node.is_complex() && !node.data.is_empty() {
            let content = std::mem::take(&mut node.data);
            node.add_child(self.options.content_prefix.clone(), Node::with_data(content));
        }
        match parent {
            Some(parent) => parent.node.add_child(label, node),
            None => root.add_child(label, node),
        }
    }

    fn merge_text(&self, node: &mut Node, fragment: &str) {
        let fragment = trim_non_graphic(fragment);
        match self.options.text_merge {
            TextMerge::Longest => {
                if fragment.len() > node.data.len() {
                    node.data = fragment.to_owned();
                }
            }
            TextMerge::Concatenate => node.data.push_str(fragment),
        }
    }
}

/// Strips leading and trailing non-graphic characters (whitespace, controls,
/// format characters such as U+200B and U+FEFF, private-use code points and
/// noncharacters), keeping anything between the first and last graphic one.
pub fn trim_non_graphic(s: &str) -> &str {
    s.trim_matches(is_non_graphic)
}

/// Format (Cf), private-use (Co) and noncharacter ranges, sorted.
const NON_GRAPHIC: &[(char, char)] = &[
    ('\u{ad}', '\u{ad}'),
    ('\u{600}', '\u{605}'),
    ('\u{61c}', '\u{61c}'),
    ('\u{6dd}', '\u{6dd}'),
    ('\u{70f}', '\u{70f}'),
    ('\u{890}', '\u{891}'),
    ('\u{8e2}', '\u{8e2}'),
    ('\u{180e}', '\u{180e}'),
    ('\u{200b}', '\u{200f}'),
    ('\u{202a}', '\u{202e}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206f}'),
    ('\u{e000}', '\u{f8ff}'),
    ('\u{fdd0}', '\u{fdef}'),
    ('\u{feff}', '\u{feff}'),
    ('\u{fff9}', '\u{fffb}'),
    ('\u{110bd}', '\u{110bd}'),
    ('\u{110cd}', '\u{110cd}'),
    ('\u{13430}', '\u{1343f}'),
    ('\u{1bca0}', '\u{1bca3}'),
    ('\u{1d173}', '\u{1d17a}'),
    ('\u{e0001}', '\u{e0001}'),
    ('\u{e0020}', '\u{e007f}'),
    ('\u{f0000}', '\u{10ffff}'),
];

fn is_non_graphic(c: char) -> bool {
    if c.is_whitespace() || c.is_control() {
        return true;
    }
    // noncharacters at the end of every plane
    if (c as u32) & 0xfffe == 0xfffe {
        return true;
    }
    NON_GRAPHIC
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                Ordering::Less
            } else if lo > c {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}
