//! Converts XML documents into a generic [`Node`] tree and writes that tree
//! out as JSON text.
//!
//! ```
//! use quickxml_to_json::{xml_string_to_json, Config};
//!
//! let json = xml_string_to_json(r#"<a x="1"><b>hi</b><b>bye</b></a>"#, &Config::new_with_defaults()).unwrap();
//! assert_eq!(json["a"]["-x"], "1");
//! assert_eq!(json["a"]["b"][1], "bye");
//! ```
//!
//! Repeated sibling elements become arrays, attributes become prefixed
//! labels (`-` by default) and the text of an element that also has child
//! elements is stored under `#content`. Scalars are written as JSON strings
//! unless a [`TypeConverter`] lists their type.

extern crate quick_xml;
extern crate serde_json;

use std::io::BufRead;

use serde_json::Value;
use tracing::{debug, instrument};

mod config;
mod decoder;
mod encoder;
mod error;
mod node;
pub mod plugins;
mod sanitize;
mod types;

pub use config::Config;
pub use decoder::{trim_non_graphic, Decoder, DecoderOptions, TextMerge};
pub use encoder::{Encoder, EncoderOptions};
pub use error::{Error, Result};
pub use node::Node;
pub use plugins::Plugin;
pub use sanitize::{escape_json_bytes, escape_json_str, DefaultSanitizer, Sanitizer, TypeConverter};
pub use types::{classify, JsType};

/// Decodes the XML in `reader` and returns its JSON encoding.
///
/// Every plugin is applied to both the decoder and the encoder, in order.
/// An input without elements produces empty output.
#[instrument(skip_all, fields(plugins = plugins.len()))]
pub fn convert<R: BufRead>(reader: R, plugins: &[&dyn Plugin]) -> Result<Vec<u8>> {
    let mut root = Node::new();
    let mut dec = Decoder::new(reader);
    for plugin in plugins {
        dec.apply(*plugin);
    }
    dec.decode(&mut root)?;

    let mut enc = Encoder::new(Vec::new());
    for plugin in plugins {
        enc.apply(*plugin);
    }
    enc.encode(&root)?;

    let out = enc.into_inner();
    debug!(bytes = out.len(), "converted XML to JSON");
    Ok(out)
}

/// Converts an XML string with `config` and parses the result into a
/// [`serde_json::Value`]. A document without elements yields `Value::Null`.
pub fn xml_string_to_json(xml: &str, config: &Config) -> Result<Value> {
    let out = convert(xml.as_bytes(), &[config])?;
    if out.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&out)?)
}

#[cfg(test)]
mod tests;
