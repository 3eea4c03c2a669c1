//! Options attached to a [`Decoder`](crate::Decoder) or an
//! [`Encoder`](crate::Encoder) before a run.
//!
//! Plugins are applied in call order and the last write to a setting wins.

use std::collections::HashSet;
use std::sync::Arc;

use crate::decoder::{DecoderOptions, TextMerge};
use crate::encoder::EncoderOptions;
use crate::sanitize::{Sanitizer, TypeConverter};
use crate::types::JsType;

/// Something that adjusts decoder and/or encoder settings.
pub trait Plugin {
    fn add_to_decoder(&self, _options: &mut DecoderOptions) {}

    fn add_to_encoder(&self, _options: &mut EncoderOptions) {}
}

/// Prefix for labels derived from XML attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPrefix(pub String);

/// Label under which the text of a mixed-content element is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPrefix(pub String);

/// Attribute local names dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeAttributes(pub HashSet<String>);

/// Replaces the scalar sanitizer of an encoder.
#[derive(Debug, Clone)]
pub struct WithSanitizer(pub Arc<dyn Sanitizer>);

pub fn with_attr_prefix<S: Into<String>>(prefix: S) -> AttrPrefix {
    AttrPrefix(prefix.into())
}

pub fn with_content_prefix<S: Into<String>>(prefix: S) -> ContentPrefix {
    ContentPrefix(prefix.into())
}

pub fn exclude_attributes<I, S>(names: I) -> ExcludeAttributes
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExcludeAttributes(names.into_iter().map(Into::into).collect())
}

/// Emits values of the given types as unquoted JSON literals.
pub fn with_type_converter<I: IntoIterator<Item = JsType>>(types: I) -> TypeConverter {
    TypeConverter::new(types)
}

pub fn with_sanitizer<S: Sanitizer + 'static>(sanitizer: S) -> WithSanitizer {
    WithSanitizer(Arc::new(sanitizer))
}

impl Plugin for AttrPrefix {
    fn add_to_decoder(&self, options: &mut DecoderOptions) {
        options.attribute_prefix.clone_from(&self.0);
    }

    fn add_to_encoder(&self, options: &mut EncoderOptions) {
        options.attribute_prefix.clone_from(&self.0);
    }
}

impl Plugin for ContentPrefix {
    fn add_to_decoder(&self, options: &mut DecoderOptions) {
        options.content_prefix.clone_from(&self.0);
    }

    fn add_to_encoder(&self, options: &mut EncoderOptions) {
        options.content_prefix.clone_from(&self.0);
    }
}

impl Plugin for ExcludeAttributes {
    fn add_to_decoder(&self, options: &mut DecoderOptions) {
        options.excluded_attributes.clone_from(&self.0);
    }
}

impl Plugin for TextMerge {
    fn add_to_decoder(&self, options: &mut DecoderOptions) {
        options.text_merge = *self;
    }
}

impl Plugin for TypeConverter {
    fn add_to_encoder(&self, options: &mut EncoderOptions) {
        options.type_converter = Some(self.clone());
    }
}

impl Plugin for WithSanitizer {
    fn add_to_encoder(&self, options: &mut EncoderOptions) {
        options.sanitizer = Arc::clone(&self.0);
    }
}
