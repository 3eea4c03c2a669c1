use serde_derive::{Deserialize, Serialize};

use crate::decoder::{DecoderOptions, TextMerge, DEFAULT_ATTRIBUTE_PREFIX, DEFAULT_CONTENT_PREFIX};
use crate::encoder::EncoderOptions;
use crate::plugins::Plugin;
use crate::sanitize::TypeConverter;
use crate::types::JsType;

/// Conversion settings for both halves of the pipeline.
///
/// Missing fields take their defaults when deserializing, so a config file
/// only needs the settings it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prepended to every label derived from an XML attribute.
    pub attribute_prefix: String,
    /// Label for the text of an element that also has child elements.
    pub content_prefix: String,
    /// Attribute local names dropped during decoding.
    pub exclude_attributes: Vec<String>,
    /// Scalar types written as unquoted JSON literals.
    pub literal_types: Vec<JsType>,
    pub text_merge: TextMerge,
}

impl Config {
    /// Numbers, booleans and nulls are all written as strings, attributes get
    /// a `-` prefix and mixed text goes under `#content`.
    pub fn new_with_defaults() -> Self {
        Config {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_owned(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_owned(),
            exclude_attributes: Vec::new(),
            literal_types: Vec::new(),
            text_merge: TextMerge::Longest,
        }
    }

    pub fn new_with_custom_values(
        attribute_prefix: &str,
        content_prefix: &str,
        literal_types: &[JsType],
    ) -> Self {
        Config {
            attribute_prefix: attribute_prefix.to_owned(),
            content_prefix: content_prefix.to_owned(),
            literal_types: literal_types.to_vec(),
            ..Self::new_with_defaults()
        }
    }

    pub fn exclude_attribute<S: Into<String>>(mut self, name: S) -> Self {
        self.exclude_attributes.push(name.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new_with_defaults()
    }
}

impl Plugin for Config {
    fn add_to_decoder(&self, options: &mut DecoderOptions) {
        options.attribute_prefix.clone_from(&self.attribute_prefix);
        options.content_prefix.clone_from(&self.content_prefix);
        options.excluded_attributes = self.exclude_attributes.iter().cloned().collect();
        options.text_merge = self.text_merge;
    }

    fn add_to_encoder(&self, options: &mut EncoderOptions) {
        options.attribute_prefix.clone_from(&self.attribute_prefix);
        options.content_prefix.clone_from(&self.content_prefix);
        options.type_converter = if self.literal_types.is_empty() {
            None
        } else {
            Some(TypeConverter::new(self.literal_types.iter().copied()))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::with_sanitizer;
    use crate::sanitize::Sanitizer;

    #[test]
    fn test_config_from_json() {
        let conf: Config = serde_json::from_str(
            r#"{"attribute_prefix": "@", "literal_types": ["int", "bool"], "text_merge": "concatenate"}"#,
        )
        .unwrap();

        assert_eq!(conf.attribute_prefix, "@");
        assert_eq!(conf.content_prefix, "#content");
        assert_eq!(conf.literal_types, vec![JsType::Int, JsType::Bool]);
        assert_eq!(conf.text_merge, TextMerge::Concatenate);
        assert!(conf.exclude_attributes.is_empty());
    }

    #[test]
    fn test_config_applies_to_both_halves() {
        let conf = Config::new_with_custom_values("", "text", &[JsType::Float]).exclude_attribute("id");

        let mut dec = DecoderOptions::default();
        conf.add_to_decoder(&mut dec);
        assert_eq!(dec.attribute_prefix, "");
        assert_eq!(dec.content_prefix, "text");
        assert!(dec.excluded_attributes.contains("id"));

        let mut enc = EncoderOptions::default();
        conf.add_to_encoder(&mut enc);
        let types = enc.type_converter.as_ref().unwrap();
        assert_eq!(types.literal("1.5"), Some("1.5"));
        assert_eq!(types.literal("1"), None);

        Config::new_with_defaults().add_to_encoder(&mut enc);
        assert!(enc.type_converter.is_none());
    }

    #[derive(Debug)]
    struct Upper;

    impl Sanitizer for Upper {
        fn sanitize(&self, raw: &str) -> String {
            raw.to_uppercase()
        }
    }

    #[test]
    fn test_config_keeps_custom_sanitizer() {
        let mut enc = EncoderOptions::default();
        with_sanitizer(Upper).add_to_encoder(&mut enc);
        Config::new_with_custom_values("-", "#content", &[JsType::Int]).add_to_encoder(&mut enc);

        assert_eq!(enc.sanitizer.sanitize("ab"), "AB");
        assert!(enc.type_converter.is_some());
    }
}
