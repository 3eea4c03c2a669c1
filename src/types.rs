use std::sync::OnceLock;

use regex::Regex;
use serde_derive::{Deserialize, Serialize};

/// The JSON type a scalar string reads as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsType {
    Bool,
    Int,
    Float,
    String,
    Null,
}

fn int_pattern() -> &'static Regex {
    static INT: OnceLock<Regex> = OnceLock::new();
    INT.get_or_init(|| Regex::new(r"^-?(?:0|[1-9][0-9]*)$").expect("static int pattern"))
}

fn float_pattern() -> &'static Regex {
    static FLOAT: OnceLock<Regex> = OnceLock::new();
    FLOAT.get_or_init(|| {
        Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+(?:[eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)$")
            .expect("static float pattern")
    })
}

/// Classifies an already trimmed string.
///
/// Precedence is bool, null, int, float; anything else is a string.
/// Numbers follow the JSON number grammar, so `007`, `.5` or `NaN` stay strings
/// and a classified value can always be written unquoted.
pub fn classify(s: &str) -> JsType {
    match s {
        "true" | "false" => JsType::Bool,
        "null" => JsType::Null,
        _ if int_pattern().is_match(s) => JsType::Int,
        _ if float_pattern().is_match(s) => JsType::Float,
        _ => JsType::String,
    }
}
