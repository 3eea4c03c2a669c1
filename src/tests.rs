use super::*;
use crate::plugins::{exclude_attributes, with_attr_prefix, with_sanitizer, with_type_converter};
use serde_json::json;
use std::fs::File;
use std::io::prelude::*;

const PRODUCT: &str = r#"
	<?xml version="1.0" encoding="UTF-8"?>
		<id>42</id>
		<price>13.32</price>
		<deleted>true</deleted>
		<nullable>null</nullable>
		"#;

fn convert_to_string(xml: &str, plugins: &[&dyn Plugin]) -> String {
    String::from_utf8(convert(xml.as_bytes(), plugins).unwrap()).unwrap()
}

#[test]
fn test_round_trip_example() {
    let out = convert_to_string(r#"<a x="1"><b>hi</b><b>bye</b></a>"#, &[]);
    assert_eq!(r#"{"a":{"-x":"1","b":["hi","bye"]}}"#, out);
}

#[test]
fn test_mixed_nodes() {
    let out = convert_to_string(r#"<m attr="v">text</m>"#, &[]);
    assert_eq!(r##"{"m":{"-attr":"v","#content":"text"}}"##, out);

    let xml = r#"<?xml version="1.0" encoding="utf-8"?><a attr1="val1">some text</a>"#;
    let conf = Config::new_with_custom_values("", "text", &[]);
    let result = xml_string_to_json(xml, &conf);
    assert_eq!(json!({"a": {"attr1": "val1", "text": "some text"}}), result.unwrap());

    // an attribute and a child element sharing a name end up in one array
    let xml = r#"<a attr1="val1"><attr1><nested>some text</nested></attr1></a>"#;
    let result = xml_string_to_json(xml, &conf);
    assert_eq!(
        json!({"a": {"attr1": ["val1", {"nested": "some text"}]}}),
        result.unwrap()
    );
}

#[test]
fn test_text_only_element_stays_scalar() {
    let out = convert_to_string("<a><b>text</b><c/></a>", &[]);
    assert_eq!(r#"{"a":{"b":"text","c":""}}"#, out);
}

#[test]
fn test_all_types_parsing() {
    let literals = with_type_converter([JsType::Bool, JsType::Int, JsType::Float, JsType::Null]);
    let out = convert_to_string(PRODUCT, &[&literals]);
    assert_eq!(r#"{"id":42,"price":13.32,"deleted":true,"nullable":null}"#, out);

    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json!({"id": 42, "price": 13.32, "deleted": true, "nullable": null}), parsed);
}

#[test]
fn test_string_parsing() {
    let out = convert_to_string(PRODUCT, &[]);
    assert_eq!(r#"{"id":"42","price":"13.32","deleted":"true","nullable":"null"}"#, out);
}

#[test]
fn test_mixed_parsing() {
    let conf = Config::new_with_custom_values("-", "#content", &[JsType::Float]);
    let result = xml_string_to_json(PRODUCT, &conf).unwrap();
    assert_eq!(
        json!({"id": "42", "price": 13.32, "deleted": "true", "nullable": "null"}),
        result
    );
}

#[test]
fn test_numbers() {
    let conf = Config::new_with_custom_values("-", "#content", &[JsType::Int, JsType::Float]);
    let result = xml_string_to_json(
        "<a><b>12345</b><b>12345.0</b><b>12345.6</b><b>007</b><b>0xAC</b></a>",
        &conf,
    );
    assert_eq!(
        json!({"a": {"b": [12345, 12345.0, 12345.6, "007", "0xAC"]}}),
        result.unwrap()
    );
}

#[test]
fn test_attribute_literals() {
    let literals = with_type_converter([JsType::Int, JsType::Bool]);
    let out = convert_to_string(r#"<a n=" 7 " ok="true" s="True"/>"#, &[&literals]);
    assert_eq!(r#"{"a":{"-n":7,"-ok":true,"-s":"True"}}"#, out);
}

#[test]
fn test_escaping() {
    let xml = "<a><q>say \"hi\" &lt;b&gt;</q><ls>one\u{2028}two</ls><t>\n\tfoo\n\tbar\n\t</t></a>";
    let out = convert_to_string(xml, &[]);
    assert_eq!(
        r#"{"a":{"q":"say \"hi\" \u003cb\u003e","ls":"one\u2028two","t":"foo\n\tbar"}}"#,
        out
    );
}

#[test]
fn test_format_characters_are_trimmed() {
    let out = convert_to_string("<a><b>\u{200b}foo\u{feff}</b><c/></a>", &[]);
    assert_eq!(r#"{"a":{"b":"foo","c":""}}"#, out);

    let out = convert_to_string("<a><b>\u{feff}\u{e000} 1\u{200b}2 \u{200b}</b><c/></a>", &[]);
    assert_eq!("{\"a\":{\"b\":\"1\u{200b}2\",\"c\":\"\"}}", out);
}

#[test]
fn test_type_converter_with_default_sanitizer() {
    let xml = "<a><b>42</b><c/></a>";
    let types = with_type_converter([JsType::Int]);
    let sanitizer = with_sanitizer(DefaultSanitizer);

    let out = convert_to_string(xml, &[&types, &sanitizer]);
    assert_eq!(r#"{"a":{"b":42,"c":""}}"#, out);
    let out = convert_to_string(xml, &[&sanitizer, &types]);
    assert_eq!(r#"{"a":{"b":42,"c":""}}"#, out);
}

#[test]
fn test_excluded_attributes_and_bare_prefix() {
    let out = convert_to_string(
        r#"<osm version="0.6" generator="x"><bounds minlat="1"/></osm>"#,
        &[&with_attr_prefix(""), &exclude_attributes(["version", "generator"])],
    );
    assert_eq!(r#"{"osm":{"bounds":{"minlat":"1"}}}"#, out);
}

#[test]
fn test_force_array_after_decode() {
    let mut root = Node::new();
    let mut dec = Decoder::new(r#"<a><b>only</b></a>"#.as_bytes());
    dec.decode(&mut root).unwrap();

    let mut enc = Encoder::new(Vec::new());
    enc.encode(&root).unwrap();
    assert_eq!(br#"{"a":{"b":"only"}}"#.to_vec(), enc.into_inner());

    root.get_child_mut("a").unwrap().force_array = true;
    let mut enc = Encoder::new(Vec::new());
    enc.encode(&root).unwrap();
    assert_eq!(br#"{"a":{"b":["only"]}}"#.to_vec(), enc.into_inner());
}

#[test]
fn test_empty_document() {
    assert!(convert("".as_bytes(), &[]).unwrap().is_empty());
    assert_eq!(
        Value::Null,
        xml_string_to_json(r#"<?xml version="1.0"?>"#, &Config::new_with_defaults()).unwrap()
    );
}

#[test]
fn test_malformed_xml() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?><a attr1="val1">some text<b></a>"#;

    let result_1 = xml_string_to_json(xml, &Config::new_with_defaults());
    assert!(result_1.is_err());

    let result_2 = convert("<a><b>".as_bytes(), &[]);
    assert!(matches!(result_2, Err(Error::UnclosedElement(_))));
}

/// Converts every XML file in `./test_xml_files` and compares the result with
/// the JSON file of the same name.
#[test]
fn convert_test_files() {
    let mut entries = std::fs::read_dir("./test_xml_files")
        .unwrap()
        .map(|res| res.map(|e| e.path()))
        .collect::<std::result::Result<Vec<_>, std::io::Error>>()
        .unwrap();

    entries.sort();

    let conf = Config::new_with_defaults();
    let mut checked = 0;

    for mut entry in entries {
        // only XML files should be processed
        if entry.extension().unwrap() != "xml" {
            continue;
        }

        let mut file = File::open(&entry).unwrap();
        let mut xml_contents = String::new();
        file.read_to_string(&mut xml_contents).unwrap();

        let json = xml_string_to_json(&xml_contents, &conf).unwrap();

        entry.set_extension("json");
        let mut file = File::open(&entry).unwrap();
        let mut expected = String::new();
        file.read_to_string(&mut expected).unwrap();
        let expected: Value = serde_json::from_str(&expected).unwrap();

        assert_eq!(expected, json, "Failed on {:?}", entry.as_os_str());
        checked += 1;
    }

    assert!(checked > 0);
}
